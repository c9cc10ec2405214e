//! conversation_core - Version tree for editable conversations
//!
//! Every edit of a conversation forks a new version instead of overwriting
//! history. This crate holds the in-memory tree and the passes over it:
//! - `model` - Conversation, Version, Message, Role
//! - `branch` - branch creation, active version switching and reconciliation
//! - `error` - the error taxonomy shared by every operation

pub mod branch;
pub mod error;
pub mod model;

// Re-export commonly used types
pub use branch::{
    branch_active, branched, create_branch, link_branch_points, merge_chains, reconcile,
    switch_active, BranchCreated, BranchedConversation, BranchedMessage, BranchedVersion,
    VersionSummary,
};
pub use error::{ConversationError, ErrorKind, Result};
pub use model::{
    Conversation, Message, NewMessage, Role, Version, DEFAULT_TITLE, MAX_TITLE_LEN,
};
