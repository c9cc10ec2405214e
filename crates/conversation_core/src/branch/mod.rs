//! Branching over the version tree
//!
//! - `create` forks a new version at a chosen message (write time)
//! - `active` moves the conversation's active version pointer
//! - `reconcile` annotates every message with the versions sharing it (read time)

mod active;
mod create;
pub mod reconcile;

pub use active::switch_active;
pub use create::{branch_active, create_branch, BranchCreated};
pub use reconcile::{
    branched, link_branch_points, merge_chains, reconcile, BranchedConversation, BranchedMessage,
    BranchedVersion, VersionSummary,
};
