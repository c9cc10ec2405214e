//! Branch reconciliation
//!
//! Turns a conversation's version tree into a view where every message
//! lists all versions that still share it. Runs in two independent passes:
//! `link_branch_points` records pairwise divergence along each
//! parent/child edge, `merge_chains` completes those records row by row.

mod chains;
mod divergence;
mod view;

pub use chains::merge_chains;
pub use divergence::link_branch_points;
pub use view::{BranchedConversation, BranchedMessage, BranchedVersion, VersionSummary};

use log::debug;

use crate::error::Result;
use crate::model::Conversation;

/// Run both passes over `tree` in place.
///
/// A content mismatch aborts before any chain is merged; the tree is a
/// derived view, so callers simply drop it.
pub fn reconcile(tree: &mut BranchedConversation) -> Result<()> {
    link_branch_points(tree)?;
    merge_chains(tree);
    Ok(())
}

/// Build the display view of `conversation` and reconcile it.
pub fn branched(conversation: &Conversation) -> Result<BranchedConversation> {
    let mut tree = BranchedConversation::from(conversation);
    reconcile(&mut tree)?;
    debug!(
        "[{}] Reconciled {} versions",
        tree.id,
        tree.versions.len()
    );
    Ok(tree)
}
