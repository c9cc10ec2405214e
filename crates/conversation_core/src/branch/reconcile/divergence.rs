//! Phase A: pairwise divergence between each version and its parent.

use log::{debug, warn};

use super::view::{BranchedConversation, BranchedVersion};
use crate::error::{ConversationError, Result};

/// Annotate the branch message of every (version, parent) pair.
///
/// Both branch messages get both summaries. Entries may repeat when a parent
/// has several children diverging at the same row; `merge_chains` folds
/// them into complete sibling lists afterwards.
pub fn link_branch_points(tree: &mut BranchedConversation) -> Result<()> {
    let mut pending: Vec<usize> = (0..tree.versions.len()).collect();

    while let Some(index) = pending.pop() {
        let Some(parent_id) = tree.versions[index].parent_version else {
            continue;
        };
        let Some(parent_index) = tree.version_position(parent_id) else {
            warn!(
                "[{}] Version {} points at missing parent {}",
                tree.id, tree.versions[index].id, parent_id
            );
            continue;
        };
        if parent_index == index {
            warn!("[{}] Version {} is its own parent", tree.id, parent_id);
            continue;
        }

        let Some(row) = branch_row(&tree.versions[index], &tree.versions[parent_index])? else {
            continue;
        };

        let child = tree.versions[index].summary();
        let parent = tree.versions[parent_index].summary();
        debug!(
            "[{}] Version {} diverges from {} at row {}",
            tree.id, child.id, parent.id, row
        );

        let child_message = &mut tree.versions[index].messages[row];
        child_message.insert_version_once(child.clone());
        child_message.insert_version(parent.clone());

        let parent_message = &mut tree.versions[parent_index].messages[row];
        parent_message.insert_version_once(parent);
        parent_message.insert_version(child);
    }

    Ok(())
}

/// Row at which `child` and `parent` diverge.
///
/// Every row before the last comparable one must match, except the row
/// holding the child's declared root message in the parent. With no
/// mismatch the last comparable row is the branch point. `None` when either
/// sequence is empty.
pub(crate) fn branch_row(child: &BranchedVersion, parent: &BranchedVersion) -> Result<Option<usize>> {
    let comparable = child.messages.len().min(parent.messages.len());
    if comparable == 0 {
        return Ok(None);
    }

    let rows = child.messages.iter().zip(&parent.messages).take(comparable - 1);
    for (row, (current, original)) in rows.enumerate() {
        if current.content == original.content {
            continue;
        }
        if child.root_message == Some(original.id) {
            return Ok(Some(row));
        }
        return Err(ConversationError::ContentMismatch {
            version: child.id,
            parent: parent.id,
            position: row,
        });
    }

    Ok(Some(comparable - 1))
}
