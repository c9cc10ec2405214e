use log::debug;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ConversationError, Result};
use crate::model::{Conversation, Message, Version};

/// Outcome of a successful branch creation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BranchCreated {
    pub new_version_id: Uuid,
    pub parent_version_id: Uuid,
    pub root_message_id: Option<Uuid>,
    pub copied_message_count: usize,
}

/// Fork `source_version_id` at `root_message_id`.
///
/// The new version owns fresh copies of every message strictly before the
/// root message; the root message and everything after it are left out.
/// Without a root message the whole sequence is copied. The new version
/// becomes the active one.
pub fn create_branch(
    conversation: &mut Conversation,
    source_version_id: Uuid,
    root_message_id: Option<Uuid>,
) -> Result<BranchCreated> {
    let source = conversation
        .version(source_version_id)
        .ok_or(ConversationError::VersionNotFound(source_version_id))?;

    if source.messages.is_empty() {
        return Err(ConversationError::RootMessageNotFound);
    }

    let fork_at = match root_message_id {
        Some(id) => source
            .message_position(id)
            .ok_or(ConversationError::RootMessageNotInConversation(id))?,
        None => source.messages.len(),
    };

    let mut version = Version::fork(conversation.id, source.id, root_message_id);
    version.messages = copy_prefix(&source.messages[..fork_at]);

    let created = BranchCreated {
        new_version_id: version.id,
        parent_version_id: source.id,
        root_message_id,
        copied_message_count: version.messages.len(),
    };

    debug!(
        "[{}] Created version {} from {} at {:?} ({} messages copied)",
        conversation.id,
        created.new_version_id,
        created.parent_version_id,
        created.root_message_id,
        created.copied_message_count
    );

    conversation.active_version = Some(version.id);
    conversation.versions.push(version);
    conversation.touch();
    Ok(created)
}

/// Fork the conversation's active version.
pub fn branch_active(
    conversation: &mut Conversation,
    root_message_id: Option<Uuid>,
) -> Result<BranchCreated> {
    let source = conversation
        .active_version()
        .map(|v| v.id)
        .ok_or(ConversationError::NoActiveVersion)?;
    create_branch(conversation, source, root_message_id)
}

fn copy_prefix(messages: &[Message]) -> Vec<Message> {
    let mut copies: Vec<Message> = Vec::with_capacity(messages.len());
    for message in messages {
        let not_before = copies
            .last()
            .map(|previous| previous.created_at)
            .unwrap_or(message.created_at);
        copies.push(message.copy_after(not_before));
    }
    copies
}

#[cfg(test)]
mod tests {
    use super::*;

    fn four_message_conversation() -> Conversation {
        Conversation::with_root_version(
            Some("Test title".to_string()),
            vec![
                Message::user("Hi what up?"),
                Message::assistant("Hello, how can I help you?"),
                Message::user("Hi what up for the second time"),
                Message::assistant("Hello, how can I help you fella?"),
            ],
        )
    }

    #[test]
    fn test_branch_copies_prefix_before_root_message() {
        let mut conversation = four_message_conversation();
        let source = conversation.versions[0].clone();
        let root_message = source.messages[2].id;

        let created = branch_active(&mut conversation, Some(root_message)).unwrap();

        assert_eq!(created.parent_version_id, source.id);
        assert_eq!(created.root_message_id, Some(root_message));
        assert_eq!(created.copied_message_count, 2);
        assert_eq!(conversation.active_version, Some(created.new_version_id));

        let version = conversation.version(created.new_version_id).unwrap();
        assert_eq!(version.parent_version, Some(source.id));
        assert_eq!(version.root_message, Some(root_message));
        for (copy, original) in version.messages.iter().zip(&source.messages) {
            assert_ne!(copy.id, original.id);
            assert_eq!(copy.content, original.content);
            assert_eq!(copy.role, original.role);
            assert!(copy.created_at > original.created_at);
        }
    }

    #[test]
    fn test_copies_are_strictly_ordered() {
        let mut conversation = four_message_conversation();
        let last = conversation.versions[0].messages[3].id;
        let created = branch_active(&mut conversation, Some(last)).unwrap();

        let version = conversation.version(created.new_version_id).unwrap();
        assert_eq!(version.messages.len(), 3);
        for pair in version.messages.windows(2) {
            assert!(pair[0].created_at < pair[1].created_at);
        }
    }

    #[test]
    fn test_branch_from_first_message_is_empty() {
        let mut conversation = four_message_conversation();
        let first = conversation.versions[0].messages[0].id;
        let created = branch_active(&mut conversation, Some(first)).unwrap();
        assert_eq!(created.copied_message_count, 0);
        assert!(conversation
            .version(created.new_version_id)
            .unwrap()
            .messages
            .is_empty());
    }

    #[test]
    fn test_branch_without_root_message_copies_everything() {
        let mut conversation = four_message_conversation();
        let created = branch_active(&mut conversation, None).unwrap();
        assert_eq!(created.copied_message_count, 4);
        assert_eq!(created.root_message_id, None);
    }

    #[test]
    fn test_branch_twice_from_same_root_message() {
        let mut conversation = four_message_conversation();
        let source = conversation.versions[0].id;
        let root_message = conversation.versions[0].messages[3].id;

        let first = create_branch(&mut conversation, source, Some(root_message)).unwrap();
        let second = create_branch(&mut conversation, source, Some(root_message)).unwrap();

        assert_ne!(first.new_version_id, second.new_version_id);
        assert_eq!(first.parent_version_id, second.parent_version_id);
        assert_eq!(conversation.versions.len(), 3);
        assert_eq!(conversation.active_version, Some(second.new_version_id));
    }

    #[test]
    fn test_foreign_root_message_is_rejected() {
        let mut conversation = four_message_conversation();
        let other = four_message_conversation();
        let foreign = other.versions[0].messages[1].id;
        let active_before = conversation.active_version;

        let err = branch_active(&mut conversation, Some(foreign)).unwrap_err();

        assert_eq!(err, ConversationError::RootMessageNotInConversation(foreign));
        assert_eq!(conversation.versions.len(), 1);
        assert_eq!(conversation.active_version, active_before);
    }

    #[test]
    fn test_empty_version_reports_root_message_not_found() {
        let mut conversation = Conversation::with_root_version(None, Vec::new());
        let err = branch_active(&mut conversation, Some(Uuid::nil())).unwrap_err();
        assert_eq!(err, ConversationError::RootMessageNotFound);
        assert_eq!(conversation.versions.len(), 1);
    }

    #[test]
    fn test_no_active_version() {
        let mut conversation = Conversation::new("Empty");
        let err = branch_active(&mut conversation, None).unwrap_err();
        assert_eq!(err, ConversationError::NoActiveVersion);
    }
}
