use log::debug;
use uuid::Uuid;

use crate::error::{ConversationError, Result};
use crate::model::Conversation;

/// Point the conversation at another of its own versions.
///
/// A version id owned by a different conversation is reported exactly like
/// an id that does not exist at all.
pub fn switch_active(conversation: &mut Conversation, version_id: Uuid) -> Result<()> {
    if !conversation.has_version(version_id) {
        return Err(ConversationError::VersionNotFound(version_id));
    }

    debug!(
        "[{}] Switching active version {:?} -> {}",
        conversation.id, conversation.active_version, version_id
    );
    conversation.active_version = Some(version_id);
    conversation.touch();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Message, Version};

    #[test]
    fn test_switch_to_own_version() {
        let mut conversation =
            Conversation::with_root_version(None, vec![Message::user("Hi what up?")]);
        let other = Version::root(conversation.id);
        let other_id = other.id;
        conversation.versions.push(other);

        switch_active(&mut conversation, other_id).unwrap();
        assert_eq!(conversation.active_version, Some(other_id));
    }

    #[test]
    fn test_switch_to_foreign_version_is_not_found() {
        let mut conversation = Conversation::with_root_version(None, Vec::new());
        let before = conversation.active_version;
        let other = Conversation::with_root_version(None, Vec::new());
        let foreign = other.versions[0].id;

        let err = switch_active(&mut conversation, foreign).unwrap_err();
        assert_eq!(err, ConversationError::VersionNotFound(foreign));
        assert_eq!(conversation.active_version, before);

        let missing = Uuid::new_v4();
        let err = switch_active(&mut conversation, missing).unwrap_err();
        assert_eq!(err, ConversationError::VersionNotFound(missing));
    }

    #[test]
    fn test_switch_leaves_messages_untouched() {
        let mut conversation =
            Conversation::with_root_version(None, vec![Message::user("a"), Message::user("b")]);
        let snapshot = conversation.versions.clone();
        let root = conversation.versions[0].id;

        switch_active(&mut conversation, root).unwrap();
        assert_eq!(conversation.versions, snapshot);
    }
}
