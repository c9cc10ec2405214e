use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::message::Message;

/// One linear message sequence inside a conversation's version tree.
///
/// `parent_version` and `root_message` are stored as keys into the owning
/// conversation, never as owned references.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Version {
    pub id: Uuid,
    pub conversation_id: Uuid,
    /// None only for the conversation's root version
    #[serde(default)]
    pub parent_version: Option<Uuid>,
    /// Message in the parent at which this version was forked
    #[serde(default)]
    pub root_message: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub messages: Vec<Message>,
}

impl Version {
    /// Create a root version (no parent, no fork point)
    pub fn root(conversation_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            conversation_id,
            parent_version: None,
            root_message: None,
            created_at: Utc::now(),
            messages: Vec::new(),
        }
    }

    /// Create an empty version forked from `parent` at `root_message`
    pub fn fork(conversation_id: Uuid, parent: Uuid, root_message: Option<Uuid>) -> Self {
        Self {
            parent_version: Some(parent),
            root_message,
            ..Self::root(conversation_id)
        }
    }

    /// Position of a message in this version's sequence
    pub fn message_position(&self, message_id: Uuid) -> Option<usize> {
        self.messages.iter().position(|m| m.id == message_id)
    }

    pub fn message(&self, message_id: Uuid) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == message_id)
    }

    /// Append a message. Messages are never reordered or edited in place.
    pub fn push_message(&mut self, message: Message) -> &Message {
        self.messages.push(message);
        let last = self.messages.len() - 1;
        &self.messages[last]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_and_fork() {
        let conversation_id = Uuid::new_v4();
        let root = Version::root(conversation_id);
        assert!(root.parent_version.is_none());
        assert!(root.messages.is_empty());

        let root_message = Uuid::new_v4();
        let fork = Version::fork(conversation_id, root.id, Some(root_message));
        assert_eq!(fork.parent_version, Some(root.id));
        assert_eq!(fork.root_message, Some(root_message));
        assert_ne!(fork.id, root.id);
    }

    #[test]
    fn test_message_position() {
        let mut version = Version::root(Uuid::new_v4());
        let first = version.push_message(Message::user("one")).id;
        let second = version.push_message(Message::assistant("two")).id;

        assert_eq!(version.message_position(first), Some(0));
        assert_eq!(version.message_position(second), Some(1));
        assert_eq!(version.message_position(Uuid::new_v4()), None);
    }
}
