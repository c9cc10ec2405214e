//! Display-ready view of a conversation's version tree.
//!
//! The `versions` list on each message is derived data: it is rebuilt on
//! every read and never persisted.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{Conversation, Message, Role, Version};

/// Lightweight (id, timestamp) label for a version
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VersionSummary {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Ord for VersionSummary {
    fn cmp(&self, other: &Self) -> Ordering {
        self.created_at
            .cmp(&other.created_at)
            .then_with(|| self.id.cmp(&other.id))
    }
}

impl PartialOrd for VersionSummary {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BranchedMessage {
    pub id: Uuid,
    pub role: Role,
    pub content: String,
    pub created_at: DateTime<Utc>,
    /// Versions sharing this message, ordered by summary
    #[serde(default)]
    pub versions: Vec<VersionSummary>,
}

impl BranchedMessage {
    pub fn has_version(&self, version_id: Uuid) -> bool {
        self.versions.iter().any(|v| v.id == version_id)
    }

    /// Sorted insert after any equal entries. Duplicates are allowed.
    pub fn insert_version(&mut self, summary: VersionSummary) {
        let at = self.versions.partition_point(|existing| existing <= &summary);
        self.versions.insert(at, summary);
    }

    pub fn insert_version_once(&mut self, summary: VersionSummary) {
        if !self.has_version(summary.id) {
            self.insert_version(summary);
        }
    }
}

impl From<&Message> for BranchedMessage {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id,
            role: message.role,
            content: message.content.clone(),
            created_at: message.created_at,
            versions: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BranchedVersion {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub parent_version: Option<Uuid>,
    pub root_message: Option<Uuid>,
    /// Ordering timestamp: creation time of the root message, or of the
    /// conversation for versions without one
    pub created_at: DateTime<Utc>,
    pub active: bool,
    pub messages: Vec<BranchedMessage>,
}

impl BranchedVersion {
    pub fn summary(&self) -> VersionSummary {
        VersionSummary {
            id: self.id,
            created_at: self.created_at,
        }
    }

    fn from_version(version: &Version, conversation: &Conversation) -> Self {
        let created_at = version
            .root_message
            .and_then(|id| conversation.message(id))
            .map(|message| message.created_at)
            .unwrap_or(conversation.created_at);
        Self {
            id: version.id,
            conversation_id: version.conversation_id,
            parent_version: version.parent_version,
            root_message: version.root_message,
            created_at,
            active: conversation.active_version == Some(version.id),
            messages: version.messages.iter().map(BranchedMessage::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BranchedConversation {
    pub id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    pub active_version: Option<Uuid>,
    pub versions: Vec<BranchedVersion>,
}

impl BranchedConversation {
    pub fn version(&self, version_id: Uuid) -> Option<&BranchedVersion> {
        self.versions.iter().find(|v| v.id == version_id)
    }

    pub fn version_position(&self, version_id: Uuid) -> Option<usize> {
        self.versions.iter().position(|v| v.id == version_id)
    }

    /// Length of the longest message sequence in the tree
    pub fn row_count(&self) -> usize {
        self.versions
            .iter()
            .map(|v| v.messages.len())
            .max()
            .unwrap_or(0)
    }
}

impl From<&Conversation> for BranchedConversation {
    fn from(conversation: &Conversation) -> Self {
        Self {
            id: conversation.id,
            title: conversation.title.clone(),
            created_at: conversation.created_at,
            modified_at: conversation.modified_at,
            active_version: conversation.active_version,
            versions: conversation
                .versions
                .iter()
                .map(|v| BranchedVersion::from_version(v, conversation))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn summary(offset_secs: i64) -> VersionSummary {
        VersionSummary {
            id: Uuid::new_v4(),
            created_at: DateTime::<Utc>::UNIX_EPOCH + Duration::seconds(offset_secs),
        }
    }

    #[test]
    fn test_insert_version_keeps_order() {
        let mut message = BranchedMessage::from(&Message::user("hi"));
        let late = summary(30);
        let early = summary(10);
        let middle = summary(20);

        message.insert_version(late.clone());
        message.insert_version(early.clone());
        message.insert_version(middle.clone());

        assert_eq!(message.versions, vec![early, middle, late]);
    }

    #[test]
    fn test_insert_version_once_skips_duplicates() {
        let mut message = BranchedMessage::from(&Message::user("hi"));
        let entry = summary(5);

        message.insert_version_once(entry.clone());
        message.insert_version_once(entry.clone());
        assert_eq!(message.versions.len(), 1);

        message.insert_version(entry);
        assert_eq!(message.versions.len(), 2);
    }

    #[test]
    fn test_view_marks_active_version() {
        let conversation =
            Conversation::with_root_version(None, vec![Message::user("Hi what up?")]);
        let view = BranchedConversation::from(&conversation);

        assert_eq!(view.versions.len(), 1);
        assert!(view.versions[0].active);
        assert_eq!(view.versions[0].created_at, conversation.created_at);
        assert!(view.versions[0].messages[0].versions.is_empty());
    }
}
