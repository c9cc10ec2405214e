use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::message::Message;
use super::version::Version;
use crate::error::{ConversationError, Result};

pub const DEFAULT_TITLE: &str = "New conversation";
pub const MAX_TITLE_LEN: usize = 100;

/// Top-level entity owning a tree of versions.
///
/// Versions are kept in a flat arena in creation order; tree edges are the
/// `parent_version` / `root_message` keys on each version.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Conversation {
    pub id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    /// Non-null means logically deleted but retained
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub active_version: Option<Uuid>,
    #[serde(default)]
    pub versions: Vec<Version>,
}

impl Conversation {
    /// Empty conversation without any version
    pub fn new(title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            created_at: now,
            modified_at: now,
            deleted_at: None,
            active_version: None,
            versions: Vec::new(),
        }
    }

    /// Conversation with a single active root version holding `messages`
    pub fn with_root_version(title: Option<String>, messages: Vec<Message>) -> Self {
        let title = title
            .filter(|title| !title.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TITLE.to_string());
        let mut conversation = Self::new(title);
        let mut root = Version::root(conversation.id);
        root.messages = messages;
        conversation.active_version = Some(root.id);
        conversation.versions.push(root);
        conversation
    }

    pub fn version(&self, version_id: Uuid) -> Option<&Version> {
        self.versions.iter().find(|v| v.id == version_id)
    }

    pub fn version_mut(&mut self, version_id: Uuid) -> Option<&mut Version> {
        self.versions.iter_mut().find(|v| v.id == version_id)
    }

    pub fn has_version(&self, version_id: Uuid) -> bool {
        self.version(version_id).is_some()
    }

    pub fn active_version(&self) -> Option<&Version> {
        self.active_version.and_then(|id| self.version(id))
    }

    /// Find a message anywhere in the tree
    pub fn message(&self, message_id: Uuid) -> Option<&Message> {
        self.versions.iter().find_map(|v| v.message(message_id))
    }

    pub fn rename(&mut self, title: Option<String>) -> Result<()> {
        let title = title
            .map(|title| title.trim().to_string())
            .filter(|title| !title.is_empty())
            .ok_or_else(|| ConversationError::invalid("title is required"))?;
        if title.chars().count() > MAX_TITLE_LEN {
            return Err(ConversationError::invalid(format!(
                "title must be at most {MAX_TITLE_LEN} characters"
            )));
        }
        self.title = title;
        self.touch();
        Ok(())
    }

    pub fn add_message(&mut self, version_id: Uuid, message: Message) -> Result<&Message> {
        let index = self
            .versions
            .iter()
            .position(|v| v.id == version_id)
            .ok_or(ConversationError::VersionNotFound(version_id))?;
        self.touch();
        Ok(self.versions[index].push_message(message))
    }

    pub fn add_message_to_active(&mut self, message: Message) -> Result<&Message> {
        let active = self
            .active_version()
            .map(|v| v.id)
            .ok_or(ConversationError::NoActiveVersion)?;
        self.add_message(active, message)
    }

    pub fn soft_delete(&mut self) {
        if self.deleted_at.is_none() {
            let now = Utc::now();
            self.deleted_at = Some(now);
            self.modified_at = now;
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    pub fn touch(&mut self) {
        self.modified_at = Utc::now();
    }
}
