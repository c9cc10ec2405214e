use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::role::Role;
use crate::error::{ConversationError, Result};

/// A single turn, owned by exactly one version.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub id: Uuid,
    pub role: Role,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content: content.into(),
            created_at: Utc::now(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Fresh copy for another version. The copy is stamped strictly after
    /// both the original and `not_before`.
    pub(crate) fn copy_after(&self, not_before: DateTime<Utc>) -> Self {
        let tick = Duration::microseconds(1);
        let created_at = Utc::now()
            .max(self.created_at + tick)
            .max(not_before + tick);
        Self {
            id: Uuid::new_v4(),
            role: self.role,
            content: self.content.clone(),
            created_at,
        }
    }
}

/// Unvalidated message payload as it arrives from a caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewMessage {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl NewMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: Some(role.into()),
            content: Some(content.into()),
        }
    }

    pub fn into_message(self) -> Result<Message> {
        let role: Role = self
            .role
            .as_deref()
            .ok_or_else(|| ConversationError::invalid("role is required"))?
            .parse()?;
        let content = self
            .content
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| ConversationError::invalid("content is required"))?;
        Ok(Message::new(role, content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_gets_new_identity_and_later_timestamp() {
        let original = Message::user("Hi what up?");
        let copy = original.copy_after(original.created_at);

        assert_ne!(copy.id, original.id);
        assert_eq!(copy.content, original.content);
        assert_eq!(copy.role, original.role);
        assert!(copy.created_at > original.created_at);
    }

    #[test]
    fn test_copy_respects_floor_in_the_future() {
        let original = Message::assistant("Hello");
        let floor = Utc::now() + Duration::hours(1);
        let copy = original.copy_after(floor);
        assert!(copy.created_at > floor);
    }

    #[test]
    fn test_new_message_requires_role_and_content() {
        let missing_role = NewMessage {
            role: None,
            content: Some("Test message".to_string()),
        };
        assert!(matches!(
            missing_role.into_message(),
            Err(ConversationError::InvalidRequest(_))
        ));

        let missing_content = NewMessage {
            role: Some("user".to_string()),
            content: None,
        };
        assert!(missing_content.into_message().is_err());

        let blank_content = NewMessage::new("user", "   ");
        assert!(blank_content.into_message().is_err());

        let message = NewMessage::new("assistant", "Hello").into_message().unwrap();
        assert_eq!(message.role, Role::Assistant);
        assert_eq!(message.content, "Hello");
    }
}
