use thiserror::Error;
use uuid::Uuid;

pub type Result<T, E = ConversationError> = std::result::Result<T, E>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversationError {
    #[error("Conversation not found: {0}")]
    ConversationNotFound(Uuid),

    #[error("Version not found: {0}")]
    VersionNotFound(Uuid),

    #[error("Root message not found")]
    RootMessageNotFound,

    #[error("Root message not part of the conversation")]
    RootMessageNotInConversation(Uuid),

    #[error("Conversation has no active version")]
    NoActiveVersion,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A version's stored content disagrees with its parent before the
    /// declared fork point.
    #[error(
        "Content mismatch between current message and parent message \
         (version {version}, parent {parent}, position {position})"
    )]
    ContentMismatch {
        version: Uuid,
        parent: Uuid,
        position: usize,
    },
}

/// Coarse classification used by callers to pick a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvalidRequest,
    ReconciliationFault,
}

impl ConversationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConversationError::ConversationNotFound(_)
            | ConversationError::VersionNotFound(_)
            | ConversationError::RootMessageNotFound => ErrorKind::NotFound,
            ConversationError::RootMessageNotInConversation(_)
            | ConversationError::NoActiveVersion
            | ConversationError::InvalidRequest(_) => ErrorKind::InvalidRequest,
            ConversationError::ContentMismatch { .. } => ErrorKind::ReconciliationFault,
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        ConversationError::InvalidRequest(message.into())
    }
}
