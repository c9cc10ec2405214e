//! Request and response bodies for the HTTP API

use conversation_core::{BranchCreated, ConversationError, NewMessage, Version};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{CompletionParams, ModelPreset};

/// Decode a JSON request body. An empty body yields the defaults; anything
/// that does not decode is an invalid request.
pub fn parse_body<T: DeserializeOwned + Default>(body: &[u8]) -> conversation_core::Result<T> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| ConversationError::invalid(format!("invalid request body: {e}")))
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateConversationRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub messages: Option<Vec<NewMessage>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TitleRequest {
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateVersionRequest {
    #[serde(default)]
    pub root_message_id: Option<Uuid>,
}

/// Branch outcome plus the stored version it produced
#[derive(Debug, Serialize)]
pub struct VersionCreatedResponse {
    #[serde(flatten)]
    pub created: BranchCreated,
    pub version: Version,
}

#[derive(Debug, Serialize)]
pub struct ModelsResponse<'a> {
    pub default_model: &'a str,
    pub params: &'a CompletionParams,
    pub models: &'a [ModelPreset],
}
