use actix_web::{web, HttpResponse};
use conversation_core::{ConversationError, NewMessage};
use uuid::Uuid;

use crate::dto::parse_body;
use crate::error::Result;
use crate::state::AppState;

/// Append a message to the conversation's active version
pub async fn add_to_conversation(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Bytes,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let message: NewMessage = parse_body(&body)?;

    let created = state
        .update(id, |c| {
            let message = message.into_message()?;
            c.add_message_to_active(message).cloned()
        })
        .await?;
    log::info!("[{}] Message {} added to active version", id, created.id);
    Ok(HttpResponse::Created().json(created))
}

pub async fn add_to_version(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Bytes,
) -> Result<HttpResponse> {
    let version_id = path.into_inner();
    let conversation_id = owning_conversation(&state, version_id)
        .await
        .ok_or(ConversationError::VersionNotFound(version_id))?;
    let message: NewMessage = parse_body(&body)?;

    let created = state
        .update(conversation_id, |c| {
            let message = message.into_message()?;
            c.add_message(version_id, message).cloned()
        })
        .await?;
    log::info!(
        "[{}] Message {} added to version {}",
        conversation_id,
        created.id,
        version_id
    );
    Ok(HttpResponse::Created().json(created))
}

async fn owning_conversation(state: &AppState, version_id: Uuid) -> Option<Uuid> {
    let conversations = state.conversations.read().await;
    conversations
        .values()
        .filter(|c| !c.is_deleted())
        .find(|c| c.has_version(version_id))
        .map(|c| c.id)
}
