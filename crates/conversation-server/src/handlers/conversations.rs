use actix_web::{web, HttpResponse};
use conversation_core::{branched, BranchedConversation, Conversation, Message};
use uuid::Uuid;

use crate::dto::{parse_body, CreateConversationRequest};
use crate::error::Result;
use crate::state::AppState;

pub async fn list(state: web::Data<AppState>) -> Result<HttpResponse> {
    let conversations = state.live_conversations().await;
    Ok(HttpResponse::Ok().json(conversations))
}

/// Every live conversation with sibling annotations, newest first.
/// A single inconsistent tree fails the whole listing.
pub async fn list_branched(state: web::Data<AppState>) -> Result<HttpResponse> {
    let conversations = state.live_conversations().await;
    let views = conversations
        .iter()
        .map(branched)
        .collect::<conversation_core::Result<Vec<BranchedConversation>>>()
        .map_err(|e| {
            log::error!("Reconciliation failed while listing: {}", e);
            e
        })?;
    Ok(HttpResponse::Ok().json(views))
}

pub async fn create(
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse> {
    let request: CreateConversationRequest = parse_body(&body)?;

    let messages = request
        .messages
        .unwrap_or_default()
        .into_iter()
        .map(|m| m.into_message())
        .collect::<conversation_core::Result<Vec<Message>>>()?;

    let title = request.title.filter(|t| !t.trim().is_empty());
    let mut conversation = Conversation::with_root_version(None, messages);
    if title.is_some() {
        conversation.rename(title)?;
    }

    state.insert(conversation.clone()).await?;
    log::info!(
        "[{}] Conversation created with {} messages",
        conversation.id,
        conversation.versions[0].messages.len()
    );
    Ok(HttpResponse::Created().json(conversation))
}

pub async fn get(state: web::Data<AppState>, path: web::Path<Uuid>) -> Result<HttpResponse> {
    let conversation = state.conversation(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(conversation))
}

pub async fn get_branched(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let conversation = state.conversation(path.into_inner()).await?;
    let view = branched(&conversation).map_err(|e| {
        log::error!("[{}] Reconciliation failed: {}", conversation.id, e);
        e
    })?;
    Ok(HttpResponse::Ok().json(view))
}

/// Hard delete: the conversation and all of its versions and messages.
pub async fn remove(state: web::Data<AppState>, path: web::Path<Uuid>) -> Result<HttpResponse> {
    let id = path.into_inner();
    state.remove(id).await?;
    log::info!("[{}] Conversation deleted", id);
    Ok(HttpResponse::NoContent().finish())
}
