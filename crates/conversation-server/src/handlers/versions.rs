use actix_web::{web, HttpResponse};
use conversation_core::{branch_active, switch_active, ConversationError};
use uuid::Uuid;

use crate::dto::{parse_body, CreateVersionRequest, VersionCreatedResponse};
use crate::error::Result;
use crate::state::AppState;

/// Fork the active version at `root_message_id`; the fork becomes active.
pub async fn create(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Bytes,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let request: CreateVersionRequest = parse_body(&body)?;
    let root_message_id = request.root_message_id;

    let response = state
        .update(id, |c| {
            let created = branch_active(c, root_message_id)?;
            let version = c
                .version(created.new_version_id)
                .cloned()
                .ok_or(ConversationError::VersionNotFound(created.new_version_id))?;
            Ok(VersionCreatedResponse { created, version })
        })
        .await?;
    log::info!(
        "[{}] Version {} created from {} ({} messages copied)",
        id,
        response.created.new_version_id,
        response.created.parent_version_id,
        response.created.copied_message_count
    );
    Ok(HttpResponse::Created().json(response))
}

pub async fn activate(
    state: web::Data<AppState>,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse> {
    let (id, version_id) = path.into_inner();

    state.update(id, |c| switch_active(c, version_id)).await?;
    log::info!("[{}] Active version switched to {}", id, version_id);
    Ok(HttpResponse::NoContent().finish())
}
