use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::error::Result;
use crate::state::AppState;

/// Soft delete: the conversation stays on disk but disappears from the API.
pub async fn handler(state: web::Data<AppState>, path: web::Path<Uuid>) -> Result<HttpResponse> {
    let id = path.into_inner();

    state
        .update(id, |c| {
            c.soft_delete();
            Ok(())
        })
        .await?;
    log::info!("[{}] Conversation marked as deleted", id);
    Ok(HttpResponse::NoContent().finish())
}
