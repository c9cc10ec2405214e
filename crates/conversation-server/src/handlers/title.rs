use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::dto::{parse_body, TitleRequest};
use crate::error::Result;
use crate::state::AppState;

pub async fn handler(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Bytes,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let request: TitleRequest = parse_body(&body)?;
    let title = request.title;

    state.update(id, |c| c.rename(title)).await?;
    log::info!("[{}] Conversation renamed", id);
    Ok(HttpResponse::NoContent().finish())
}
