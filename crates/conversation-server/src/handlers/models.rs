use actix_web::{web, HttpResponse};

use crate::dto::ModelsResponse;
use crate::state::AppState;

/// Model presets and completion parameters the server is configured with
pub async fn handler(state: web::Data<AppState>) -> HttpResponse {
    let generation = &state.generation;
    HttpResponse::Ok().json(ModelsResponse {
        default_model: &generation.default_model,
        params: &generation.params,
        models: &generation.models,
    })
}
