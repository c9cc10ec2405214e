use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use std::io;

use crate::config::ServerConfig;
use crate::handlers;
use crate::state::AppState;

pub fn app_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .route("/health", web::get().to(handlers::health::handler))
            .route("/models", web::get().to(handlers::models::handler))
            .route(
                "/conversations",
                web::get().to(handlers::conversations::list),
            )
            .route(
                "/conversations",
                web::post().to(handlers::conversations::create),
            )
            // Must stay ahead of `/conversations/{id}`
            .route(
                "/conversations/branched",
                web::get().to(handlers::conversations::list_branched),
            )
            .route(
                "/conversations/{id}",
                web::get().to(handlers::conversations::get),
            )
            .route(
                "/conversations/{id}",
                web::delete().to(handlers::conversations::remove),
            )
            .route(
                "/conversations/{id}/branched",
                web::get().to(handlers::conversations::get_branched),
            )
            .route(
                "/conversations/{id}/title",
                web::put().to(handlers::title::handler),
            )
            .route(
                "/conversations/{id}/delete",
                web::put().to(handlers::delete::handler),
            )
            .route(
                "/conversations/{id}/messages",
                web::post().to(handlers::messages::add_to_conversation),
            )
            .route(
                "/conversations/{id}/versions",
                web::post().to(handlers::versions::create),
            )
            .route(
                "/conversations/{id}/versions/{version_id}/activate",
                web::put().to(handlers::versions::activate),
            )
            .route(
                "/versions/{id}/messages",
                web::post().to(handlers::messages::add_to_version),
            ),
    );
}

pub async fn run_server_with_config(config: ServerConfig) -> io::Result<()> {
    log::info!(
        "Initializing server with data dir: {:?}, default model: {}",
        config.data_dir,
        config.generation.default_model
    );
    let state = web::Data::new(AppState::new_with_config(&config).await?);

    let bind_address = config.bind_address();
    log::info!("Starting server on {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .wrap(Cors::permissive())
            .configure(app_config)
    })
    .bind(bind_address)?
    .run()
    .await
}
