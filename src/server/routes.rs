use crate::server::handlers;
use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(handlers::health_check))
        .route("/generate", web::post().to(handlers::generate_fast))
        .route("/polish", web::post().to(handlers::polish))
        .route("/api/generate", web::post().to(handlers::api_generate))
        .route(
            "/api/generate-preview",
            web::post().to(handlers::api_generate_preview),
        )
        .route("/api/debug-env", web::get().to(handlers::debug_env));
}
