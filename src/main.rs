use actix_web::{web, App, HttpServer};
use std::env;
use visionbridge::config::Config;
use visionbridge::hf::HfClient;
use visionbridge::logger::{self, LogLevel, LoggerConfig};
use visionbridge::server::{routes, AppState};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    logger::init_with_config(LoggerConfig::development().with_level(LogLevel::Debug))
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    match dotenv::dotenv() {
        Ok(_) => log::info!("✅ .env file loaded successfully"),
        Err(_) => log::warn!("⚠️  No .env file found, using system environment variables"),
    }

    log::info!("🔍 Checking Hugging Face environment...");

    match env::var("VISION_AI_HF_BASE") {
        Ok(base) => log::info!("VISION_AI_HF_BASE: {}", base),
        Err(_) => log::warn!("⚠️  VISION_AI_HF_BASE is not set; generation requests will fail"),
    }

    // Check the token without printing the actual value for security
    match env::var("HF_INFERENCE_TOKEN") {
        Ok(token) => {
            log::info!("✅ HF_INFERENCE_TOKEN found in environment");
            log::debug!("Token length: {}", token.len());
        }
        Err(_) => {
            log::warn!("⚠️  No HF_INFERENCE_TOKEN set; only .hf.space routing will work");
        }
    }

    if let Ok(model) = env::var("VISION_AI_HF_MODEL") {
        log::info!("VISION_AI_HF_MODEL: {}", model);
    }
    if let Ok(fallback) = env::var("HF_MODEL_IMAGE_ALT") {
        log::info!("HF_MODEL_IMAGE_ALT: {}", fallback);
    }

    let config = Config::from_env();
    let port = config.port.unwrap_or(8080);
    logger::log_startup_info("visionbridge", env!("CARGO_PKG_VERSION"), port);

    let client = HfClient::new(config.hf.clone()).map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    let state = web::Data::new(AppState { client });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(routes::configure)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
