use crate::error::BridgeError;
use crate::hf::{router, HfClient};
use crate::models::{DiffusionRequest, ImagesResponse, Mode, PreviewResponse, StudioRequest};
use crate::validate;
use actix_web::{web, HttpResponse};
use base64::{engine::general_purpose, Engine as _};
use serde_json::json;
use std::time::Instant;
use uuid::Uuid;

pub struct AppState {
    pub client: HfClient,
}

pub async fn health_check() -> &'static str {
    "OK"
}

/// `POST /generate` — studio shape, fast defaults.
pub async fn generate_fast(
    state: web::Data<AppState>,
    body: web::Json<StudioRequest>,
) -> Result<HttpResponse, BridgeError> {
    studio_generate(&state, &body, Mode::Preview).await
}

/// `POST /polish` — studio shape, quality defaults.
pub async fn polish(
    state: web::Data<AppState>,
    body: web::Json<StudioRequest>,
) -> Result<HttpResponse, BridgeError> {
    studio_generate(&state, &body, Mode::Polish).await
}

async fn studio_generate(
    state: &web::Data<AppState>,
    body: &StudioRequest,
    default_mode: Mode,
) -> Result<HttpResponse, BridgeError> {
    let request_id = Uuid::new_v4();
    let request = validate::validate_studio(body, default_mode).map_err(BridgeError::Validation)?;

    log::info!(
        "[req:{}] {} generation: {}x{}, {} steps, guidance {}",
        request_id,
        request.mode,
        request.width,
        request.height,
        request.steps,
        request.guidance
    );

    let started = Instant::now();
    let images = state.client.generate(&request).await.map_err(|e| {
        log::error!("[req:{}] generation failed: {}", request_id, e);
        e
    })?;

    log::info!(
        "[req:{}] returned {} image(s) in {}ms",
        request_id,
        images.len(),
        started.elapsed().as_millis()
    );

    Ok(HttpResponse::Ok().json(ImagesResponse { images }))
}

/// `POST /api/generate` — diffusion shape; answers with raw image bytes and
/// the upstream content type, like the original diffusion endpoint.
pub async fn api_generate(
    state: web::Data<AppState>,
    body: web::Json<DiffusionRequest>,
) -> HttpResponse {
    let request_id = Uuid::new_v4();
    let request = match validate::validate_diffusion(&body, Mode::Image) {
        Ok(request) => request,
        Err(errors) => return api_error(request_id, BridgeError::Validation(errors)),
    };

    let images = match state.client.generate(&request).await {
        Ok(images) => images,
        Err(e) => return api_error(request_id, e),
    };

    // The bytes endpoint can only serve a self-contained data URI. A
    // ready-to-use remote URL from shape 1 is proxied back as JSON instead.
    match normalized_bytes(&images[0]) {
        Some((content_type, bytes)) => {
            log::info!(
                "[req:{}] returning {} raw bytes ({})",
                request_id,
                bytes.len(),
                content_type
            );
            HttpResponse::Ok()
                .content_type(content_type)
                .insert_header(("Cache-Control", "no-store"))
                .body(bytes)
        }
        None => HttpResponse::Ok().json(json!({ "ok": true, "images": images })),
    }
}

/// `POST /api/generate-preview` — diffusion shape plus a `mode` field; video
/// and remix are explicit not-yet-supported stubs, never silent placeholders.
pub async fn api_generate_preview(
    state: web::Data<AppState>,
    body: web::Json<DiffusionRequest>,
) -> HttpResponse {
    let request_id = Uuid::new_v4();
    let request = match validate::validate_diffusion(&body, Mode::Image) {
        Ok(request) => request,
        Err(errors) => return api_error(request_id, BridgeError::Validation(errors)),
    };

    if matches!(request.mode, Mode::Video | Mode::Remix) {
        return api_error(request_id, BridgeError::UnsupportedMode(request.mode));
    }

    match state.client.generate(&request).await {
        Ok(images) => HttpResponse::Ok().json(PreviewResponse {
            ok: true,
            image_url: images[0].clone(),
        }),
        Err(e) => api_error(request_id, e),
    }
}

/// `GET /api/debug-env` — echoes whether required configuration is present.
/// Reports presence only; the token value never leaves the process.
pub async fn debug_env(state: web::Data<AppState>) -> HttpResponse {
    let config = state.client.config();
    let base = config
        .base_url
        .as_deref()
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .map(|b| b.trim_end_matches('/').to_string());
    let is_space = base.as_deref().map(router::is_space_host).unwrap_or(false);
    let target_url = match &base {
        Some(base) if is_space => router::space_url(base, "/generate"),
        Some(_) => "(inference-api mode)".to_string(),
        None => "(unconfigured)".to_string(),
    };

    HttpResponse::Ok().json(json!({
        "base": if base.is_some() { "(set)" } else { "(missing)" },
        "is_space": is_space,
        "target_url": target_url,
        "has_token": config.token.is_some(),
        "model": config
            .model_id
            .as_deref()
            .unwrap_or(crate::hf::DEFAULT_IMAGE_MODEL),
        "has_fallback_model": config.fallback_model_id.is_some(),
    }))
}

fn api_error(request_id: Uuid, error: BridgeError) -> HttpResponse {
    log::error!("[req:{}] {}", request_id, error);
    HttpResponse::build(error.status()).json(json!({ "ok": false, "error": error.to_string() }))
}

fn normalized_bytes(data_url: &str) -> Option<(String, Vec<u8>)> {
    let (content_type, b64) = crate::hf::normalizer::data_url_parts(data_url)?;
    let bytes = general_purpose::STANDARD.decode(b64).ok()?;
    Some((content_type, bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HfConfig;
    use crate::server::routes;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use serde_json::Value;

    // None of these tests leave the process: they exercise the validation,
    // config, and stub paths that fail before any upstream call.

    fn state(config: HfConfig) -> web::Data<AppState> {
        web::Data::new(AppState {
            client: HfClient::new(config).unwrap(),
        })
    }

    macro_rules! app {
        ($config:expr) => {
            test::init_service(
                App::new()
                    .app_data(state($config))
                    .configure(routes::configure),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_health_check() {
        let app = app!(HfConfig::new());
        let response = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_generate_rejects_missing_prompt_with_400() {
        let app = app!(HfConfig::new());
        let request = test::TestRequest::post()
            .uri("/generate")
            .set_json(json!({ "width": 512 }))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("prompt is required"));
    }

    #[actix_web::test]
    async fn test_generate_rejects_out_of_range_width() {
        let app = app!(HfConfig::new());
        let request = test::TestRequest::post()
            .uri("/generate")
            .set_json(json!({ "prompt": "a cat", "width": 4096 }))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(response).await;
        assert!(body["error"]
            .as_str()
            .unwrap()
            .contains("width must be between 256 and 1536"));
    }

    #[actix_web::test]
    async fn test_generate_without_base_url_is_a_config_error() {
        let app = app!(HfConfig::new());
        let request = test::TestRequest::post()
            .uri("/generate")
            .set_json(json!({ "prompt": "a cat" }))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body: Value = test::read_body_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("VISION_AI_HF_BASE"));
    }

    #[actix_web::test]
    async fn test_missing_token_in_inference_mode_is_a_config_error() {
        let app = app!(HfConfig::new().with_base_url("https://example.com"));
        let request = test::TestRequest::post()
            .uri("/polish")
            .set_json(json!({ "prompt": "a cat" }))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body: Value = test::read_body_json(response).await;
        let message = body["error"].as_str().unwrap();
        assert!(message.contains("HF_INFERENCE_TOKEN"));
        assert!(!message.contains("hf_secret"));
    }

    #[actix_web::test]
    async fn test_preview_video_mode_is_an_explicit_stub() {
        let app = app!(HfConfig::new()
            .with_base_url("https://example.com")
            .with_token("hf_secret"));
        let request = test::TestRequest::post()
            .uri("/api/generate-preview")
            .set_json(json!({ "mode": "video", "prompt": "a cat" }))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);

        let body: Value = test::read_body_json(response).await;
        assert_eq!(body["ok"], false);
        assert!(body["error"].as_str().unwrap().contains("not yet supported"));
    }

    #[actix_web::test]
    async fn test_api_generate_validation_uses_ok_false_envelope() {
        let app = app!(HfConfig::new());
        let request = test::TestRequest::post()
            .uri("/api/generate")
            .set_json(json!({ "prompt": "", "num_inference_steps": 200 }))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(response).await;
        assert_eq!(body["ok"], false);
        let message = body["error"].as_str().unwrap();
        assert!(message.contains("prompt is required"));
        assert!(message.contains("num_inference_steps"));
    }

    #[actix_web::test]
    async fn test_debug_env_never_leaks_the_token() {
        let app = app!(HfConfig::new()
            .with_base_url("https://acme-diffusion.hf.space/")
            .with_token("hf_secret_value")
            .with_model("org/primary"));
        let request = test::TestRequest::get().uri("/api/debug-env").to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = test::read_body(response).await;
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(!text.contains("hf_secret_value"));

        let body: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(body["base"], "(set)");
        assert_eq!(body["is_space"], true);
        assert_eq!(body["has_token"], true);
        assert_eq!(body["model"], "org/primary");
        assert_eq!(
            body["target_url"],
            "https://acme-diffusion.hf.space/generate"
        );
    }

    #[actix_web::test]
    async fn test_debug_env_reports_inference_mode() {
        let app = app!(HfConfig::new().with_base_url("https://example.com"));
        let request = test::TestRequest::get().uri("/api/debug-env").to_request();
        let response = test::call_service(&app, request).await;

        let body: Value = test::read_body_json(response).await;
        assert_eq!(body["is_space"], false);
        assert_eq!(body["has_token"], false);
        assert_eq!(body["target_url"], "(inference-api mode)");
        assert_eq!(body["model"], crate::hf::DEFAULT_IMAGE_MODEL);
    }
}
