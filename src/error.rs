use crate::models::Mode;
use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    /// Client payload failed bounds/shape checks; one message per field.
    #[error("{}", .0.join(", "))]
    Validation(Vec<String>),

    /// Required deployment configuration is missing. The message names the
    /// variable, never its value.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Upstream returned non-2xx.
    #[error("Upstream error {status}: {body}")]
    UpstreamHttp { status: u16, body: String },

    /// Upstream returned 2xx in a shape the normalizer does not recognize.
    #[error("Upstream response did not contain images: {0}")]
    UnrecognizedPayload(String),

    /// Both the primary and fallback model attempts failed. Primary comes
    /// first; neither diagnostic is dropped.
    #[error("Image generation failed.\nPrimary ({primary_model}): {primary_error}\nFallback ({fallback_model}): {fallback_error}")]
    FallbackExhausted {
        primary_model: String,
        primary_error: String,
        fallback_model: String,
        fallback_error: String,
    },

    /// Explicit stub for modes the selected backend cannot serve yet.
    #[error("{0} generation is not yet supported")]
    UnsupportedMode(Mode),

    /// Transport-level failure, including the client's own timeout.
    #[error("Upstream request failed: {0}")]
    Http(#[from] reqwest::Error),
}

impl BridgeError {
    pub fn status(&self) -> StatusCode {
        match self {
            BridgeError::Validation(_) => StatusCode::BAD_REQUEST,
            BridgeError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            BridgeError::UpstreamHttp { .. } => StatusCode::BAD_GATEWAY,
            BridgeError::UnrecognizedPayload(_) => StatusCode::INTERNAL_SERVER_ERROR,
            BridgeError::FallbackExhausted { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            BridgeError::UnsupportedMode(_) => StatusCode::NOT_IMPLEMENTED,
            BridgeError::Http(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl ResponseError for BridgeError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_joins_field_messages() {
        let error = BridgeError::Validation(vec![
            "prompt is required".to_string(),
            "width must be between 256 and 1536".to_string(),
        ]);
        assert_eq!(
            error.to_string(),
            "prompt is required, width must be between 256 and 1536"
        );
        assert_eq!(error.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_upstream_http_carries_status_and_body() {
        let error = BridgeError::UpstreamHttp {
            status: 503,
            body: "model loading".to_string(),
        };
        assert_eq!(error.to_string(), "Upstream error 503: model loading");
        assert_eq!(error.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_fallback_exhausted_names_both_models_in_order() {
        let error = BridgeError::FallbackExhausted {
            primary_model: "org/primary".to_string(),
            primary_error: "model not found".to_string(),
            fallback_model: "org/fallback".to_string(),
            fallback_error: "timeout".to_string(),
        };
        let message = error.to_string();
        let primary_at = message.find("org/primary").unwrap();
        let fallback_at = message.find("org/fallback").unwrap();
        assert!(primary_at < fallback_at);
        assert!(message.contains("model not found"));
        assert!(message.contains("timeout"));
    }

    #[test]
    fn test_unsupported_mode_is_labeled() {
        let error = BridgeError::UnsupportedMode(Mode::Video);
        assert_eq!(error.to_string(), "video generation is not yet supported");
        assert_eq!(error.status(), StatusCode::NOT_IMPLEMENTED);
    }

    #[test]
    fn test_config_error_is_server_side() {
        let error = BridgeError::Config("VISION_AI_HF_BASE is not set".to_string());
        assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(error.to_string().contains("VISION_AI_HF_BASE"));
    }

    #[test]
    fn test_error_response_wraps_message_in_json_envelope() {
        let error = BridgeError::Validation(vec!["prompt is required".to_string()]);
        let response = error.error_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
