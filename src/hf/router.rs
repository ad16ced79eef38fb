use crate::config::HfConfig;
use crate::error::{BridgeError, Result};
use crate::models::{GenerationRequest, Mode};
use serde_json::{json, Value};

/// The managed Inference API ignores the configured base URL; every call goes
/// to this host with the model id appended.
pub const INFERENCE_API_BASE: &str = "https://api-inference.huggingface.co/models";
pub const DEFAULT_IMAGE_MODEL: &str = "black-forest-labs/FLUX.1-schnell";

/// The concrete upstream to call, resolved once per request from the static
/// configuration. Exactly one variant is active per deployment.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendTarget {
    /// Self-hosted generation Space, reached by plain HTTP without per-call auth.
    Space {
        base_url: String,
        path: &'static str,
    },
    /// Managed multi-tenant endpoint; requires a bearer token and model id.
    InferenceApi {
        model_id: String,
        fallback_model_id: Option<String>,
        token: String,
    },
}

impl BackendTarget {
    /// Decision rule: a base URL whose host ends in `.hf.space` selects the
    /// Space branch; anything else selects the Inference API and requires a
    /// token. Missing configuration is a ConfigError here, before any network
    /// call, never an upstream error.
    pub fn resolve(config: &HfConfig, mode: Mode) -> Result<Self> {
        let base = config
            .base_url
            .as_deref()
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .ok_or_else(|| BridgeError::Config("VISION_AI_HF_BASE is not set".to_string()))?;
        let base = base.trim_end_matches('/');

        if is_space_host(base) {
            let path = match mode {
                Mode::Video => "/generate_video",
                Mode::Remix => return Err(BridgeError::UnsupportedMode(mode)),
                _ => "/generate",
            };
            return Ok(BackendTarget::Space {
                base_url: base.to_string(),
                path,
            });
        }

        if matches!(mode, Mode::Video | Mode::Remix) {
            return Err(BridgeError::UnsupportedMode(mode));
        }

        let token = config
            .token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                BridgeError::Config(
                    "HF_INFERENCE_TOKEN is required when VISION_AI_HF_BASE is not a .hf.space URL"
                        .to_string(),
                )
            })?;

        Ok(BackendTarget::InferenceApi {
            model_id: config
                .model_id
                .clone()
                .unwrap_or_else(|| DEFAULT_IMAGE_MODEL.to_string()),
            fallback_model_id: config.fallback_model_id.clone(),
            token: token.to_string(),
        })
    }
}

/// Case-insensitive host check for the reserved self-hosted-space pattern.
pub fn is_space_host(base_url: &str) -> bool {
    let without_scheme = base_url
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or(base_url);
    let host = without_scheme
        .split(['/', '?', '#'])
        .next()
        .unwrap_or(without_scheme);
    let host = host.rsplit('@').next().unwrap_or(host);
    let host = host.split(':').next().unwrap_or(host);
    host.to_ascii_lowercase().ends_with(".hf.space")
}

pub fn space_url(base_url: &str, path: &str) -> String {
    if path.starts_with('/') {
        format!("{}{}", base_url, path)
    } else {
        format!("{}/{}", base_url, path)
    }
}

pub fn inference_url(model_id: &str) -> String {
    format!("{}/{}", INFERENCE_API_BASE, model_id)
}

/// Flat snake_case body the Space `/generate` endpoint expects. Absent
/// optionals are sent as explicit nulls, matching what the Space tolerates.
pub fn space_payload(request: &GenerationRequest) -> Value {
    json!({
        "prompt": request.prompt,
        "negative_prompt": request.negative_prompt.clone().unwrap_or_default(),
        "width": request.width,
        "height": request.height,
        "steps": request.steps,
        "guidance": request.guidance,
        "seed": request.seed,
        "init_image": request.init_image_data_url,
        "strength": request.strength,
        "mode": request.mode.as_str(),
    })
}

/// `{inputs, parameters, options}` envelope for the Inference API. `seed` and
/// `negative_prompt` are omitted entirely when absent; `wait_for_model` keeps
/// cold models from answering 503 while they load.
pub fn inference_payload(request: &GenerationRequest) -> Value {
    let mut parameters = json!({
        "width": request.width,
        "height": request.height,
        "guidance_scale": request.guidance,
        "num_inference_steps": request.steps,
    });
    if let Some(negative_prompt) = &request.negative_prompt {
        parameters["negative_prompt"] = json!(negative_prompt);
    }
    if let Some(seed) = request.seed {
        parameters["seed"] = json!(seed);
    }

    json!({
        "inputs": request.prompt,
        "parameters": parameters,
        "options": { "wait_for_model": true },
    })
}
