use std::env;

/// Upstream routing configuration, read once at startup and passed into the
/// client. The base URL's host shape decides Space vs Inference-API routing;
/// the token is only required on the Inference-API branch.
#[derive(Debug, Clone)]
pub struct HfConfig {
    pub base_url: Option<String>,
    pub token: Option<String>,
    pub model_id: Option<String>,
    pub fallback_model_id: Option<String>,
}

impl Default for HfConfig {
    fn default() -> Self {
        HfConfig {
            base_url: None,
            token: None,
            model_id: None,
            fallback_model_id: None,
        }
    }
}

impl HfConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        HfConfig {
            base_url: non_empty_var("VISION_AI_HF_BASE"),
            token: non_empty_var("HF_INFERENCE_TOKEN"),
            model_id: non_empty_var("VISION_AI_HF_MODEL"),
            fallback_model_id: non_empty_var("HF_MODEL_IMAGE_ALT"),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_model(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = Some(model_id.into());
        self
    }

    pub fn with_fallback_model(mut self, model_id: impl Into<String>) -> Self {
        self.fallback_model_id = Some(model_id.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: Option<u16>,
    pub hf: HfConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: None,
            hf: HfConfig::default(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let port = env::var("PORT").ok().and_then(|port| port.parse().ok());

        Config {
            port,
            hf: HfConfig::from_env(),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn with_hf(mut self, config: HfConfig) -> Self {
        self.hf = config;
        self
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
