pub mod fallback;
pub mod normalizer;
pub mod router;

use crate::config::HfConfig;
use crate::error::Result;
use crate::models::{GenerationRequest, RawUpstream};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

pub use fallback::{run_with_fallback, TextToImage};
pub use router::{BackendTarget, DEFAULT_IMAGE_MODEL};

/// The upstream client's own timeout is the only bound on a generation call;
/// diffusion on a cold model can legitimately take minutes.
const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(120);

/// Bridge client: resolves the backend target from configuration, submits the
/// upstream call (one or two attempts), and normalizes the response. Stateless
/// between requests; cheap to clone.
#[derive(Clone)]
pub struct HfClient {
    http: reqwest::Client,
    config: HfConfig,
}

impl HfClient {
    pub fn new(config: HfConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(UPSTREAM_TIMEOUT)
            .build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &HfConfig {
        &self.config
    }

    /// Full bridge pass: Route -> Call(x1 or x2) -> Normalize. Returns an
    /// ordered, non-empty list of image data URIs.
    pub async fn generate(&self, request: &GenerationRequest) -> Result<Vec<String>> {
        match BackendTarget::resolve(&self.config, request.mode)? {
            BackendTarget::Space { base_url, path } => {
                let url = router::space_url(&base_url, path);
                log::info!("Dispatching {} generation to space endpoint {}", request.mode, url);
                let raw = post_json(&self.http, &url, &router::space_payload(request), None).await?;
                normalizer::normalize(&raw)
            }
            BackendTarget::InferenceApi {
                model_id,
                fallback_model_id,
                token,
            } => {
                let caller = InferenceCaller {
                    http: &self.http,
                    token: &token,
                };
                fallback::run_with_fallback(
                    &caller,
                    &model_id,
                    fallback_model_id.as_deref(),
                    request,
                )
                .await
            }
        }
    }
}

/// One Inference API attempt for a single model id.
struct InferenceCaller<'a> {
    http: &'a reqwest::Client,
    token: &'a str,
}

#[async_trait]
impl TextToImage for InferenceCaller<'_> {
    async fn text_to_image(
        &self,
        model_id: &str,
        request: &GenerationRequest,
    ) -> Result<Vec<String>> {
        let url = router::inference_url(model_id);
        log::info!("Invoking model: {}", model_id);
        let payload = router::inference_payload(request);
        log::debug!("Inference request payload: {}", payload);

        let raw = post_json(self.http, &url, &payload, Some(self.token)).await?;
        normalizer::normalize(&raw)
    }
}

async fn post_json(
    http: &reqwest::Client,
    url: &str,
    payload: &Value,
    bearer: Option<&str>,
) -> Result<RawUpstream> {
    let mut builder = http.post(url).json(payload);
    if let Some(token) = bearer {
        builder = builder.bearer_auth(token);
    }

    let response = builder.send().await?;
    let status = response.status().as_u16();
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = response.bytes().await?.to_vec();

    Ok(RawUpstream {
        status,
        content_type,
        body,
    })
}
