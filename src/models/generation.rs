use serde::{Deserialize, Serialize};
use std::fmt;

/// Generation intent. `preview` and `image` share the fast defaults; `polish`
/// (also accepted as `ultra`) is the quality tier. `video` and `remix` are
/// routed but not yet backed by a generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Preview,
    #[serde(alias = "ultra")]
    Polish,
    Image,
    Video,
    Remix,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Preview => "preview",
            Mode::Polish => "polish",
            Mode::Image => "image",
            Mode::Video => "video",
            Mode::Remix => "remix",
        }
    }

    /// Defaults filled in for fields the client left unset. An explicit client
    /// value always wins over these.
    pub fn defaults(&self) -> ModeDefaults {
        match self {
            Mode::Polish => ModeDefaults {
                width: 1024,
                height: 1024,
                steps: 30,
                guidance: 6.5,
            },
            _ => ModeDefaults {
                width: 768,
                height: 768,
                steps: 12,
                guidance: 3.5,
            },
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModeDefaults {
    pub width: u32,
    pub height: u32,
    pub steps: u32,
    pub guidance: f32,
}

/// Inbound body for the studio routes (`/generate`, `/polish`). camelCase is
/// the studio contract; it goes no further than this boundary.
///
/// Numeric fields are raw i64/f64 so that out-of-range values reach the
/// validator and get a field-specific message instead of a serde error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudioRequest {
    pub prompt: Option<String>,
    pub negative_prompt: Option<String>,
    pub width: Option<i64>,
    pub height: Option<i64>,
    pub steps: Option<i64>,
    pub guidance: Option<f64>,
    pub seed: Option<i64>,
    pub mode: Option<Mode>,
    pub init_image_data_url: Option<String>,
    pub strength: Option<f64>,
}

/// Inbound body for the `/api/*` routes, which speak the diffusion parameter
/// names directly (`num_inference_steps`, `guidance_scale`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiffusionRequest {
    pub prompt: Option<String>,
    pub negative_prompt: Option<String>,
    pub width: Option<i64>,
    pub height: Option<i64>,
    pub num_inference_steps: Option<i64>,
    pub guidance_scale: Option<f64>,
    pub seed: Option<i64>,
    pub mode: Option<Mode>,

    // UI metadata, accepted and ignored.
    pub style: Option<String>,
    pub quality: Option<String>,
    #[serde(rename = "aspectRatio")]
    pub aspect_ratio: Option<String>,
}

/// A fully validated and default-resolved generation request. Every numeric
/// field is inside its bound; building one of these is the only way a request
/// reaches the network layer.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationRequest {
    pub prompt: String,
    pub negative_prompt: Option<String>,
    pub width: u32,
    pub height: u32,
    pub steps: u32,
    pub guidance: f32,
    pub seed: Option<u32>,
    pub mode: Mode,
    pub init_image_data_url: Option<String>,
    pub strength: Option<f32>,
}

#[derive(Debug, Serialize)]
pub struct ImagesResponse {
    pub images: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub ok: bool,
    #[serde(rename = "imageUrl")]
    pub image_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_deserializes_lowercase() {
        let mode: Mode = serde_json::from_str("\"preview\"").unwrap();
        assert_eq!(mode, Mode::Preview);
        let mode: Mode = serde_json::from_str("\"video\"").unwrap();
        assert_eq!(mode, Mode::Video);
    }

    #[test]
    fn test_ultra_is_an_alias_for_polish() {
        let mode: Mode = serde_json::from_str("\"ultra\"").unwrap();
        assert_eq!(mode, Mode::Polish);
    }

    #[test]
    fn test_mode_defaults() {
        let fast = Mode::Preview.defaults();
        assert_eq!(fast.steps, 12);
        assert_eq!(fast.guidance, 3.5);
        assert_eq!(fast.width, 768);

        let quality = Mode::Polish.defaults();
        assert_eq!(quality.steps, 30);
        assert_eq!(quality.guidance, 6.5);
        assert_eq!(quality.width, 1024);

        // image mode shares the fast tier
        assert_eq!(Mode::Image.defaults(), fast);
    }

    #[test]
    fn test_studio_request_camel_case_boundary() {
        let body: StudioRequest = serde_json::from_str(
            r#"{"prompt":"a cat","negativePrompt":"blurry","initImageDataUrl":"data:image/png;base64,AA","strength":0.6}"#,
        )
        .unwrap();
        assert_eq!(body.prompt.as_deref(), Some("a cat"));
        assert_eq!(body.negative_prompt.as_deref(), Some("blurry"));
        assert!(body.init_image_data_url.is_some());
        assert_eq!(body.strength, Some(0.6));
    }

    #[test]
    fn test_diffusion_request_snake_case_boundary() {
        let body: DiffusionRequest = serde_json::from_str(
            r#"{"prompt":"a cat","num_inference_steps":20,"guidance_scale":5.0,"aspectRatio":"3:4"}"#,
        )
        .unwrap();
        assert_eq!(body.num_inference_steps, Some(20));
        assert_eq!(body.guidance_scale, Some(5.0));
        assert_eq!(body.aspect_ratio.as_deref(), Some("3:4"));
    }
}
