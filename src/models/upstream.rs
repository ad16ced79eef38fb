use serde_json::Value;

/// What actually came back from the upstream call, before any interpretation.
#[derive(Debug, Clone)]
pub struct RawUpstream {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl RawUpstream {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn body_json(&self) -> Option<Value> {
        serde_json::from_slice(&self.body).ok()
    }
}

/// The upstream's possible 2xx payload shapes, one variant per shape the
/// normalizer knows how to read. Matched in a fixed priority order
/// (first listed wins); adding a new upstream shape means one new variant
/// plus one ordering decision in `hf::normalizer::classify`.
#[derive(Debug, Clone, PartialEq)]
pub enum UpstreamShape {
    /// `{"images": ["data:...", ...]}` with at least one entry; used as-is.
    ImagesArray(Vec<String>),
    /// `{"data_url": "data:..."}`.
    DataUrl(String),
    /// `{"base64_png": "<b64>"}`; wrapped into a PNG data URI.
    Base64Png(String),
    /// Top-level JSON array whose first element carries a `blob` field.
    BlobArray(String),
    /// Raw `image/*` or `video/*` bytes.
    RawMedia { content_type: String, bytes: Vec<u8> },
    /// Nothing matched; carries a short body prefix for diagnostics.
    Unrecognized(String),
}
