use crate::error::{BridgeError, Result};
use crate::models::{RawUpstream, UpstreamShape};
use base64::{engine::general_purpose, Engine as _};
use serde_json::Value;

/// How much of an unrecognized body is kept for diagnostics.
const UNRECOGNIZED_PREFIX_CHARS: usize = 200;
/// How much upstream error body travels with an UpstreamHttp error.
const UPSTREAM_BODY_CHARS: usize = 2000;

/// Converts a raw upstream response into an ordered, non-empty list of image
/// data URIs. A non-2xx status short-circuits every shape check.
pub fn normalize(raw: &RawUpstream) -> Result<Vec<String>> {
    if !raw.is_success() {
        return Err(BridgeError::UpstreamHttp {
            status: raw.status,
            body: truncate(&raw.body_text(), UPSTREAM_BODY_CHARS),
        });
    }

    match classify(raw) {
        UpstreamShape::ImagesArray(images) => Ok(images),
        UpstreamShape::DataUrl(url) => Ok(vec![url]),
        UpstreamShape::Base64Png(b64) => Ok(vec![format!("data:image/png;base64,{}", b64)]),
        UpstreamShape::BlobArray(b64) => Ok(vec![format!("data:image/png;base64,{}", b64)]),
        UpstreamShape::RawMedia {
            content_type,
            bytes,
        } => Ok(vec![format!(
            "data:{};base64,{}",
            content_type,
            general_purpose::STANDARD.encode(bytes)
        )]),
        UpstreamShape::Unrecognized(prefix) => Err(BridgeError::UnrecognizedPayload(prefix)),
    }
}

/// Fixed-priority shape detection; first match wins. An `images` array that is
/// present but empty is not a match, so it falls through to the later checks
/// and ultimately to Unrecognized, keeping successful results non-empty.
pub fn classify(raw: &RawUpstream) -> UpstreamShape {
    if let Some(value) = raw.body_json() {
        if let Some(images) = value.get("images").and_then(Value::as_array) {
            let images: Vec<String> = images
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect();
            if !images.is_empty() {
                return UpstreamShape::ImagesArray(images);
            }
        }
        if let Some(url) = value.get("data_url").and_then(Value::as_str) {
            return UpstreamShape::DataUrl(url.to_string());
        }
        if let Some(b64) = value.get("base64_png").and_then(Value::as_str) {
            return UpstreamShape::Base64Png(b64.to_string());
        }
        if let Some(b64) = value
            .as_array()
            .and_then(|entries| entries.first())
            .and_then(|entry| entry.get("blob"))
            .and_then(Value::as_str)
        {
            return UpstreamShape::BlobArray(b64.to_string());
        }
    }

    if let Some(content_type) = raw.content_type.as_deref() {
        if content_type.starts_with("image/") || content_type.starts_with("video/") {
            return UpstreamShape::RawMedia {
                content_type: content_type.to_string(),
                bytes: raw.body.clone(),
            };
        }
    }

    UpstreamShape::Unrecognized(truncate(&raw.body_text(), UNRECOGNIZED_PREFIX_CHARS))
}

/// Splits a data URI into its content type and base64 payload.
pub fn data_url_parts(data_url: &str) -> Option<(String, String)> {
    let rest = data_url.strip_prefix("data:")?;
    let (content_type, b64) = rest.split_once(";base64,")?;
    if content_type.is_empty() {
        return None;
    }
    Some((content_type.to_string(), b64.to_string()))
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        text.chars().take(max_chars).collect()
    }
}
