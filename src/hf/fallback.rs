use crate::error::{BridgeError, Result};
use crate::models::GenerationRequest;
use async_trait::async_trait;

/// Seam for the single-model upstream call, so the chain can be exercised
/// without a network.
#[async_trait]
pub trait TextToImage: Send + Sync {
    async fn text_to_image(
        &self,
        model_id: &str,
        request: &GenerationRequest,
    ) -> Result<Vec<String>>;
}

/// Primary-then-fallback attempt chain. Strictly sequential: the fallback
/// starts only after the primary's failure is fully known, and a success
/// short-circuits. No retries beyond the two attempts.
pub async fn run_with_fallback<C>(
    caller: &C,
    primary_model: &str,
    fallback_model: Option<&str>,
    request: &GenerationRequest,
) -> Result<Vec<String>>
where
    C: TextToImage + ?Sized,
{
    let primary_error = match caller.text_to_image(primary_model, request).await {
        Ok(images) => return Ok(images),
        Err(e) => e,
    };

    let Some(fallback_model) = fallback_model else {
        return Err(primary_error);
    };

    log::warn!(
        "Primary model {} failed ({}), trying fallback model {}",
        primary_model,
        primary_error,
        fallback_model
    );

    match caller.text_to_image(fallback_model, request).await {
        Ok(images) => Ok(images),
        Err(fallback_error) => Err(BridgeError::FallbackExhausted {
            primary_model: primary_model.to_string(),
            primary_error: primary_error.to_string(),
            fallback_model: fallback_model.to_string(),
            fallback_error: fallback_error.to_string(),
        }),
    }
}
