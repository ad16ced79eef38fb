use crate::models::{DiffusionRequest, GenerationRequest, Mode, StudioRequest};

pub const MIN_DIMENSION: i64 = 256;
pub const MAX_DIMENSION: i64 = 1536;
pub const MIN_STEPS: i64 = 1;
pub const MAX_STEPS: i64 = 80;
pub const MIN_GUIDANCE: f64 = 0.0;
pub const MAX_GUIDANCE: f64 = 30.0;
pub const MAX_SEED: i64 = 2_147_483_647;
pub const MAX_PROMPT_CHARS: usize = 2000;

/// The `/api/*` routes publish their own defaults, independent of mode.
const API_WIDTH: u32 = 768;
const API_HEIGHT: u32 = 960;
const API_STEPS: u32 = 30;
const API_GUIDANCE: f32 = 7.5;

pub type FieldErrors = Vec<String>;

/// Validates a studio-shaped body (`/generate`, `/polish`). Rejects anything
/// out of bounds instead of clamping; fills mode defaults only for fields the
/// client left unset. Pure: no I/O, no clock, no globals.
pub fn validate_studio(
    body: &StudioRequest,
    default_mode: Mode,
) -> Result<GenerationRequest, FieldErrors> {
    let mode = body.mode.unwrap_or(default_mode);
    let defaults = mode.defaults();
    let mut errors = FieldErrors::new();

    let prompt = check_prompt(body.prompt.as_deref(), &mut errors);
    let negative_prompt =
        check_negative_prompt(body.negative_prompt.as_deref(), "negativePrompt", &mut errors);
    let width = check_dimension("width", body.width, defaults.width, &mut errors);
    let height = check_dimension("height", body.height, defaults.height, &mut errors);
    let steps = check_steps("steps", body.steps, defaults.steps, &mut errors);
    let guidance = check_guidance("guidance", body.guidance, defaults.guidance, &mut errors);
    let seed = check_seed(body.seed, &mut errors);
    let strength = check_strength(body.strength, &mut errors);

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(GenerationRequest {
        prompt,
        negative_prompt,
        width,
        height,
        steps,
        guidance,
        seed,
        mode,
        init_image_data_url: body.init_image_data_url.clone(),
        strength,
    })
}

/// Validates a diffusion-shaped body (`/api/generate`, `/api/generate-preview`).
pub fn validate_diffusion(
    body: &DiffusionRequest,
    default_mode: Mode,
) -> Result<GenerationRequest, FieldErrors> {
    let mode = body.mode.unwrap_or(default_mode);
    let mut errors = FieldErrors::new();

    let prompt = check_prompt(body.prompt.as_deref(), &mut errors);
    let negative_prompt =
        check_negative_prompt(body.negative_prompt.as_deref(), "negative_prompt", &mut errors);
    let width = check_dimension("width", body.width, API_WIDTH, &mut errors);
    let height = check_dimension("height", body.height, API_HEIGHT, &mut errors);
    let steps = check_steps(
        "num_inference_steps",
        body.num_inference_steps,
        API_STEPS,
        &mut errors,
    );
    let guidance = check_guidance("guidance_scale", body.guidance_scale, API_GUIDANCE, &mut errors);
    let seed = check_seed(body.seed, &mut errors);

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(GenerationRequest {
        prompt,
        negative_prompt,
        width,
        height,
        steps,
        guidance,
        seed,
        mode,
        init_image_data_url: None,
        strength: None,
    })
}

fn check_prompt(prompt: Option<&str>, errors: &mut FieldErrors) -> String {
    match prompt.map(str::trim) {
        Some(p) if !p.is_empty() => {
            if p.chars().count() > MAX_PROMPT_CHARS {
                errors.push(format!(
                    "prompt too long (max {} characters)",
                    MAX_PROMPT_CHARS
                ));
                String::new()
            } else {
                p.to_string()
            }
        }
        _ => {
            errors.push("prompt is required".to_string());
            String::new()
        }
    }
}

fn check_negative_prompt(
    value: Option<&str>,
    field: &str,
    errors: &mut FieldErrors,
) -> Option<String> {
    let trimmed = value.map(str::trim).filter(|v| !v.is_empty())?;
    if trimmed.chars().count() > MAX_PROMPT_CHARS {
        errors.push(format!("{} too long (max {} characters)", field, MAX_PROMPT_CHARS));
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn check_dimension(field: &str, value: Option<i64>, default: u32, errors: &mut FieldErrors) -> u32 {
    match value {
        None => default,
        Some(v) if (MIN_DIMENSION..=MAX_DIMENSION).contains(&v) => v as u32,
        Some(_) => {
            errors.push(format!(
                "{} must be between {} and {}",
                field, MIN_DIMENSION, MAX_DIMENSION
            ));
            default
        }
    }
}

fn check_steps(field: &str, value: Option<i64>, default: u32, errors: &mut FieldErrors) -> u32 {
    match value {
        None => default,
        Some(v) if (MIN_STEPS..=MAX_STEPS).contains(&v) => v as u32,
        Some(_) => {
            errors.push(format!(
                "{} must be between {} and {}",
                field, MIN_STEPS, MAX_STEPS
            ));
            default
        }
    }
}

fn check_guidance(field: &str, value: Option<f64>, default: f32, errors: &mut FieldErrors) -> f32 {
    match value {
        None => default,
        Some(v) if v.is_finite() && (MIN_GUIDANCE..=MAX_GUIDANCE).contains(&v) => v as f32,
        Some(_) => {
            errors.push(format!(
                "{} must be between {} and {}",
                field, MIN_GUIDANCE, MAX_GUIDANCE
            ));
            default
        }
    }
}

fn check_seed(value: Option<i64>, errors: &mut FieldErrors) -> Option<u32> {
    match value {
        None => None,
        Some(v) if (0..=MAX_SEED).contains(&v) => Some(v as u32),
        Some(_) => {
            errors.push(format!("seed must be between 0 and {}", MAX_SEED));
            None
        }
    }
}

fn check_strength(value: Option<f64>, errors: &mut FieldErrors) -> Option<f32> {
    match value {
        None => None,
        Some(v) if v.is_finite() && (0.0..=1.0).contains(&v) => Some(v as f32),
        Some(_) => {
            errors.push("strength must be between 0 and 1".to_string());
            None
        }
    }
}
