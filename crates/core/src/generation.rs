//! Generation request parameters and input validation.
//!
//! Every job is submitted with the same prompt text, duration, model and
//! aspect ratio; only the image reference varies per request.

use serde::Serialize;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Default prompt sent with every image.
pub const DEFAULT_PROMPT_TEXT: &str = "The camera slowly pushes in as the scene comes to life \
     with gentle, natural motion. Keep the subject and composition of the original image.";

/// Default clip length in seconds.
pub const DEFAULT_DURATION_SECS: u32 = 5;

/// Default vendor model identifier.
pub const DEFAULT_MODEL: &str = "gen3a_turbo";

/// Default output aspect ratio (`width:height`).
pub const DEFAULT_RATIO: &str = "1280:768";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Fixed per-deployment generation settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationParams {
    pub prompt_text: String,
    pub duration_secs: u32,
    pub model: String,
    pub ratio: String,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            prompt_text: DEFAULT_PROMPT_TEXT.to_string(),
            duration_secs: DEFAULT_DURATION_SECS,
            model: DEFAULT_MODEL.to_string(),
            ratio: DEFAULT_RATIO.to_string(),
        }
    }
}

impl GenerationParams {
    /// Build the request for a single image.
    pub fn request_for(&self, image: &str) -> GenerationRequest {
        GenerationRequest {
            image: image.to_string(),
            prompt_text: self.prompt_text.clone(),
            duration_secs: self.duration_secs,
            model: self.model.clone(),
            ratio: self.ratio.clone(),
        }
    }
}

/// One image-to-video submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationRequest {
    /// Public URL or `data:` URI of the source image.
    pub image: String,
    pub prompt_text: String,
    pub duration_secs: u32,
    pub model: String,
    pub ratio: String,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Require an image reference to be present and non-blank.
///
/// Only presence is checked; URLs and data URIs are passed through to the
/// generation service untouched.
pub fn validate_image_reference(image: Option<&str>) -> Result<&str, CoreError> {
    match image {
        Some(s) if !s.trim().is_empty() => Ok(s),
        _ => Err(CoreError::Validation("url is required".into())),
    }
}
