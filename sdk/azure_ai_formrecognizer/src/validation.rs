//! Argument checks shared by the async and blocking facades.
//!
//! Every check runs before a request is built, so invalid input never reaches
//! the network. Both facades call the same functions and therefore return the
//! same error kind and message for the same input.

use azure_ai_formrecognizer_core::error::{FormRecognizerError, FormRecognizerResult};
use uuid::Uuid;

/// Message for a model id that is empty or not a UUID.
pub const INVALID_MODEL_ID_ERROR: &str = "Invalid model ID. The model ID must be a valid UUID.";

/// Message for a training request without a source container URL.
pub const NULL_SOURCE_URL_ERROR: &str = "source url must not be null";

/// Message for a recognition request without a form URL.
pub const NULL_FORM_URL_ERROR: &str = "form url must not be null";

/// Parse a model id.
///
/// # Errors
///
/// [`FormRecognizerError::InvalidArgument`] with [`INVALID_MODEL_ID_ERROR`] if
/// `model_id` is empty or not a UUID.
pub fn validate_model_id(model_id: &str) -> FormRecognizerResult<Uuid> {
    Uuid::parse_str(model_id.trim())
        .map_err(|_| FormRecognizerError::InvalidArgument(INVALID_MODEL_ID_ERROR.into()))
}

/// Require a training source URL. A blank string counts as absent.
pub fn require_source_url(source_url: &str) -> FormRecognizerResult<&str> {
    require_present(source_url, NULL_SOURCE_URL_ERROR)
}

/// Require a form URL. A blank string counts as absent.
pub fn require_form_url(form_url: &str) -> FormRecognizerResult<&str> {
    require_present(form_url, NULL_FORM_URL_ERROR)
}

fn require_present<'a>(value: &'a str, message: &str) -> FormRecognizerResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FormRecognizerError::MissingConfig(message.into()));
    }
    Ok(trimmed)
}
