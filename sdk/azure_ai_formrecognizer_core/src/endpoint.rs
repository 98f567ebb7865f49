//! Endpoint validation.
//!
//! Endpoints are checked once, when a client is built, so that no request is
//! ever attempted against a malformed URL.

use crate::error::{FormRecognizerError, FormRecognizerResult};
use url::Url;

/// Message returned when no endpoint was configured.
pub const MISSING_ENDPOINT_ERROR: &str = "'endpoint' is required and cannot be null.";

/// Validate a Form Recognizer endpoint and normalize it to end with `/`.
///
/// # Errors
///
/// - [`FormRecognizerError::MissingConfig`] if `endpoint` is `None`.
/// - [`FormRecognizerError::InvalidEndpoint`] if the string is not an absolute
///   `http`/`https` URL.
pub fn validate_endpoint(endpoint: Option<&str>) -> FormRecognizerResult<Url> {
    let raw = endpoint.ok_or_else(|| FormRecognizerError::MissingConfig(MISSING_ENDPOINT_ERROR.into()))?;

    let mut url = Url::parse(raw.trim())
        .map_err(|e| FormRecognizerError::invalid_endpoint_with_source("invalid endpoint URL", e))?;

    if !matches!(url.scheme(), "https" | "http") {
        return Err(FormRecognizerError::invalid_endpoint(format!(
            "unsupported scheme '{}', expected http or https",
            url.scheme()
        )));
    }

    if url.cannot_be_a_base() || url.host_str().is_none() {
        return Err(FormRecognizerError::invalid_endpoint(
            "endpoint must be an absolute URL with a host",
        ));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}
