//! Recorded-interaction (playback) support.
//!
//! In playback mode no real authentication or network I/O takes place: the
//! client is signed with [`PLAYBACK_API_KEY`], defaults to [`PLAYBACK_ENDPOINT`],
//! and sends every request to a [`PlaybackTransport`] that answers from a
//! recording.
//!
//! Recordings are JSON documents:
//!
//! ```json
//! {
//!   "networkCallRecords": [
//!     {
//!       "method": "POST",
//!       "uri": "/formrecognizer/v2.1/layout/analyze",
//!       "status": 202,
//!       "responseHeaders": {"Operation-Location": "https://localhost:8080/formrecognizer/v2.1/layout/analyzeResults/1"}
//!     }
//!   ]
//! }
//! ```
//!
//! A request matches a record when method and path are equal and every query
//! parameter in the recorded `uri` is present on the request with the same
//! value. Extra request parameters are allowed. Each record answers at most
//! once, in recording order.

use crate::error::{FormRecognizerError, FormRecognizerResult};
use crate::pipeline::{HttpRequest, HttpResponse, HttpTransport};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};
use std::path::Path;
use std::sync::Mutex;
use url::form_urlencoded;

/// API key used to sign requests in playback mode.
pub const PLAYBACK_API_KEY: &str = "REDACTED";

/// Endpoint used in playback mode when none is configured.
pub const PLAYBACK_ENDPOINT: &str = "https://localhost:8080";

/// One recorded request/response pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordedInteraction {
    pub method: String,
    /// Path, optionally followed by a query string.
    pub uri: String,
    pub status: u16,
    #[serde(default)]
    pub response_headers: BTreeMap<String, String>,
    #[serde(default)]
    pub response_body: Option<serde_json::Value>,
}

impl RecordedInteraction {
    fn path(&self) -> &str {
        self.uri.split('?').next().unwrap_or_default()
    }

    fn query(&self) -> &str {
        self.uri.split_once('?').map(|(_, query)| query).unwrap_or_default()
    }

    fn matches(&self, request: &HttpRequest) -> bool {
        if !self.method.eq_ignore_ascii_case(request.method.as_str()) || self.path() != request.url.path() {
            return false;
        }
        form_urlencoded::parse(self.query().as_bytes())
            .all(|recorded| request.url.query_pairs().any(|sent| sent == recorded))
    }

    fn to_response(&self) -> FormRecognizerResult<HttpResponse> {
        let mut headers = HeaderMap::new();
        for (name, value) in &self.response_headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| FormRecognizerError::Runtime(format!("invalid recorded header '{name}': {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| FormRecognizerError::Runtime(format!("invalid recorded header value: {e}")))?;
            headers.insert(name, value);
        }

        let body = match &self.response_body {
            Some(value) => Bytes::from(serde_json::to_vec(value)?),
            None => Bytes::new(),
        };

        Ok(HttpResponse {
            status: self.status,
            headers,
            body,
        })
    }
}

/// A set of interactions captured from one test.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    #[serde(rename = "networkCallRecords")]
    pub interactions: Vec<RecordedInteraction>,
}

/// Transport that answers requests from a [`Recording`].
#[derive(Debug, Default)]
pub struct PlaybackTransport {
    remaining: Mutex<VecDeque<RecordedInteraction>>,
}

impl PlaybackTransport {
    pub fn new(recording: Recording) -> Self {
        Self {
            remaining: Mutex::new(recording.interactions.into()),
        }
    }

    /// Parse a recording from JSON text.
    pub fn from_json(json: &str) -> FormRecognizerResult<Self> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    /// Load a recording file.
    pub fn from_file(path: impl AsRef<Path>) -> FormRecognizerResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            FormRecognizerError::Runtime(format!("failed to read recording {}: {e}", path.display()))
        })?;
        Self::from_json(&json)
    }

    /// Number of interactions not yet replayed.
    pub fn remaining(&self) -> usize {
        self.remaining.lock().map(|queue| queue.len()).unwrap_or_default()
    }
}

#[async_trait]
impl HttpTransport for PlaybackTransport {
    async fn send(&self, request: HttpRequest) -> FormRecognizerResult<HttpResponse> {
        let interaction = {
            let mut queue = self
                .remaining
                .lock()
                .map_err(|_| FormRecognizerError::Runtime("playback recording lock poisoned".into()))?;
            let position = queue.iter().position(|i| i.matches(&request)).ok_or_else(|| {
                FormRecognizerError::Runtime(format!(
                    "no recorded interaction for {} {}",
                    request.method,
                    request.path_and_query()
                ))
            })?;
            queue.remove(position)
        };

        match interaction {
            Some(interaction) => {
                tracing::trace!(method = %interaction.method, uri = %interaction.uri, "replaying interaction");
                interaction.to_response()
            }
            None => Err(FormRecognizerError::Runtime("playback recording exhausted".into())),
        }
    }
}
