//! Client configuration.
//!
//! [`ClientConfig`] is a plain value: every field is public and nothing is
//! validated until it is handed to [`PipelineClient::new`](crate::client::PipelineClient::new).

use crate::auth::FormRecognizerCredential;
use crate::error::FormRecognizerResult;
use crate::models::ServiceVersion;
use crate::pipeline::{HttpTransport, Policy};
use std::sync::Arc;
use std::time::Duration;

/// Default connection timeout (10 seconds).
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default read/response timeout (60 seconds).
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(60);

/// Upper bound on a single retry delay, before jitter.
pub const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Environment variable read by [`ClientConfig::from_env`].
pub const ENDPOINT_ENV_VAR: &str = "AZURE_FORM_RECOGNIZER_ENDPOINT";

/// Configuration for automatic retry behavior on transient errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of retry attempts (not counting the initial request).
    pub max_retries: u32,
    /// Initial backoff duration before the first retry.
    /// Subsequent retries use exponential backoff (see [`RetryPolicy::backoff`]).
    pub initial_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            initial_backoff: Duration::ZERO,
        }
    }

    /// Delay before retry number `attempt` (zero-based), without jitter.
    ///
    /// Doubles per attempt and saturates at [`MAX_BACKOFF`].
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2_u32.saturating_pow(attempt);
        self.initial_backoff.saturating_mul(factor).min(MAX_BACKOFF)
    }
}

/// Everything needed to build a pipeline client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Service endpoint, e.g. `https://<resource>.cognitiveservices.azure.com`.
    pub endpoint: Option<String>,
    /// Authentication mechanism.
    pub credential: Option<FormRecognizerCredential>,
    /// Transport override. When `None`, a `reqwest::Client` is built from the timeouts.
    pub transport: Option<Arc<dyn HttpTransport>>,
    /// Extra policies, run in order before authentication.
    pub policies: Vec<Arc<dyn Policy>>,
    /// REST API version.
    pub service_version: ServiceVersion,
    /// Retry behavior for transient HTTP failures.
    pub retry_policy: RetryPolicy,
    /// Ignored when `transport` is set.
    pub connect_timeout: Duration,
    /// Ignored when `transport` is set.
    pub read_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            credential: None,
            transport: None,
            policies: Vec::new(),
            service_version: ServiceVersion::default(),
            retry_policy: RetryPolicy::default(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Load the endpoint from `AZURE_FORM_RECOGNIZER_ENDPOINT` and the credential from
    /// [`FormRecognizerCredential::from_env`].
    ///
    /// A missing endpoint variable is not an error here; it surfaces when the
    /// client is built.
    pub fn from_env() -> FormRecognizerResult<Self> {
        Ok(Self {
            endpoint: std::env::var(ENDPOINT_ENV_VAR).ok(),
            credential: Some(FormRecognizerCredential::from_env()?),
            ..Self::default()
        })
    }
}
