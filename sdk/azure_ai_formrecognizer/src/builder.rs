//! Builder for the Form Recognizer clients.
//!
//! Setters only record values. Validation happens in the `build_*` methods:
//! the endpoint is checked first, then the credential.
//!
//! # Examples
//!
//! ## Using an API key
//! ```rust,no_run
//! use azure_ai_formrecognizer::builder::FormRecognizerClientBuilder;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = FormRecognizerClientBuilder::new()
//!     .endpoint("https://your-resource.cognitiveservices.azure.com")
//!     .api_key("your-key")
//!     .build_async_client()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Using Azure CLI credentials
//! ```rust,no_run
//! use azure_ai_formrecognizer::builder::FormRecognizerClientBuilder;
//! use azure_ai_formrecognizer_core::auth::FormRecognizerCredential;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = FormRecognizerClientBuilder::new()
//!     .endpoint("https://your-resource.cognitiveservices.azure.com")
//!     .credential(FormRecognizerCredential::azure_cli()?)
//!     .build_training_client()?;
//! # Ok(())
//! # }
//! ```

use azure_ai_formrecognizer_core::auth::FormRecognizerCredential;
use azure_ai_formrecognizer_core::client::PipelineClient;
use azure_ai_formrecognizer_core::config::{ClientConfig, RetryPolicy};
use azure_ai_formrecognizer_core::endpoint::validate_endpoint;
use azure_ai_formrecognizer_core::error::FormRecognizerResult;
use azure_ai_formrecognizer_core::models::ServiceVersion;
use azure_ai_formrecognizer_core::pipeline::{HttpTransport, Policy};
use azure_ai_formrecognizer_core::playback::{PLAYBACK_API_KEY, PLAYBACK_ENDPOINT};
use std::sync::Arc;
use std::time::Duration;

use crate::blocking::{FormRecognizerClient, FormTrainingClient};
use crate::recognizer::FormRecognizerAsyncClient;
use crate::training::FormTrainingAsyncClient;

/// Accumulates configuration for the recognizer and training clients.
#[derive(Debug, Clone, Default)]
pub struct FormRecognizerClientBuilder {
    config: ClientConfig,
    api_key: Option<String>,
    playback: Option<Arc<dyn HttpTransport>>,
}

impl FormRecognizerClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration, e.g. [`ClientConfig::from_env`].
    pub fn from_config(config: ClientConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// The configuration accumulated so far.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Set the service endpoint, e.g. `https://<resource>.cognitiveservices.azure.com`.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.endpoint = Some(endpoint.into());
        self
    }

    /// Authenticate with a delegated identity or a prepared API key credential.
    ///
    /// Replaces any key set with [`api_key`](Self::api_key).
    pub fn credential(mut self, credential: FormRecognizerCredential) -> Self {
        self.config.credential = Some(credential);
        self.api_key = None;
        self
    }

    /// Authenticate with a subscription key.
    ///
    /// An empty key is rejected when the client is built.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self.config.credential = None;
        self
    }

    /// Send requests through a custom transport.
    ///
    /// Timeout settings are ignored when a transport is set.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.config.transport = Some(transport);
        self
    }

    /// Send requests through a preconfigured `reqwest::Client`.
    pub fn http_client(self, client: reqwest::Client) -> Self {
        self.transport(Arc::new(client))
    }

    /// Append a policy. Policies run in insertion order, before authentication.
    pub fn add_policy(mut self, policy: impl Policy + 'static) -> Self {
        self.config.policies.push(Arc::new(policy));
        self
    }

    /// Defaults to [`ServiceVersion::latest`].
    pub fn service_version(mut self, version: ServiceVersion) -> Self {
        self.config.service_version = version;
        self
    }

    /// Defaults to 3 retries with 500ms initial backoff.
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.config.retry_policy = policy;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.config.read_timeout = timeout;
        self
    }

    /// Replay recorded interactions instead of talking to the service.
    ///
    /// The configured credential is replaced with [`PLAYBACK_API_KEY`], the endpoint
    /// defaults to [`PLAYBACK_ENDPOINT`], and every request goes to `transport`.
    pub fn playback(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.playback = Some(transport);
        self
    }

    /// Validate the configuration and build the shared pipeline.
    ///
    /// # Errors
    ///
    /// - [`MissingConfig`](azure_ai_formrecognizer_core::FormRecognizerError::MissingConfig)
    ///   if the endpoint or credential is absent.
    /// - [`InvalidEndpoint`](azure_ai_formrecognizer_core::FormRecognizerError::InvalidEndpoint)
    ///   if the endpoint is malformed.
    /// - [`InvalidArgument`](azure_ai_formrecognizer_core::FormRecognizerError::InvalidArgument)
    ///   if the API key is empty.
    pub fn build_pipeline(&self) -> FormRecognizerResult<PipelineClient> {
        let mut config = self.config.clone();

        if let Some(transport) = &self.playback {
            config.endpoint = config.endpoint.or_else(|| Some(PLAYBACK_ENDPOINT.to_string()));
            config.credential = Some(FormRecognizerCredential::api_key(PLAYBACK_API_KEY)?);
            config.transport = Some(transport.clone());
            return PipelineClient::new(config);
        }

        if let Some(key) = &self.api_key {
            validate_endpoint(config.endpoint.as_deref())?;
            config.credential = Some(FormRecognizerCredential::api_key(key.as_str())?);
        }

        PipelineClient::new(config)
    }

    pub fn build_async_client(&self) -> FormRecognizerResult<FormRecognizerAsyncClient> {
        Ok(FormRecognizerAsyncClient::new(self.build_pipeline()?))
    }

    pub fn build_async_training_client(&self) -> FormRecognizerResult<FormTrainingAsyncClient> {
        Ok(FormTrainingAsyncClient::new(self.build_pipeline()?))
    }

    /// Build a blocking recognizer client. Must not be called from async code.
    pub fn build_client(&self) -> FormRecognizerResult<FormRecognizerClient> {
        FormRecognizerClient::new(self.build_async_client()?)
    }

    /// Build a blocking training client. Must not be called from async code.
    pub fn build_training_client(&self) -> FormRecognizerResult<FormTrainingClient> {
        FormTrainingClient::new(self.build_async_training_client()?)
    }
}
