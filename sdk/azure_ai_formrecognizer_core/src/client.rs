//! HTTP pipeline client for Form Recognizer.
//!
//! [`PipelineClient`] is the shared engine behind every Form Recognizer client.
//! It owns the validated endpoint, the policy chain (request id, caller policies,
//! authentication) and the transport, and retries transient failures.
//!
//! # Example
//!
//! ```rust,no_run
//! use azure_ai_formrecognizer_core::auth::FormRecognizerCredential;
//! use azure_ai_formrecognizer_core::client::PipelineClient;
//! use azure_ai_formrecognizer_core::config::ClientConfig;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = PipelineClient::new(ClientConfig {
//!     endpoint: Some("https://your-resource.cognitiveservices.azure.com".into()),
//!     credential: Some(FormRecognizerCredential::api_key("your-key")?),
//!     ..ClientConfig::default()
//! })?;
//! # Ok(())
//! # }
//! ```

use crate::auth::{AuthenticationPolicy, FormRecognizerCredential};
use crate::config::{ClientConfig, RetryPolicy};
use crate::endpoint::validate_endpoint;
use crate::error::{FormRecognizerError, FormRecognizerResult};
use crate::models::ServiceVersion;
use crate::pipeline::{HttpRequest, HttpResponse, HttpTransport, Policy, RequestIdPolicy};
use bytes::Bytes;
use reqwest::Method;
use std::sync::Arc;
use url::Url;

/// Message returned when no credential was configured.
pub const MISSING_CREDENTIAL_ERROR: &str = "'credential' is required and cannot be null.";

/// Determines if an HTTP status code represents a retriable error.
///
/// Retriable errors are transient server-side issues that may succeed on retry:
/// - 429 Too Many Requests (rate limiting)
/// - 500 Internal Server Error
/// - 502 Bad Gateway
/// - 503 Service Unavailable
/// - 504 Gateway Timeout
#[inline]
pub fn is_retriable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

/// The base client that sends requests to the Form Recognizer service.
///
/// The client is cheaply cloneable and can be shared across threads.
#[derive(Debug, Clone)]
pub struct PipelineClient {
    transport: Arc<dyn HttpTransport>,
    endpoint: Url,
    credential: FormRecognizerCredential,
    policies: Arc<[Arc<dyn Policy>]>,
    service_version: ServiceVersion,
    retry_policy: RetryPolicy,
}

impl PipelineClient {
    /// Validate `config` and build a client.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No endpoint is provided ([`FormRecognizerError::MissingConfig`])
    /// - The endpoint URL is invalid ([`FormRecognizerError::InvalidEndpoint`])
    /// - No credential is provided ([`FormRecognizerError::MissingConfig`])
    /// - The default HTTP client cannot be created
    pub fn new(config: ClientConfig) -> FormRecognizerResult<Self> {
        let endpoint = validate_endpoint(config.endpoint.as_deref())?;

        let credential = config
            .credential
            .ok_or_else(|| FormRecognizerError::MissingConfig(MISSING_CREDENTIAL_ERROR.into()))?;

        let transport: Arc<dyn HttpTransport> = match config.transport {
            Some(transport) => transport,
            None => Arc::new(
                reqwest::Client::builder()
                    .connect_timeout(config.connect_timeout)
                    .timeout(config.read_timeout)
                    .build()?,
            ),
        };

        let mut policies: Vec<Arc<dyn Policy>> = Vec::with_capacity(config.policies.len() + 2);
        policies.push(Arc::new(RequestIdPolicy));
        policies.extend(config.policies);
        policies.push(Arc::new(AuthenticationPolicy::new(credential.clone())));

        Ok(Self {
            transport,
            endpoint,
            credential,
            policies: policies.into(),
            service_version: config.service_version,
            retry_policy: config.retry_policy,
        })
    }

    /// Get the base endpoint URL.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Get the service version being used.
    pub fn service_version(&self) -> ServiceVersion {
        self.service_version
    }

    /// Get the credential used to sign requests.
    pub fn credential(&self) -> &FormRecognizerCredential {
        &self.credential
    }

    /// Get the retry policy configuration.
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    /// Build a full URL for a path relative to the endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be joined to the endpoint URL.
    pub fn url(&self, path: &str) -> FormRecognizerResult<Url> {
        self.endpoint
            .join(path.trim_start_matches('/'))
            .map_err(|e| FormRecognizerError::invalid_endpoint_with_source("failed to construct URL", e))
    }

    /// Build a URL under the versioned service root, `formrecognizer/<version>/<path>`.
    pub fn service_url(&self, path: &str) -> FormRecognizerResult<Url> {
        self.url(&format!(
            "formrecognizer/{}/{}",
            self.service_version,
            path.trim_start_matches('/')
        ))
    }

    /// Re-root an absolute URL returned by the service (`Operation-Location`,
    /// `Location`, `nextLink`) onto this client's endpoint.
    ///
    /// Only the path and query of `absolute` are kept, so a recorded or proxied
    /// host never leaks into the request.
    pub fn resolve_link(&self, absolute: &str) -> FormRecognizerResult<Url> {
        let parsed = Url::parse(absolute).map_err(|e| {
            FormRecognizerError::invalid_endpoint_with_source(
                format!("failed to parse service link '{absolute}'"),
                e,
            )
        })?;

        let relative = match parsed.query() {
            Some(q) => format!("{}?{q}", parsed.path()),
            None => parsed.path().to_string(),
        };
        self.url(&relative)
    }

    /// Send a GET request with automatic retry on transient errors.
    pub async fn get(&self, url: Url) -> FormRecognizerResult<HttpResponse> {
        self.send(Method::GET, url, None).await
    }

    /// Send a DELETE request with automatic retry on transient errors.
    pub async fn delete(&self, url: Url) -> FormRecognizerResult<HttpResponse> {
        self.send(Method::DELETE, url, None).await
    }

    /// Send a POST request with a JSON body.
    pub async fn post_json<T: serde::Serialize + ?Sized>(
        &self,
        url: Url,
        body: &T,
    ) -> FormRecognizerResult<HttpResponse> {
        let body = Bytes::from(serde_json::to_vec(body)?);
        self.send(Method::POST, url, Some((body, "application/json")))
            .await
    }

    /// Send a POST request with a binary body of the given content type.
    pub async fn post_bytes(
        &self,
        url: Url,
        body: Bytes,
        content_type: &str,
    ) -> FormRecognizerResult<HttpResponse> {
        self.send(Method::POST, url, Some((body, content_type))).await
    }

    /// Run the policy chain and transport, retrying retriable statuses with
    /// exponential backoff and jitter.
    ///
    /// Transport-level failures are returned as-is without retry.
    async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<(Bytes, &str)>,
    ) -> FormRecognizerResult<HttpResponse> {
        for attempt in 0..=self.retry_policy.max_retries {
            let mut request = HttpRequest::new(method.clone(), url.clone());
            if let Some((bytes, content_type)) = &body {
                request.set_header("content-type", content_type)?;
                request.body = Some(bytes.clone());
            }

            for policy in self.policies.iter() {
                policy.on_request(&mut request).await?;
            }

            let observed = request.clone();
            let response = self.transport.send(request).await?;
            for policy in self.policies.iter() {
                policy.on_response(&observed, &response);
            }

            if response.is_success() {
                return Ok(response);
            }

            if !is_retriable_status(response.status) || attempt == self.retry_policy.max_retries {
                return Err(Self::error_from_response(&response));
            }

            // jitter_factor is in range [0.75, 1.25] for ±25% variation
            let base_backoff = self.retry_policy.backoff(attempt);
            let jitter = 0.75 + fastrand::f64() * 0.5;
            let backoff = base_backoff.mul_f64(jitter);
            tracing::debug!(
                status = response.status,
                attempt,
                backoff_ms = backoff.as_millis() as u64,
                "retrying transient failure"
            );
            tokio::time::sleep(backoff).await;
        }

        unreachable!("retry loop should return before reaching here")
    }

    /// Maximum length for error messages to prevent sensitive data leaks.
    const MAX_ERROR_MESSAGE_LEN: usize = 1000;

    /// Markers after which the following token is a secret.
    const SECRET_MARKERS: [&'static str; 3] = [
        "Bearer ",
        "Ocp-Apim-Subscription-Key: ",
        "Ocp-Apim-Subscription-Key=",
    ];

    /// Sanitize error messages by redacting bearer tokens and subscription keys.
    pub(crate) fn sanitize_error_message(msg: &str) -> String {
        let mut result = msg.to_string();

        for marker in Self::SECRET_MARKERS {
            // Use offset to avoid infinite loops
            let mut search_start = 0;
            while let Some(relative_pos) = result[search_start..].find(marker) {
                let token_start = search_start + relative_pos + marker.len();
                if token_start >= result.len() {
                    break;
                }

                if result[token_start..].starts_with("[REDACTED]") {
                    search_start = token_start + "[REDACTED]".len();
                    continue;
                }

                let token_end = result[token_start..]
                    .find(|c: char| c.is_whitespace() || c == '"' || c == '\'' || c == ',')
                    .map(|pos| token_start + pos)
                    .unwrap_or(result.len());

                if token_end > token_start {
                    result.replace_range(token_start..token_end, "[REDACTED]");
                    search_start = token_start + "[REDACTED]".len();
                } else {
                    search_start = token_start;
                }
            }
        }

        result
    }

    /// Sanitize, then truncate a message if it exceeds the maximum length.
    pub(crate) fn truncate_message(msg: &str) -> String {
        let sanitized = Self::sanitize_error_message(msg);

        if sanitized.len() > Self::MAX_ERROR_MESSAGE_LEN {
            let mut cut = Self::MAX_ERROR_MESSAGE_LEN;
            while !sanitized.is_char_boundary(cut) {
                cut -= 1;
            }
            format!("{}... (truncated)", &sanitized[..cut])
        } else {
            sanitized
        }
    }

    /// Convert a non-success response into an error.
    fn error_from_response(response: &HttpResponse) -> FormRecognizerError {
        let body = response.text();

        if let Ok(error) = serde_json::from_str::<serde_json::Value>(&body) {
            if let Some(err_obj) = error.get("error") {
                return FormRecognizerError::Api {
                    code: err_obj
                        .get("code")
                        .and_then(|c| c.as_str())
                        .unwrap_or("unknown")
                        .to_string(),
                    message: Self::truncate_message(
                        err_obj
                            .get("message")
                            .and_then(|m| m.as_str())
                            .unwrap_or(&body),
                    ),
                };
            }
        }

        FormRecognizerError::http(response.status, Self::truncate_message(&body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::API_KEY_HEADER;
    use crate::error::ErrorKind;
    use crate::pipeline::CLIENT_REQUEST_ID_HEADER;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;
    use wiremock::matchers::{body_bytes, header, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(endpoint: &str) -> ClientConfig {
        ClientConfig {
            endpoint: Some(endpoint.into()),
            credential: Some(FormRecognizerCredential::api_key("test").unwrap()),
            ..ClientConfig::default()
        }
    }

    #[test]
    fn new_requires_endpoint() {
        let err = PipelineClient::new(ClientConfig {
            credential: Some(FormRecognizerCredential::api_key("test").unwrap()),
            ..ClientConfig::default()
        })
        .unwrap_err();
        assert!(matches!(err, FormRecognizerError::MissingConfig(_)));
    }

    #[test]
    fn new_rejects_invalid_endpoint() {
        let err = PipelineClient::new(config("not a valid url")).unwrap_err();
        assert!(matches!(err, FormRecognizerError::InvalidEndpoint { .. }));
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn new_requires_credential() {
        let err = PipelineClient::new(ClientConfig {
            endpoint: Some("https://test.cognitiveservices.azure.com".into()),
            credential: None,
            ..ClientConfig::default()
        })
        .unwrap_err();
        match err {
            FormRecognizerError::MissingConfig(msg) => assert_eq!(msg, MISSING_CREDENTIAL_ERROR),
            other => panic!("expected MissingConfig, got {other:?}"),
        }
    }

    #[test]
    fn service_url_includes_version() {
        let client = PipelineClient::new(config("https://test.cognitiveservices.azure.com")).unwrap();
        assert_eq!(
            client.service_url("/custom/models?op=full").unwrap().as_str(),
            "https://test.cognitiveservices.azure.com/formrecognizer/v2.1/custom/models?op=full"
        );
    }

    #[test]
    fn service_url_honors_configured_version() {
        let client = PipelineClient::new(ClientConfig {
            service_version: ServiceVersion::V2_0,
            ..config("https://test.cognitiveservices.azure.com")
        })
        .unwrap();
        assert_eq!(
            client.service_url("layout/analyze").unwrap().as_str(),
            "https://test.cognitiveservices.azure.com/formrecognizer/v2.0/layout/analyze"
        );
    }

    #[test]
    fn resolve_link_reroots_onto_endpoint() {
        let client = PipelineClient::new(config("http://127.0.0.1:9999")).unwrap();
        let url = client
            .resolve_link("https://westus2.api.cognitive.microsoft.com/formrecognizer/v2.1/layout/analyzeResults/abc?x=1")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:9999/formrecognizer/v2.1/layout/analyzeResults/abc?x=1"
        );
    }

    #[test]
    fn resolve_link_rejects_malformed_link() {
        let client = PipelineClient::new(config("http://127.0.0.1:9999")).unwrap();
        let err = client.resolve_link("not-a-valid-url").unwrap_err();
        assert!(matches!(err, FormRecognizerError::InvalidEndpoint { .. }));
    }

    #[test]
    fn client_is_cloneable() {
        let client = PipelineClient::new(config("https://test.cognitiveservices.azure.com")).unwrap();
        let cloned = client.clone();
        assert_eq!(client.endpoint(), cloned.endpoint());
    }

    // --- Wiremock integration tests ---

    async fn setup_mock_client(server: &MockServer) -> PipelineClient {
        PipelineClient::new(ClientConfig {
            endpoint: Some(server.uri()),
            credential: Some(FormRecognizerCredential::api_key("test-api-key").unwrap()),
            retry_policy: RetryPolicy {
                max_retries: 2,
                initial_backoff: Duration::from_millis(10),
            },
            ..ClientConfig::default()
        })
        .expect("should build client")
    }

    #[tokio::test]
    async fn get_request_is_signed_and_stamped() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/formrecognizer/v2.1/custom/models"))
            .and(header(API_KEY_HEADER, "test-api-key"))
            .and(header_exists(CLIENT_REQUEST_ID_HEADER))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let response = client
            .get(client.service_url("custom/models").unwrap())
            .await
            .expect("should succeed");

        assert_eq!(response.status, 200);
        let body: serde_json::Value = response.json().unwrap();
        assert_eq!(body["ok"], true);
    }

    #[tokio::test]
    async fn post_bytes_sets_content_type() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/formrecognizer/v2.1/layout/analyze"))
            .and(header("content-type", "application/pdf"))
            .and(body_bytes(b"%PDF-1.4".to_vec()))
            .respond_with(ResponseTemplate::new(202))
            .expect(1)
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let response = client
            .post_bytes(
                client.service_url("layout/analyze").unwrap(),
                Bytes::from_static(b"%PDF-1.4"),
                "application/pdf",
            )
            .await
            .expect("should succeed");
        assert_eq!(response.status, 202);
    }

    #[tokio::test]
    async fn api_error_body_is_parsed() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/formrecognizer/v2.1/custom/models/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "error": {"code": "1022", "message": "Model with 'id=missing' not found."}
            })))
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let err = client
            .get(client.service_url("custom/models/missing").unwrap())
            .await
            .unwrap_err();

        match err {
            FormRecognizerError::Api { code, message } => {
                assert_eq!(code, "1022");
                assert_eq!(message, "Model with 'id=missing' not found.");
            }
            other => panic!("Expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_json_error_body_is_http_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/test"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let err = client.get(client.url("/test").unwrap()).await.unwrap_err();
        match err {
            FormRecognizerError::Http { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Unauthorized");
            }
            other => panic!("Expected Http error, got {other:?}"),
        }
    }

    #[test]
    fn identifies_retriable_http_errors() {
        for status in [429, 500, 502, 503, 504] {
            assert!(is_retriable_status(status), "{status}");
        }
        for status in [200, 400, 401, 403, 404, 409] {
            assert!(!is_retriable_status(status), "{status}");
        }
    }

    #[tokio::test]
    async fn get_retries_on_503_then_succeeds() {
        let server = MockServer::start().await;
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        Mock::given(method("GET"))
            .and(path("/flaky"))
            .respond_with(move |_: &wiremock::Request| {
                if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                    ResponseTemplate::new(503)
                } else {
                    ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true}))
                }
            })
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let response = client.get(client.url("flaky").unwrap()).await.expect("should recover");
        assert_eq!(response.status, 200);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn more_than_thirty_two_retries_do_not_overflow() {
        let server = MockServer::start().await;
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        Mock::given(method("GET"))
            .and(path("/flaky"))
            .respond_with(move |_: &wiremock::Request| {
                if counter.fetch_add(1, Ordering::SeqCst) < 35 {
                    ResponseTemplate::new(503)
                } else {
                    ResponseTemplate::new(200)
                }
            })
            .mount(&server)
            .await;

        let client = PipelineClient::new(ClientConfig {
            endpoint: Some(server.uri()),
            credential: Some(FormRecognizerCredential::api_key("test-api-key").unwrap()),
            retry_policy: RetryPolicy {
                max_retries: 40,
                initial_backoff: Duration::ZERO,
            },
            ..ClientConfig::default()
        })
        .unwrap();

        let response = client.get(client.url("flaky").unwrap()).await.expect("should recover");
        assert_eq!(response.status, 200);
        assert_eq!(calls.load(Ordering::SeqCst), 36);
    }

    #[tokio::test]
    async fn retries_are_exhausted_on_persistent_429() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/busy"))
            .respond_with(ResponseTemplate::new(429).set_body_string("Rate limit exceeded"))
            .expect(3)
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let err = client
            .post_json(client.url("busy").unwrap(), &serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, FormRecognizerError::Http { status: 429, .. }));
    }

    #[tokio::test]
    async fn client_errors_are_not_retried() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/gone"))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad"))
            .expect(1)
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let err = client.delete(client.url("gone").unwrap()).await.unwrap_err();
        assert!(matches!(err, FormRecognizerError::Http { status: 400, .. }));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_request_error() {
        let client = PipelineClient::new(ClientConfig {
            retry_policy: RetryPolicy::none(),
            ..config("http://127.0.0.1:1")
        })
        .unwrap();
        let err = client.get(client.url("x").unwrap()).await.unwrap_err();
        assert!(matches!(err, FormRecognizerError::Request(_)));
        assert_eq!(err.kind(), ErrorKind::Runtime);
    }

    #[tokio::test]
    async fn custom_policies_run_before_authentication() {
        #[derive(Debug)]
        struct TagPolicy;

        #[async_trait::async_trait]
        impl Policy for TagPolicy {
            async fn on_request(&self, request: &mut HttpRequest) -> FormRecognizerResult<()> {
                assert!(request.headers.get(API_KEY_HEADER).is_none());
                request.set_header("x-custom-tag", "tagged")
            }
        }

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tagged"))
            .and(header("x-custom-tag", "tagged"))
            .and(header(API_KEY_HEADER, "test-api-key"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = PipelineClient::new(ClientConfig {
            endpoint: Some(server.uri()),
            credential: Some(FormRecognizerCredential::api_key("test-api-key").unwrap()),
            policies: vec![Arc::new(TagPolicy)],
            ..ClientConfig::default()
        })
        .unwrap();

        let response = client.get(client.url("tagged").unwrap()).await.unwrap();
        assert_eq!(response.status, 204);
    }

    // --- Error sanitization ---

    #[test]
    fn sanitization_removes_bearer_tokens() {
        let msg = "Invalid token: Bearer eyJhbGciOi.secret.part, please retry";
        let sanitized = PipelineClient::sanitize_error_message(msg);
        assert!(!sanitized.contains("eyJhbGciOi"));
        assert!(sanitized.contains("Bearer [REDACTED]"));
    }

    #[test]
    fn sanitization_removes_subscription_keys() {
        let msg = "header Ocp-Apim-Subscription-Key: 0123456789abcdef rejected";
        let sanitized = PipelineClient::sanitize_error_message(msg);
        assert!(!sanitized.contains("0123456789abcdef"));
        assert!(sanitized.contains("Ocp-Apim-Subscription-Key: [REDACTED] rejected"));
    }

    #[test]
    fn sanitization_handles_multiple_tokens() {
        let msg = "Bearer aaa and Bearer bbb";
        assert_eq!(
            PipelineClient::sanitize_error_message(msg),
            "Bearer [REDACTED] and Bearer [REDACTED]"
        );
    }

    #[test]
    fn sanitization_preserves_legitimate_errors() {
        let msg = "Model with 'id=abc' not found.";
        assert_eq!(PipelineClient::sanitize_error_message(msg), msg);
    }

    #[test]
    fn sanitization_before_truncation() {
        let long = format!("Bearer secret {}", "x".repeat(2000));
        let truncated = PipelineClient::truncate_message(&long);
        assert!(truncated.starts_with("Bearer [REDACTED]"));
        assert!(truncated.ends_with("... (truncated)"));
    }
}
