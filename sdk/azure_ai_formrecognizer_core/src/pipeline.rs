//! HTTP pipeline building blocks: requests, responses, policies, and transports.
//!
//! A [`PipelineClient`](crate::client::PipelineClient) runs every request through
//! an ordered list of [`Policy`] values before handing it to an [`HttpTransport`].
//! The default transport is a `reqwest::Client`. Tests and playback runs inject
//! their own.

use crate::error::{FormRecognizerError, FormRecognizerResult};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use url::Url;

/// Header carrying the per-request correlation id.
pub const CLIENT_REQUEST_ID_HEADER: &str = "x-ms-client-request-id";

/// An outgoing HTTP request, as seen by policies and transports.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}

impl HttpRequest {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Insert or replace a header.
    ///
    /// # Errors
    ///
    /// Returns [`FormRecognizerError::InvalidArgument`] if the name or value is not
    /// a legal HTTP header.
    pub fn set_header(&mut self, name: &str, value: &str) -> FormRecognizerResult<()> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| FormRecognizerError::InvalidArgument(format!("invalid header name '{name}': {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| FormRecognizerError::InvalidArgument(format!("invalid value for header '{name}': {e}")))?;
        self.headers.insert(name, value);
        Ok(())
    }

    /// The request path plus query, e.g. `/formrecognizer/v2.1/layout/analyze?x=y`.
    pub fn path_and_query(&self) -> String {
        match self.url.query() {
            Some(q) => format!("{}?{q}", self.url.path()),
            None => self.url.path().to_string(),
        }
    }
}

/// A fully buffered HTTP response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl HttpResponse {
    /// Returns `true` for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Look up a header value as a string.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Deserialize the body as JSON.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> FormRecognizerResult<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// The body as (lossy) UTF-8 text.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Sends a request and returns the buffered response.
#[async_trait]
pub trait HttpTransport: Send + Sync + std::fmt::Debug {
    async fn send(&self, request: HttpRequest) -> FormRecognizerResult<HttpResponse>;
}

#[async_trait]
impl HttpTransport for reqwest::Client {
    async fn send(&self, request: HttpRequest) -> FormRecognizerResult<HttpResponse> {
        let mut builder = self.request(request.method, request.url).headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// A request/response interceptor.
///
/// `on_request` runs before every attempt (including retries) and may mutate the
/// request or abort it with an error. `on_response` observes every response,
/// successful or not.
#[async_trait]
pub trait Policy: Send + Sync + std::fmt::Debug {
    async fn on_request(&self, _request: &mut HttpRequest) -> FormRecognizerResult<()> {
        Ok(())
    }

    fn on_response(&self, _request: &HttpRequest, _response: &HttpResponse) {}
}

/// Stamps each request with a fresh `x-ms-client-request-id`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestIdPolicy;

#[async_trait]
impl Policy for RequestIdPolicy {
    async fn on_request(&self, request: &mut HttpRequest) -> FormRecognizerResult<()> {
        if !request.headers.contains_key(CLIENT_REQUEST_ID_HEADER) {
            request.set_header(CLIENT_REQUEST_ID_HEADER, &uuid::Uuid::new_v4().to_string())?;
        }
        Ok(())
    }
}

/// Logs method, path and status through `tracing` (no headers or bodies).
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingPolicy;

#[async_trait]
impl Policy for LoggingPolicy {
    async fn on_request(&self, request: &mut HttpRequest) -> FormRecognizerResult<()> {
        tracing::debug!(
            method = %request.method,
            path = %request.url.path(),
            "sending request"
        );
        Ok(())
    }

    fn on_response(&self, request: &HttpRequest, response: &HttpResponse) {
        tracing::debug!(
            method = %request.method,
            path = %request.url.path(),
            status = response.status,
            "response received"
        );
    }
}
