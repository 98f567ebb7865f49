//! Async client for recognizing forms, receipts and layout.
//!
//! Every recognition call submits the document, receives `202 Accepted` with an
//! `Operation-Location` header, and returns an [`OperationPoller`] that fetches
//! the result from that URL until the service reports a terminal status.
//!
//! ## Example
//!
//! ```rust,no_run
//! use azure_ai_formrecognizer::builder::FormRecognizerClientBuilder;
//! use azure_ai_formrecognizer::models::RecognizeOptions;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = FormRecognizerClientBuilder::new()
//!     .endpoint("https://your-resource.cognitiveservices.azure.com")
//!     .api_key("your-key")
//!     .build_async_client()?;
//!
//! let poller = client
//!     .begin_recognize_receipts_from_url(
//!         "https://example.com/receipt.jpg",
//!         &RecognizeOptions::default(),
//!     )
//!     .await?;
//!
//! for receipt in poller.wait().await? {
//!     println!("{:?}", receipt.recognized_form.fields.get("MerchantName"));
//! }
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use azure_ai_formrecognizer_core::client::PipelineClient;
use azure_ai_formrecognizer_core::error::{FormRecognizerError, FormRecognizerResult};
use azure_ai_formrecognizer_core::models::ServiceVersion;
use azure_ai_formrecognizer_core::polling::{
    LongRunningOperation, OperationFailure, OperationPoller, PollStatus,
};
use azure_ai_formrecognizer_core::pipeline::HttpResponse;
use bytes::Bytes;
use url::Url;

use crate::models::{FormContentType, FormPage, RecognizeOptions, RecognizedForm, RecognizedReceipt};
use crate::service_models::{AnalyzeOperationResult, AnalyzeResult, OperationStatus, SourcePath};
use crate::training::FormTrainingAsyncClient;
use crate::transforms;
use crate::validation::{require_form_url, validate_model_id};

/// Header carrying the URL of an analyze result.
pub const OPERATION_LOCATION_HEADER: &str = "operation-location";

/// Converts a finished analyze result into the caller's output type.
type Transform<T> = fn(&AnalyzeResult, bool, Option<&str>) -> T;

/// A submitted analyze request.
#[derive(Debug, Clone)]
pub struct AnalyzeOperation<T> {
    client: PipelineClient,
    result_url: Url,
    include_field_elements: bool,
    model_id: Option<String>,
    transform: Transform<T>,
}

impl<T> AnalyzeOperation<T> {
    /// URL the result is fetched from.
    pub fn result_url(&self) -> &Url {
        &self.result_url
    }

    pub fn model_id(&self) -> Option<&str> {
        self.model_id.as_deref()
    }
}

#[async_trait]
impl<T: Send + Sync> LongRunningOperation for AnalyzeOperation<T> {
    type Output = T;

    async fn poll_once(&self) -> FormRecognizerResult<PollStatus<T>> {
        let response = self.client.get(self.result_url.clone()).await?;
        let result: AnalyzeOperationResult = response.json()?;

        Ok(match result.status {
            OperationStatus::NotStarted | OperationStatus::Running => PollStatus::Pending,
            OperationStatus::Succeeded => {
                let analyze = result.analyze_result.unwrap_or_default();
                PollStatus::Succeeded((self.transform)(
                    &analyze,
                    self.include_field_elements,
                    self.model_id.as_deref(),
                ))
            }
            OperationStatus::Failed => PollStatus::Failed(analyze_failure(&result)),
        })
    }
}

fn analyze_failure(result: &AnalyzeOperationResult) -> OperationFailure {
    result
        .analyze_result
        .as_ref()
        .and_then(|r| r.errors.first())
        .or(result.error.as_ref())
        .map(|e| OperationFailure {
            code: e.code.clone(),
            message: e.message.clone(),
        })
        .unwrap_or_else(|| OperationFailure {
            code: "unknown".into(),
            message: "analyze operation failed".into(),
        })
}

pub type RecognizeCustomFormsOperation = AnalyzeOperation<Vec<RecognizedForm>>;
pub type RecognizeContentOperation = AnalyzeOperation<Vec<FormPage>>;
pub type RecognizeReceiptsOperation = AnalyzeOperation<Vec<RecognizedReceipt>>;

/// The document to analyze.
enum FormSource<'a> {
    Url(&'a str),
    Bytes(Bytes, FormContentType),
}

impl<'a> FormSource<'a> {
    fn from_url(form_url: &'a str) -> FormRecognizerResult<Self> {
        Ok(Self::Url(require_form_url(form_url)?))
    }

    fn from_bytes(form: Bytes, content_type: Option<FormContentType>) -> FormRecognizerResult<Self> {
        let content_type = content_type
            .or_else(|| FormContentType::detect(&form))
            .ok_or_else(|| {
                FormRecognizerError::InvalidArgument(
                    "content type could not be detected; supported types are pdf, jpeg, png and tiff"
                        .into(),
                )
            })?;
        Ok(Self::Bytes(form, content_type))
    }
}

/// Async client for the recognition operations.
///
/// Cheap to clone; clones share the underlying pipeline.
#[derive(Debug, Clone)]
pub struct FormRecognizerAsyncClient {
    client: PipelineClient,
}

impl FormRecognizerAsyncClient {
    pub(crate) fn new(client: PipelineClient) -> Self {
        Self { client }
    }

    /// The pipeline this client sends requests through.
    pub fn pipeline(&self) -> &PipelineClient {
        &self.client
    }

    pub fn service_version(&self) -> ServiceVersion {
        self.client.service_version()
    }

    /// A training client sharing this client's pipeline.
    pub fn training_client(&self) -> FormTrainingAsyncClient {
        FormTrainingAsyncClient::new(self.client.clone())
    }

    /// Recognize a form at `form_url` with a custom model.
    ///
    /// # Errors
    ///
    /// - [`FormRecognizerError::InvalidArgument`] if `model_id` is not a UUID.
    /// - [`FormRecognizerError::MissingConfig`] if `form_url` is blank.
    ///
    /// # Tracing
    ///
    /// Emits a span named `formrecognizer::recognizer::begin_recognize_custom_forms_from_url`
    /// with field `model_id`.
    #[tracing::instrument(
        name = "formrecognizer::recognizer::begin_recognize_custom_forms_from_url",
        skip(self, form_url, options),
        fields(model_id = %model_id)
    )]
    pub async fn begin_recognize_custom_forms_from_url(
        &self,
        model_id: &str,
        form_url: &str,
        options: &RecognizeOptions,
    ) -> FormRecognizerResult<OperationPoller<RecognizeCustomFormsOperation>> {
        let model_id = validate_model_id(model_id)?;
        let source = FormSource::from_url(form_url)?;
        self.recognize_custom_forms(model_id.to_string(), source, options)
            .await
    }

    /// Recognize a form sent as bytes with a custom model.
    ///
    /// When `content_type` is `None` it is detected from the leading bytes.
    #[tracing::instrument(
        name = "formrecognizer::recognizer::begin_recognize_custom_forms",
        skip(self, form, options),
        fields(model_id = %model_id, len = form.len())
    )]
    pub async fn begin_recognize_custom_forms(
        &self,
        model_id: &str,
        form: Bytes,
        content_type: Option<FormContentType>,
        options: &RecognizeOptions,
    ) -> FormRecognizerResult<OperationPoller<RecognizeCustomFormsOperation>> {
        let model_id = validate_model_id(model_id)?;
        let source = FormSource::from_bytes(form, content_type)?;
        self.recognize_custom_forms(model_id.to_string(), source, options)
            .await
    }

    async fn recognize_custom_forms(
        &self,
        model_id: String,
        source: FormSource<'_>,
        options: &RecognizeOptions,
    ) -> FormRecognizerResult<OperationPoller<RecognizeCustomFormsOperation>> {
        let url = self.analyze_url(
            &format!("custom/models/{model_id}/analyze"),
            options.include_field_elements,
        )?;
        self.submit(url, source, Some(model_id), options, transforms::to_recognized_forms)
            .await
    }

    /// Extract text and table layout from the document at `form_url`.
    #[tracing::instrument(
        name = "formrecognizer::recognizer::begin_recognize_content_from_url",
        skip_all
    )]
    pub async fn begin_recognize_content_from_url(
        &self,
        form_url: &str,
        options: &RecognizeOptions,
    ) -> FormRecognizerResult<OperationPoller<RecognizeContentOperation>> {
        let source = FormSource::from_url(form_url)?;
        self.recognize_content(source, options).await
    }

    /// Extract text and table layout from a document sent as bytes.
    #[tracing::instrument(
        name = "formrecognizer::recognizer::begin_recognize_content",
        skip(self, form, options),
        fields(len = form.len())
    )]
    pub async fn begin_recognize_content(
        &self,
        form: Bytes,
        content_type: Option<FormContentType>,
        options: &RecognizeOptions,
    ) -> FormRecognizerResult<OperationPoller<RecognizeContentOperation>> {
        let source = FormSource::from_bytes(form, content_type)?;
        self.recognize_content(source, options).await
    }

    async fn recognize_content(
        &self,
        source: FormSource<'_>,
        options: &RecognizeOptions,
    ) -> FormRecognizerResult<OperationPoller<RecognizeContentOperation>> {
        // Layout always returns lines; includeTextDetails is not accepted here.
        let url = self.client.service_url("layout/analyze")?;
        self.submit(url, source, None, options, |result, include, _| {
            transforms::to_layout_pages(result, include)
        })
        .await
    }

    /// Recognize receipt data from the image or PDF at `receipt_url`.
    #[tracing::instrument(
        name = "formrecognizer::recognizer::begin_recognize_receipts_from_url",
        skip_all
    )]
    pub async fn begin_recognize_receipts_from_url(
        &self,
        receipt_url: &str,
        options: &RecognizeOptions,
    ) -> FormRecognizerResult<OperationPoller<RecognizeReceiptsOperation>> {
        let source = FormSource::from_url(receipt_url)?;
        self.recognize_receipts(source, options).await
    }

    /// Recognize receipt data from a document sent as bytes.
    #[tracing::instrument(
        name = "formrecognizer::recognizer::begin_recognize_receipts",
        skip(self, receipt, options),
        fields(len = receipt.len())
    )]
    pub async fn begin_recognize_receipts(
        &self,
        receipt: Bytes,
        content_type: Option<FormContentType>,
        options: &RecognizeOptions,
    ) -> FormRecognizerResult<OperationPoller<RecognizeReceiptsOperation>> {
        let source = FormSource::from_bytes(receipt, content_type)?;
        self.recognize_receipts(source, options).await
    }

    async fn recognize_receipts(
        &self,
        source: FormSource<'_>,
        options: &RecognizeOptions,
    ) -> FormRecognizerResult<OperationPoller<RecognizeReceiptsOperation>> {
        let url = self.analyze_url("prebuilt/receipt/analyze", options.include_field_elements)?;
        self.submit(url, source, None, options, |result, include, _| {
            transforms::to_recognized_receipts(result, include)
        })
        .await
    }

    fn analyze_url(&self, path: &str, include_text_details: bool) -> FormRecognizerResult<Url> {
        let mut url = self.client.service_url(path)?;
        url.query_pairs_mut()
            .append_pair("includeTextDetails", if include_text_details { "true" } else { "false" });
        Ok(url)
    }

    async fn submit<T>(
        &self,
        url: Url,
        source: FormSource<'_>,
        model_id: Option<String>,
        options: &RecognizeOptions,
        transform: Transform<T>,
    ) -> FormRecognizerResult<OperationPoller<AnalyzeOperation<T>>>
    where
        T: Send + Sync,
    {
        tracing::debug!("submitting document for analysis");

        let response = match source {
            FormSource::Url(form_url) => {
                self.client
                    .post_json(url, &SourcePath { source: form_url.to_string() })
                    .await?
            }
            FormSource::Bytes(form, content_type) => {
                self.client.post_bytes(url, form, content_type.as_str()).await?
            }
        };

        let result_url = self.operation_location(&response)?;
        tracing::debug!(result_url = %result_url, "document analysis submitted");

        Ok(OperationPoller::new(
            AnalyzeOperation {
                client: self.client.clone(),
                result_url,
                include_field_elements: options.include_field_elements,
                model_id,
                transform,
            },
            options.poll_interval,
        ))
    }

    fn operation_location(&self, response: &HttpResponse) -> FormRecognizerResult<Url> {
        let location = response.header(OPERATION_LOCATION_HEADER).ok_or_else(|| {
            FormRecognizerError::Api {
                code: "MissingHeader".into(),
                message: "Operation-Location header missing from response".into(),
            }
        })?;
        self.client.resolve_link(location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{setup_mock_client, TEST_MODEL_ID};
    use crate::validation::{INVALID_MODEL_ID_ERROR, NULL_FORM_URL_ERROR};
    use azure_ai_formrecognizer_core::polling::OperationState;
    use std::time::Duration;
    use wiremock::matchers::{body_bytes, body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fast() -> RecognizeOptions {
        RecognizeOptions::default().with_poll_interval(Duration::from_millis(1))
    }

    async fn mount_submit(server: &MockServer, submit_path: &str, result_path: &str) {
        Mock::given(method("POST"))
            .and(path(submit_path))
            .respond_with(
                ResponseTemplate::new(202)
                    .append_header("Operation-Location", format!("{}{result_path}", server.uri()).as_str()),
            )
            .expect(1)
            .mount(server)
            .await;
    }

    fn layout_body(status: &str) -> serde_json::Value {
        serde_json::json!({
            "status": status,
            "createdDateTime": "2020-06-04T02:06:14Z",
            "lastUpdatedDateTime": "2020-06-04T02:06:16Z",
            "analyzeResult": {
                "version": "2.1.0",
                "readResults": [{
                    "page": 1, "angle": 0, "width": 8.5, "height": 11, "unit": "inch",
                    "lines": [{"text": "Contoso", "boundingBox": [0, 0, 1, 0, 1, 1, 0, 1], "words": []}]
                }],
                "pageResults": [{"page": 1, "tables": [{"rows": 2, "columns": 2, "cells": []}]}]
            }
        })
    }

    // --- Cycle 1: argument validation ---

    #[tokio::test]
    async fn invalid_model_id_fails_before_any_request() {
        let server = MockServer::start().await;
        let client = setup_mock_client(&server).await;

        let err = client
            .begin_recognize_custom_forms_from_url("not-a-uuid", "https://example.com/form.pdf", &fast())
            .await
            .unwrap_err();
        match err {
            FormRecognizerError::InvalidArgument(msg) => assert_eq!(msg, INVALID_MODEL_ID_ERROR),
            other => panic!("expected InvalidArgument, got {other:?}"),
        }
        assert!(server.received_requests().await.unwrap_or_default().is_empty());
    }

    #[tokio::test]
    async fn blank_form_url_is_missing() {
        let server = MockServer::start().await;
        let client = setup_mock_client(&server).await;

        let err = client
            .begin_recognize_receipts_from_url("", &fast())
            .await
            .unwrap_err();
        match err {
            FormRecognizerError::MissingConfig(msg) => assert_eq!(msg, NULL_FORM_URL_ERROR),
            other => panic!("expected MissingConfig, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn undetectable_content_type_is_invalid() {
        let server = MockServer::start().await;
        let client = setup_mock_client(&server).await;

        let err = client
            .begin_recognize_content(Bytes::from_static(b"plain text"), None, &fast())
            .await
            .unwrap_err();
        assert!(matches!(err, FormRecognizerError::InvalidArgument(_)));
    }

    // --- Cycle 2: layout ---

    #[tokio::test]
    async fn recognize_content_from_url_polls_until_succeeded() {
        let server = MockServer::start().await;
        let client = setup_mock_client(&server).await;

        Mock::given(method("POST"))
            .and(path("/formrecognizer/v2.1/layout/analyze"))
            .and(body_json(serde_json::json!({"source": "https://example.com/form.pdf"})))
            .respond_with(ResponseTemplate::new(202).append_header(
                "Operation-Location",
                format!("{}/formrecognizer/v2.1/layout/analyzeResults/r1", server.uri()).as_str(),
            ))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/formrecognizer/v2.1/layout/analyzeResults/r1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(layout_body("running")))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/formrecognizer/v2.1/layout/analyzeResults/r1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(layout_body("succeeded")))
            .mount(&server)
            .await;

        let poller = client
            .begin_recognize_content_from_url("https://example.com/form.pdf", &fast())
            .await
            .expect("should submit");
        assert!(poller.operation().result_url().path().ends_with("/analyzeResults/r1"));

        let pages = poller.wait().await.expect("should complete");
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].page_number, 1);
        assert_eq!(pages[0].tables.len(), 1);
        assert_eq!(pages[0].lines[0].text, "Contoso");
    }

    #[tokio::test]
    async fn recognize_content_bytes_detects_pdf() {
        let server = MockServer::start().await;
        let client = setup_mock_client(&server).await;

        Mock::given(method("POST"))
            .and(path("/formrecognizer/v2.1/layout/analyze"))
            .and(header("content-type", "application/pdf"))
            .and(body_bytes(b"%PDF-1.4 test".to_vec()))
            .respond_with(ResponseTemplate::new(202).append_header(
                "Operation-Location",
                format!("{}/formrecognizer/v2.1/layout/analyzeResults/r2", server.uri()).as_str(),
            ))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/formrecognizer/v2.1/layout/analyzeResults/r2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(layout_body("succeeded")))
            .mount(&server)
            .await;

        let pages = client
            .begin_recognize_content(
                Bytes::from_static(b"%PDF-1.4 test"),
                None,
                &fast().with_field_elements(true),
            )
            .await
            .unwrap()
            .wait()
            .await
            .unwrap();
        assert_eq!(pages[0].lines[0].text, "Contoso");
    }

    #[tokio::test]
    async fn missing_operation_location_is_api_error() {
        let server = MockServer::start().await;
        let client = setup_mock_client(&server).await;

        Mock::given(method("POST"))
            .and(path("/formrecognizer/v2.1/layout/analyze"))
            .respond_with(ResponseTemplate::new(202))
            .mount(&server)
            .await;

        let err = client
            .begin_recognize_content_from_url("https://example.com/form.pdf", &fast())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Operation-Location"), "{err}");
    }

    // --- Cycle 3: custom forms ---

    #[tokio::test]
    async fn recognize_custom_forms_sends_text_details_flag() {
        let server = MockServer::start().await;
        let client = setup_mock_client(&server).await;
        let submit = format!("/formrecognizer/v2.1/custom/models/{TEST_MODEL_ID}/analyze");
        let result = format!("/formrecognizer/v2.1/custom/models/{TEST_MODEL_ID}/analyzeResults/r3");

        Mock::given(method("POST"))
            .and(path(submit.as_str()))
            .and(query_param("includeTextDetails", "true"))
            .respond_with(ResponseTemplate::new(202).append_header(
                "Operation-Location",
                format!("{}{result}", server.uri()).as_str(),
            ))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(result.as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "succeeded",
                "analyzeResult": {
                    "readResults": [{"page": 1, "width": 8.5, "height": 11, "unit": "inch", "lines": []}],
                    "pageResults": [{
                        "page": 1,
                        "keyValuePairs": [{"key": {"text": "Name:"}, "value": {"text": "Contoso"}, "confidence": 0.5}],
                        "tables": []
                    }]
                }
            })))
            .mount(&server)
            .await;

        let forms = client
            .begin_recognize_custom_forms_from_url(
                TEST_MODEL_ID,
                "https://example.com/form.pdf",
                &fast().with_field_elements(true),
            )
            .await
            .unwrap()
            .wait()
            .await
            .unwrap();

        assert_eq!(forms.len(), 1);
        assert_eq!(forms[0].form_type, format!("custom:{TEST_MODEL_ID}"));
        assert_eq!(forms[0].fields["field-0"].value.as_str(), Some("Contoso"));
    }

    #[tokio::test]
    async fn failed_analysis_surfaces_service_error() {
        let server = MockServer::start().await;
        let client = setup_mock_client(&server).await;
        let submit = format!("/formrecognizer/v2.1/custom/models/{TEST_MODEL_ID}/analyze");
        let result = format!("/formrecognizer/v2.1/custom/models/{TEST_MODEL_ID}/analyzeResults/bad");

        mount_submit(&server, &submit, &result).await;
        Mock::given(method("GET"))
            .and(path(result.as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "failed",
                "analyzeResult": {"errors": [{"code": "3014", "message": "Unable to download the document."}]}
            })))
            .mount(&server)
            .await;

        let mut poller = client
            .begin_recognize_custom_forms_from_url(TEST_MODEL_ID, "https://example.com/gone.pdf", &fast())
            .await
            .unwrap();
        assert!(matches!(poller.poll().await.unwrap(), PollStatus::Failed(_)));
        assert_eq!(poller.state(), OperationState::Failed);

        match poller.wait().await.unwrap_err() {
            FormRecognizerError::OperationFailed { code, message } => {
                assert_eq!(code, "3014");
                assert_eq!(message, "Unable to download the document.");
            }
            other => panic!("expected OperationFailed, got {other:?}"),
        }
    }

    // --- Cycle 4: receipts ---

    #[tokio::test]
    async fn recognize_receipts_from_url() {
        let server = MockServer::start().await;
        let client = setup_mock_client(&server).await;

        mount_submit(
            &server,
            "/formrecognizer/v2.1/prebuilt/receipt/analyze",
            "/formrecognizer/v2.1/prebuilt/receipt/analyzeResults/r4",
        )
        .await;
        Mock::given(method("GET"))
            .and(path("/formrecognizer/v2.1/prebuilt/receipt/analyzeResults/r4"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "succeeded",
                "analyzeResult": {
                    "readResults": [{"page": 1, "width": 1688, "height": 3000, "unit": "pixel"}],
                    "documentResults": [{
                        "docType": "prebuilt:receipt",
                        "pageRange": [1, 1],
                        "fields": {
                            "MerchantName": {"type": "string", "valueString": "Contoso", "text": "Contoso", "page": 1, "confidence": 0.5},
                            "Total": {"type": "number", "valueNumber": 14.5, "text": "$14.50", "page": 1}
                        }
                    }]
                }
            })))
            .mount(&server)
            .await;

        let receipts = client
            .begin_recognize_receipts_from_url("https://example.com/receipt.jpg", &fast())
            .await
            .unwrap()
            .wait()
            .await
            .unwrap();

        assert_eq!(receipts.len(), 1);
        assert_eq!(receipts[0].receipt_locale, "en-US");
        let form = &receipts[0].recognized_form;
        assert_eq!(form.form_type, "prebuilt:receipt");
        assert_eq!(form.fields["MerchantName"].value.as_str(), Some("Contoso"));
        assert_eq!(form.pages.len(), 1);
    }

    #[tokio::test]
    async fn training_client_shares_pipeline() {
        let server = MockServer::start().await;
        let client = setup_mock_client(&server).await;
        let training = client.training_client();
        assert_eq!(training.pipeline().endpoint(), client.pipeline().endpoint());
        assert_eq!(training.service_version(), client.service_version());
    }

    // --- Cycle 5: tracing ---

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn recognize_custom_forms_emits_span_with_model_id() {
        let server = MockServer::start().await;
        let client = setup_mock_client(&server).await;

        let _ = client
            .begin_recognize_custom_forms_from_url(TEST_MODEL_ID, "https://example.com/form.pdf", &fast())
            .await;

        assert!(logs_contain(
            "formrecognizer::recognizer::begin_recognize_custom_forms_from_url"
        ));
        assert!(logs_contain(TEST_MODEL_ID));
    }
}
