//! Blocking clients.
//!
//! Each blocking client wraps its async counterpart together with a
//! current-thread Tokio runtime and runs every call with `block_on`. Argument
//! validation is therefore the same code path as the async clients.
//!
//! These clients must not be used from within an async context: `block_on`
//! panics when called on a thread that is already driving a runtime.
//!
//! ## Example
//!
//! ```rust,no_run
//! use azure_ai_formrecognizer::builder::FormRecognizerClientBuilder;
//! use azure_ai_formrecognizer::models::RecognizeOptions;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = FormRecognizerClientBuilder::new()
//!     .endpoint("https://your-resource.cognitiveservices.azure.com")
//!     .api_key("your-key")
//!     .build_client()?;
//!
//! let pages = client
//!     .begin_recognize_content_from_url("https://example.com/form.pdf", &RecognizeOptions::default())?
//!     .final_result()?;
//! println!("{} pages", pages.len());
//! # Ok(())
//! # }
//! ```

use azure_ai_formrecognizer_core::error::{FormRecognizerError, FormRecognizerResult};
use azure_ai_formrecognizer_core::models::ServiceVersion;
use azure_ai_formrecognizer_core::polling::{
    LongRunningOperation, OperationPoller, OperationState, PollStatus,
};
use bytes::Bytes;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;

use crate::models::{
    AccountProperties, CustomFormModel, CustomFormModelInfo, FormContentType, RecognizeOptions,
    TrainingOptions,
};
use crate::recognizer::{
    FormRecognizerAsyncClient, RecognizeContentOperation, RecognizeCustomFormsOperation,
    RecognizeReceiptsOperation,
};
use crate::training::{FormTrainingAsyncClient, TrainingOperation};

fn new_runtime() -> FormRecognizerResult<Arc<Runtime>> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map(Arc::new)
        .map_err(|e| FormRecognizerError::Runtime(format!("failed to start blocking runtime: {e}")))
}

/// Blocking handle to a long-running operation.
pub struct SyncPoller<O: LongRunningOperation> {
    poller: OperationPoller<O>,
    runtime: Arc<Runtime>,
}

impl<O: LongRunningOperation + std::fmt::Debug> std::fmt::Debug for SyncPoller<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncPoller")
            .field("poller", &self.poller)
            .finish_non_exhaustive()
    }
}

impl<O: LongRunningOperation> SyncPoller<O> {
    fn new(poller: OperationPoller<O>, runtime: Arc<Runtime>) -> Self {
        Self { poller, runtime }
    }

    pub fn operation(&self) -> &O {
        self.poller.operation()
    }

    pub fn state(&self) -> OperationState {
        self.poller.state()
    }

    pub fn poll_interval(&self) -> Duration {
        self.poller.poll_interval()
    }

    pub fn set_poll_interval(&mut self, poll_interval: Duration) {
        self.poller.set_poll_interval(poll_interval);
    }

    /// Check the status once.
    pub fn poll(&mut self) -> FormRecognizerResult<&PollStatus<O::Output>> {
        self.runtime.block_on(self.poller.poll())
    }

    /// Block until the operation finishes and return its result.
    ///
    /// # Errors
    ///
    /// - [`FormRecognizerError::OperationFailed`] if the service reports failure.
    /// - Any transport error raised while polling.
    pub fn final_result(self) -> FormRecognizerResult<O::Output> {
        let Self { poller, runtime } = self;
        runtime.block_on(poller.wait())
    }
}

/// Blocking client for the recognition operations.
#[derive(Debug, Clone)]
pub struct FormRecognizerClient {
    inner: FormRecognizerAsyncClient,
    runtime: Arc<Runtime>,
}

impl FormRecognizerClient {
    pub(crate) fn new(inner: FormRecognizerAsyncClient) -> FormRecognizerResult<Self> {
        Ok(Self {
            inner,
            runtime: new_runtime()?,
        })
    }

    /// The async client this one delegates to.
    pub fn async_client(&self) -> &FormRecognizerAsyncClient {
        &self.inner
    }

    pub fn service_version(&self) -> ServiceVersion {
        self.inner.service_version()
    }

    /// A blocking training client sharing this client's pipeline and runtime.
    pub fn training_client(&self) -> FormTrainingClient {
        FormTrainingClient {
            inner: self.inner.training_client(),
            runtime: self.runtime.clone(),
        }
    }

    pub fn begin_recognize_custom_forms_from_url(
        &self,
        model_id: &str,
        form_url: &str,
        options: &RecognizeOptions,
    ) -> FormRecognizerResult<SyncPoller<RecognizeCustomFormsOperation>> {
        let poller = self.runtime.block_on(
            self.inner
                .begin_recognize_custom_forms_from_url(model_id, form_url, options),
        )?;
        Ok(SyncPoller::new(poller, self.runtime.clone()))
    }

    pub fn begin_recognize_custom_forms(
        &self,
        model_id: &str,
        form: Bytes,
        content_type: Option<FormContentType>,
        options: &RecognizeOptions,
    ) -> FormRecognizerResult<SyncPoller<RecognizeCustomFormsOperation>> {
        let poller = self.runtime.block_on(
            self.inner
                .begin_recognize_custom_forms(model_id, form, content_type, options),
        )?;
        Ok(SyncPoller::new(poller, self.runtime.clone()))
    }

    pub fn begin_recognize_content_from_url(
        &self,
        form_url: &str,
        options: &RecognizeOptions,
    ) -> FormRecognizerResult<SyncPoller<RecognizeContentOperation>> {
        let poller = self
            .runtime
            .block_on(self.inner.begin_recognize_content_from_url(form_url, options))?;
        Ok(SyncPoller::new(poller, self.runtime.clone()))
    }

    pub fn begin_recognize_content(
        &self,
        form: Bytes,
        content_type: Option<FormContentType>,
        options: &RecognizeOptions,
    ) -> FormRecognizerResult<SyncPoller<RecognizeContentOperation>> {
        let poller = self
            .runtime
            .block_on(self.inner.begin_recognize_content(form, content_type, options))?;
        Ok(SyncPoller::new(poller, self.runtime.clone()))
    }

    pub fn begin_recognize_receipts_from_url(
        &self,
        receipt_url: &str,
        options: &RecognizeOptions,
    ) -> FormRecognizerResult<SyncPoller<RecognizeReceiptsOperation>> {
        let poller = self
            .runtime
            .block_on(self.inner.begin_recognize_receipts_from_url(receipt_url, options))?;
        Ok(SyncPoller::new(poller, self.runtime.clone()))
    }

    pub fn begin_recognize_receipts(
        &self,
        receipt: Bytes,
        content_type: Option<FormContentType>,
        options: &RecognizeOptions,
    ) -> FormRecognizerResult<SyncPoller<RecognizeReceiptsOperation>> {
        let poller = self
            .runtime
            .block_on(self.inner.begin_recognize_receipts(receipt, content_type, options))?;
        Ok(SyncPoller::new(poller, self.runtime.clone()))
    }
}

/// Blocking client for custom model management.
#[derive(Debug, Clone)]
pub struct FormTrainingClient {
    inner: FormTrainingAsyncClient,
    runtime: Arc<Runtime>,
}

impl FormTrainingClient {
    pub(crate) fn new(inner: FormTrainingAsyncClient) -> FormRecognizerResult<Self> {
        Ok(Self {
            inner,
            runtime: new_runtime()?,
        })
    }

    pub fn async_client(&self) -> &FormTrainingAsyncClient {
        &self.inner
    }

    pub fn service_version(&self) -> ServiceVersion {
        self.inner.service_version()
    }

    /// A blocking recognizer client sharing this client's pipeline and runtime.
    pub fn form_recognizer_client(&self) -> FormRecognizerClient {
        FormRecognizerClient {
            inner: self.inner.form_recognizer_client(),
            runtime: self.runtime.clone(),
        }
    }

    pub fn begin_training(
        &self,
        training_files_url: &str,
        use_training_labels: bool,
        options: &TrainingOptions,
    ) -> FormRecognizerResult<SyncPoller<TrainingOperation>> {
        let poller = self.runtime.block_on(self.inner.begin_training(
            training_files_url,
            use_training_labels,
            options,
        ))?;
        Ok(SyncPoller::new(poller, self.runtime.clone()))
    }

    pub fn get_custom_model(&self, model_id: &str) -> FormRecognizerResult<CustomFormModel> {
        self.runtime.block_on(self.inner.get_custom_model(model_id))
    }

    pub fn delete_model(&self, model_id: &str) -> FormRecognizerResult<()> {
        self.runtime.block_on(self.inner.delete_model(model_id))
    }

    pub fn list_custom_models(&self) -> FormRecognizerResult<Vec<CustomFormModelInfo>> {
        self.runtime.block_on(self.inner.list_custom_models())
    }

    pub fn get_account_properties(&self) -> FormRecognizerResult<AccountProperties> {
        self.runtime.block_on(self.inner.get_account_properties())
    }
}
