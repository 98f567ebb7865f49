//! Async client for training and managing custom models.
//!
//! ## Example
//!
//! ```rust,no_run
//! use azure_ai_formrecognizer::builder::FormRecognizerClientBuilder;
//! use azure_ai_formrecognizer::models::TrainingOptions;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = FormRecognizerClientBuilder::new()
//!     .endpoint("https://your-resource.cognitiveservices.azure.com")
//!     .api_key("your-key")
//!     .build_async_training_client()?;
//!
//! let model = client
//!     .begin_training("https://account.blob.core.windows.net/forms?sas", false, &TrainingOptions::default())
//!     .await?
//!     .wait()
//!     .await?;
//!
//! for submodel in &model.submodels {
//!     println!("{}: {} fields", submodel.form_type, submodel.fields.len());
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
use std::collections::HashSet;
use url::Url;

use crate::models::{
    AccountProperties, CustomFormModel, CustomFormModelInfo, CustomFormModelStatus,
    TrainingOptions,
};
use crate::service_models::{Model, Models, TrainRequest, TrainSourceFilter};
use crate::transforms;
use crate::validation::{require_source_url, validate_model_id};

/// Header carrying the URL of a newly created model.
pub const LOCATION_HEADER: &str = "location";

/// A submitted training request. Polls the model until it leaves `creating`.
#[derive(Debug, Clone)]
pub struct TrainingOperation {
    client: PipelineClient,
    model_url: Url,
}

impl TrainingOperation {
    /// URL of the model being trained.
    pub fn model_url(&self) -> &Url {
        &self.model_url
    }

    /// The id of the model being trained, taken from the last path segment.
    pub fn model_id(&self) -> Option<&str> {
        self.model_url.path_segments()?.next_back()
    }
}

#[async_trait]
impl LongRunningOperation for TrainingOperation {
    type Output = CustomFormModel;

    async fn poll_once(&self) -> FormRecognizerResult<PollStatus<CustomFormModel>> {
        let model: Model = self.client.get(self.model_url.clone()).await?.json()?;

        Ok(match model.model_info.status {
            CustomFormModelStatus::Creating => PollStatus::Pending,
            CustomFormModelStatus::Ready => PollStatus::Succeeded(transforms::to_custom_form_model(&model)),
            CustomFormModelStatus::Invalid => PollStatus::Failed(training_failure(&model)),
            CustomFormModelStatus::Unknown => PollStatus::Failed(OperationFailure {
                code: "UnknownStatus".into(),
                message: format!("model {} reported an unrecognized status", model.model_info.model_id),
            }),
        })
    }
}

fn training_failure(model: &Model) -> OperationFailure {
    let train_result = model.train_result.as_ref();
    train_result
        .and_then(|r| r.errors.first())
        .or_else(|| {
            train_result?
                .training_documents
                .iter()
                .flat_map(|doc| doc.errors.first())
                .next()
        })
        .map(|e| OperationFailure {
            code: e.code.clone(),
            message: e.message.clone(),
        })
        .unwrap_or_else(|| OperationFailure {
            code: "invalid".into(),
            message: format!("model {} is invalid", model.model_info.model_id),
        })
}

/// Async client for custom model management.
///
/// Cheap to clone; clones share the underlying pipeline.
#[derive(Debug, Clone)]
pub struct FormTrainingAsyncClient {
    client: PipelineClient,
}

impl FormTrainingAsyncClient {
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

    /// A recognizer client sharing this client's pipeline.
    pub fn form_recognizer_client(&self) -> crate::recognizer::FormRecognizerAsyncClient {
        crate::recognizer::FormRecognizerAsyncClient::new(self.client.clone())
    }

    /// Train a custom model from the documents in a blob container.
    ///
    /// With `use_training_labels` the service uses the label files next to the
    /// documents; otherwise it clusters the documents and learns keys itself.
    ///
    /// # Errors
    ///
    /// [`FormRecognizerError::MissingConfig`] with
    /// [`NULL_SOURCE_URL_ERROR`](crate::validation::NULL_SOURCE_URL_ERROR) if
    /// `training_files_url` is blank.
    ///
    /// # Tracing
    ///
    /// Emits a span named `formrecognizer::training::begin_training`.
    #[tracing::instrument(
        name = "formrecognizer::training::begin_training",
        skip(self, training_files_url, options)
    )]
    pub async fn begin_training(
        &self,
        training_files_url: &str,
        use_training_labels: bool,
        options: &TrainingOptions,
    ) -> FormRecognizerResult<OperationPoller<TrainingOperation>> {
        let source = require_source_url(training_files_url)?;

        let body = TrainRequest {
            source: source.to_string(),
            source_filter: Some(TrainSourceFilter {
                prefix: options.prefix.clone().unwrap_or_default(),
                include_sub_folders: options.include_subfolders,
            }),
            use_label_file: use_training_labels,
        };

        tracing::debug!("submitting training request");
        let response = self
            .client
            .post_json(self.client.service_url("custom/models")?, &body)
            .await?;

        let location = response.header(LOCATION_HEADER).ok_or_else(|| FormRecognizerError::Api {
            code: "MissingHeader".into(),
            message: "Location header missing from response".into(),
        })?;
        let mut model_url = self.client.resolve_link(location)?;
        model_url.query_pairs_mut().append_pair("includeKeys", "true");

        let operation = TrainingOperation {
            client: self.client.clone(),
            model_url,
        };
        tracing::debug!(model_id = ?operation.model_id(), "training submitted");

        Ok(OperationPoller::new(operation, options.poll_interval))
    }

    /// Get a custom model, including its keys and training results.
    ///
    /// # Errors
    ///
    /// [`FormRecognizerError::InvalidArgument`] with
    /// [`INVALID_MODEL_ID_ERROR`](crate::validation::INVALID_MODEL_ID_ERROR) if
    /// `model_id` is not a UUID.
    ///
    /// # Tracing
    ///
    /// Emits a span named `formrecognizer::training::get_custom_model` with field `model_id`.
    #[tracing::instrument(
        name = "formrecognizer::training::get_custom_model",
        skip(self),
        fields(model_id = %model_id)
    )]
    pub async fn get_custom_model(&self, model_id: &str) -> FormRecognizerResult<CustomFormModel> {
        let model_id = validate_model_id(model_id)?;
        tracing::debug!("fetching custom model");

        let url = self
            .client
            .service_url(&format!("custom/models/{model_id}?includeKeys=true"))?;
        let model: Model = self.client.get(url).await?.json()?;

        tracing::debug!(status = ?model.model_info.status, "custom model fetched");
        Ok(transforms::to_custom_form_model(&model))
    }

    /// Delete a custom model.
    ///
    /// # Tracing
    ///
    /// Emits a span named `formrecognizer::training::delete_model` with field `model_id`.
    #[tracing::instrument(
        name = "formrecognizer::training::delete_model",
        skip(self),
        fields(model_id = %model_id)
    )]
    pub async fn delete_model(&self, model_id: &str) -> FormRecognizerResult<()> {
        let model_id = validate_model_id(model_id)?;
        tracing::debug!("deleting custom model");

        let url = self.client.service_url(&format!("custom/models/{model_id}"))?;
        self.client.delete(url).await?;
        Ok(())
    }

    /// List every custom model on the resource, following `nextLink` pages.
    ///
    /// # Tracing
    ///
    /// Emits a span named `formrecognizer::training::list_custom_models`.
    #[tracing::instrument(name = "formrecognizer::training::list_custom_models", skip(self))]
    pub async fn list_custom_models(&self) -> FormRecognizerResult<Vec<CustomFormModelInfo>> {
        let mut models = Vec::new();
        let mut next = Some(self.client.service_url("custom/models?op=full")?);
        let mut seen = HashSet::new();
        let mut pages = 0u32;

        while let Some(url) = next.take() {
            if !seen.insert(url.clone()) {
                tracing::warn!(next_link = %url, "nextLink repeats an earlier page, stopping");
                break;
            }

            let page: Models = self.client.get(url).await?.json()?;
            pages += 1;
            models.extend(page.model_list.iter().map(transforms::to_custom_form_model_info));

            next = match page.next_link.as_deref() {
                Some(link) if !link.is_empty() => Some(self.client.resolve_link(link)?),
                _ => None,
            };
        }

        tracing::debug!(count = models.len(), pages, "custom models listed");
        Ok(models)
    }

    /// Custom model count and limit for the resource.
    ///
    /// # Tracing
    ///
    /// Emits a span named `formrecognizer::training::get_account_properties`.
    #[tracing::instrument(name = "formrecognizer::training::get_account_properties", skip(self))]
    pub async fn get_account_properties(&self) -> FormRecognizerResult<AccountProperties> {
        let url = self.client.service_url("custom/models?op=summary")?;
        let models: Models = self.client.get(url).await?.json()?;
        let summary = models.summary.unwrap_or_default();

        tracing::debug!(count = summary.count, limit = summary.limit, "account properties fetched");
        Ok(transforms::to_account_properties(&summary))
    }
}
