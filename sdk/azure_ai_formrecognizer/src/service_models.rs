//! Wire types for the Form Recognizer v2.x REST API.
//!
//! These mirror the service JSON and are converted into the public model by
//! [`transforms`](crate::transforms). Every collection defaults to empty and every
//! scalar the service may omit is an `Option`, so partial payloads still parse.
//! Unknown properties are ignored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{CustomFormModelStatus, LengthUnit, SelectionMarkState, TrainingStatus};

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Body of `POST /custom/models`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainRequest {
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_filter: Option<TrainSourceFilter>,
    pub use_label_file: bool,
}

/// Restricts training to blobs under a prefix.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainSourceFilter {
    pub prefix: String,
    pub include_sub_folders: bool,
}

/// Body of the analyze endpoints when the document is referenced by URL.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourcePath {
    pub source: String,
}

// ---------------------------------------------------------------------------
// Analyze results
// ---------------------------------------------------------------------------

/// Status of an analyze operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OperationStatus {
    NotStarted,
    Running,
    Succeeded,
    Failed,
}

impl OperationStatus {
    /// Returns `true` if the operation has finished, successfully or not.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

/// Response of `GET .../analyzeResults/{resultId}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeOperationResult {
    pub status: OperationStatus,
    pub created_date_time: Option<DateTime<Utc>>,
    pub last_updated_date_time: Option<DateTime<Utc>>,
    pub analyze_result: Option<AnalyzeResult>,
    /// Some failures are reported here rather than in `analyzeResult.errors`.
    pub error: Option<ErrorInformation>,
}

/// Text, layout and field data extracted from a document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResult {
    pub version: Option<String>,
    #[serde(default)]
    pub read_results: Vec<ReadResult>,
    #[serde(default)]
    pub page_results: Vec<PageResult>,
    #[serde(default)]
    pub document_results: Vec<DocumentResult>,
    #[serde(default)]
    pub errors: Vec<ErrorInformation>,
}

/// OCR output for one page.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadResult {
    pub page: u32,
    pub angle: Option<f32>,
    #[serde(default)]
    pub width: f32,
    #[serde(default)]
    pub height: f32,
    #[serde(default)]
    pub unit: LengthUnit,
    pub language: Option<String>,
    /// Only present when text details were requested.
    #[serde(default)]
    pub lines: Vec<TextLine>,
    /// Checkbox and radio-button marks (v2.1). Not surfaced in the public model.
    #[serde(default)]
    pub selection_marks: Vec<SelectionMark>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionMark {
    #[serde(default)]
    pub bounding_box: Vec<f32>,
    pub confidence: Option<f32>,
    /// `selected` or `unselected`.
    #[serde(default)]
    pub state: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextLine {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub bounding_box: Vec<f32>,
    #[serde(default)]
    pub words: Vec<TextWord>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextWord {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub bounding_box: Vec<f32>,
    pub confidence: Option<f32>,
}

/// Key-value pairs and tables extracted from one page.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult {
    pub page: u32,
    pub cluster_id: Option<i32>,
    #[serde(default)]
    pub key_value_pairs: Vec<KeyValuePair>,
    #[serde(default)]
    pub tables: Vec<DataTable>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyValuePair {
    pub label: Option<String>,
    #[serde(default)]
    pub key: KeyValueElement,
    #[serde(default)]
    pub value: KeyValueElement,
    pub confidence: Option<f32>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyValueElement {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub bounding_box: Vec<f32>,
    /// JSON pointers into `readResults`, e.g. `#/readResults/0/lines/1/words/2`.
    #[serde(default)]
    pub elements: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataTable {
    #[serde(default)]
    pub rows: u32,
    #[serde(default)]
    pub columns: u32,
    #[serde(default)]
    pub cells: Vec<DataTableCell>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataTableCell {
    #[serde(default)]
    pub row_index: u32,
    #[serde(default)]
    pub column_index: u32,
    pub row_span: Option<u32>,
    pub column_span: Option<u32>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub bounding_box: Vec<f32>,
    pub confidence: Option<f32>,
    #[serde(default)]
    pub elements: Vec<String>,
    pub is_header: Option<bool>,
    pub is_footer: Option<bool>,
}

/// A document recognized by a labeled or prebuilt model.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentResult {
    #[serde(default)]
    pub doc_type: String,
    /// `[first, last]`, 1-based and inclusive.
    #[serde(default)]
    pub page_range: Vec<u32>,
    /// A field the model knows about but did not find is `null`.
    #[serde(default)]
    pub fields: BTreeMap<String, Option<FieldValue>>,
}

/// Semantic type of an extracted field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldValueType {
    String,
    Date,
    Time,
    PhoneNumber,
    Number,
    Integer,
    Array,
    Object,
    SelectionMark,
    CountryRegion,
    /// A type added by a newer service version. Read as an empty value.
    #[serde(other)]
    Unknown,
}

/// A typed field value. Only the `value*` member matching `type` is set.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldValue {
    #[serde(rename = "type")]
    pub value_type: FieldValueType,
    pub value_string: Option<String>,
    /// `yyyy-mm-dd`
    pub value_date: Option<String>,
    /// `hh:mm:ss`
    pub value_time: Option<String>,
    pub value_phone_number: Option<String>,
    pub value_selection_mark: Option<SelectionMarkState>,
    /// ISO 3166-1 alpha-3 code.
    pub value_country_region: Option<String>,
    pub value_number: Option<f64>,
    pub value_integer: Option<i64>,
    #[serde(default)]
    pub value_array: Vec<FieldValue>,
    #[serde(default)]
    pub value_object: BTreeMap<String, FieldValue>,
    pub text: Option<String>,
    #[serde(default)]
    pub bounding_box: Vec<f32>,
    pub confidence: Option<f32>,
    #[serde(default)]
    pub elements: Vec<String>,
    pub page: Option<u32>,
}

/// An error reported by the service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ErrorInformation {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

// ---------------------------------------------------------------------------
// Custom models
// ---------------------------------------------------------------------------

/// Response of `GET /custom/models/{modelId}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    pub model_info: ModelInfo,
    /// Present for models trained without labels.
    pub keys: Option<KeysResult>,
    pub train_result: Option<TrainResult>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    pub model_id: String,
    pub status: CustomFormModelStatus,
    pub created_date_time: Option<DateTime<Utc>>,
    pub last_updated_date_time: Option<DateTime<Utc>>,
}

/// Keys found per cluster, keyed by cluster id.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct KeysResult {
    #[serde(default)]
    pub clusters: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainResult {
    #[serde(default)]
    pub training_documents: Vec<TrainingDocument>,
    /// Per-field accuracy; only reported for labeled training.
    #[serde(default)]
    pub fields: Vec<FormFieldsReport>,
    pub average_model_accuracy: Option<f32>,
    #[serde(default)]
    pub errors: Vec<ErrorInformation>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingDocument {
    pub document_name: String,
    #[serde(default)]
    pub pages: u32,
    #[serde(default)]
    pub errors: Vec<ErrorInformation>,
    pub status: TrainingStatus,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormFieldsReport {
    pub field_name: String,
    #[serde(default)]
    pub accuracy: f32,
}

/// Response of `GET /custom/models?op=full|summary`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Models {
    pub summary: Option<ModelsSummary>,
    #[serde(default)]
    pub model_list: Vec<ModelInfo>,
    pub next_link: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelsSummary {
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub limit: u32,
    pub last_updated_date_time: Option<DateTime<Utc>>,
}
