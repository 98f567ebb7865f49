//! Public result model and per-call options.
//!
//! All result types are plain owned data built by [`transforms`](crate::transforms).
//! They derive `PartialEq`, so two conversions of the same payload can be compared.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

use azure_ai_formrecognizer_core::polling::DEFAULT_POLL_INTERVAL;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Options for [`begin_training`](crate::training::FormTrainingAsyncClient::begin_training).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingOptions {
    /// Only train on blobs whose name starts with this prefix.
    pub prefix: Option<String>,
    /// Include blobs in sub folders of the prefix.
    pub include_subfolders: bool,
    pub poll_interval: Duration,
}

impl Default for TrainingOptions {
    fn default() -> Self {
        Self {
            prefix: None,
            include_subfolders: false,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl TrainingOptions {
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn with_subfolders(mut self, include_subfolders: bool) -> Self {
        self.include_subfolders = include_subfolders;
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}

/// Options for the `begin_recognize_*` operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognizeOptions {
    /// Populate lines, words and field element references in the result.
    pub include_field_elements: bool,
    pub poll_interval: Duration,
}

impl Default for RecognizeOptions {
    fn default() -> Self {
        Self {
            include_field_elements: false,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl RecognizeOptions {
    pub fn with_field_elements(mut self, include_field_elements: bool) -> Self {
        self.include_field_elements = include_field_elements;
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}

/// Media type of a document sent as bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormContentType {
    ApplicationPdf,
    ImageJpeg,
    ImagePng,
    ImageTiff,
}

impl FormContentType {
    /// The `Content-Type` header value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ApplicationPdf => "application/pdf",
            Self::ImageJpeg => "image/jpeg",
            Self::ImagePng => "image/png",
            Self::ImageTiff => "image/tiff",
        }
    }

    /// Guess the content type from the leading magic bytes.
    pub fn detect(bytes: &[u8]) -> Option<Self> {
        match bytes {
            [0x25, 0x50, 0x44, 0x46, ..] => Some(Self::ApplicationPdf),
            [0xFF, 0xD8, ..] => Some(Self::ImageJpeg),
            [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, ..] => Some(Self::ImagePng),
            [0x49, 0x49, 0x2A, 0x00, ..] | [0x4D, 0x4D, 0x00, 0x2A, ..] => Some(Self::ImageTiff),
            _ => None,
        }
    }
}

impl std::fmt::Display for FormContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Geometry and text
// ---------------------------------------------------------------------------

/// Unit of page dimensions and coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    /// Images.
    #[default]
    Pixel,
    /// PDF documents.
    Inch,
    /// A unit this version of the crate does not know.
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

/// Quadrilateral, clockwise from the top-left corner relative to the text.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundingBox {
    pub points: Vec<Point>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormWord {
    pub text: String,
    pub bounding_box: Option<BoundingBox>,
    pub page_number: u32,
    pub confidence: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormLine {
    pub text: String,
    pub bounding_box: Option<BoundingBox>,
    pub page_number: u32,
    pub words: Vec<FormWord>,
}

/// A text element that a field or cell was read from.
#[derive(Debug, Clone, PartialEq)]
pub enum FormElement {
    Line(FormLine),
    Word(FormWord),
}

impl FormElement {
    pub fn text(&self) -> &str {
        match self {
            Self::Line(line) => &line.text,
            Self::Word(word) => &word.text,
        }
    }

    pub fn page_number(&self) -> u32 {
        match self {
            Self::Line(line) => line.page_number,
            Self::Word(word) => word.page_number,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormTableCell {
    pub row_index: u32,
    pub column_index: u32,
    pub row_span: u32,
    pub column_span: u32,
    pub text: String,
    pub bounding_box: Option<BoundingBox>,
    pub confidence: f32,
    pub is_header: bool,
    pub is_footer: bool,
    pub page_number: u32,
    /// Empty unless field elements were requested.
    pub field_elements: Vec<FormElement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormTable {
    pub page_number: u32,
    pub row_count: u32,
    pub column_count: u32,
    pub cells: Vec<FormTableCell>,
}

/// Layout of one page.
#[derive(Debug, Clone, PartialEq)]
pub struct FormPage {
    /// 1-based.
    pub page_number: u32,
    pub width: f32,
    pub height: f32,
    pub unit: LengthUnit,
    /// Rotation in degrees, clockwise.
    pub text_angle: f32,
    /// Empty unless field elements were requested.
    pub lines: Vec<FormLine>,
    pub tables: Vec<FormTable>,
}

// ---------------------------------------------------------------------------
// Forms and receipts
// ---------------------------------------------------------------------------

/// Where a field label or value was found.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldData {
    pub text: Option<String>,
    pub bounding_box: Option<BoundingBox>,
    pub page_number: u32,
    pub field_elements: Vec<FormElement>,
}

/// A typed field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    String(String),
    Date(NaiveDate),
    Time(NaiveTime),
    PhoneNumber(String),
    Float(f64),
    Long(i64),
    List(Vec<FormField>),
    Map(BTreeMap<String, FormField>),
    SelectionMark(SelectionMarkState),
    /// The field was not found or its value could not be read.
    Empty,
}

impl FieldValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) | Self::PhoneNumber(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// State of a checkbox or radio button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMarkState {
    Selected,
    Unselected,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    pub name: String,
    /// Only set for fields recognized without labels.
    pub label_data: Option<FieldData>,
    pub value_data: Option<FieldData>,
    pub value: FieldValue,
    pub confidence: f32,
}

/// Inclusive, 1-based page range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormPageRange {
    pub first_page: u32,
    pub last_page: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecognizedForm {
    /// `custom:<modelId>`, `form-<clusterId>` or the prebuilt document type.
    pub form_type: String,
    pub fields: BTreeMap<String, FormField>,
    pub page_range: FormPageRange,
    pub pages: Vec<FormPage>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecognizedReceipt {
    pub receipt_locale: String,
    pub recognized_form: RecognizedForm,
}

// ---------------------------------------------------------------------------
// Custom models
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomFormModelStatus {
    Creating,
    Ready,
    Invalid,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TrainingStatus {
    Succeeded,
    PartiallySucceeded,
    Failed,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormRecognizerErrorInformation {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrainingDocumentInfo {
    pub name: String,
    pub status: TrainingStatus,
    pub page_count: u32,
    pub errors: Vec<FormRecognizerErrorInformation>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CustomFormModelField {
    pub name: String,
    /// Key text, for fields learned without labels.
    pub label: Option<String>,
    /// Only reported for labeled training.
    pub accuracy: Option<f32>,
}

/// One form type a model can recognize.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomFormSubmodel {
    pub form_type: String,
    pub accuracy: Option<f32>,
    pub fields: BTreeMap<String, CustomFormModelField>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CustomFormModel {
    pub model_id: String,
    pub status: CustomFormModelStatus,
    pub training_started_on: Option<DateTime<Utc>>,
    pub training_completed_on: Option<DateTime<Utc>>,
    pub submodels: Vec<CustomFormSubmodel>,
    pub model_errors: Vec<FormRecognizerErrorInformation>,
    pub training_documents: Vec<TrainingDocumentInfo>,
}

/// Summary of a model, as returned by model listing.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomFormModelInfo {
    pub model_id: String,
    pub status: CustomFormModelStatus,
    pub training_started_on: Option<DateTime<Utc>>,
    pub training_completed_on: Option<DateTime<Utc>>,
}

/// Custom model usage for the resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountProperties {
    pub custom_model_count: u32,
    pub custom_model_limit: u32,
}
