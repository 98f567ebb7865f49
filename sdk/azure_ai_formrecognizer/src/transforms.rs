//! Conversion from service payloads to the public model.
//!
//! Every function here is pure: the same input always produces an equal output,
//! and pages, lines and tables keep the order the service reported them in.

use chrono::{NaiveDate, NaiveTime};
use std::collections::BTreeMap;

use crate::models::{
    AccountProperties, BoundingBox, CustomFormModel, CustomFormModelField, CustomFormModelInfo,
    CustomFormSubmodel, FieldData, FieldValue, FormElement, FormField, FormLine, FormPage,
    FormPageRange, FormRecognizerErrorInformation, FormTable, FormTableCell, FormWord, Point,
    RecognizedForm, RecognizedReceipt, TrainingDocumentInfo,
};
use crate::service_models::{
    self as wire, AnalyzeResult, DataTable, FieldValueType, KeyValueElement, Model, ModelInfo,
    ModelsSummary, PageResult, ReadResult, TextLine, TextWord,
};

/// Confidence reported when the service omits one.
pub const DEFAULT_CONFIDENCE: f32 = 1.0;

/// Locale assigned to recognized receipts.
pub const RECEIPT_LOCALE: &str = "en-US";

const READ_RESULTS_PREFIX: &str = "#/readResults/";

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// One [`FormPage`] per read result, numbered from 1 in source order.
///
/// Tables come from the page result at the same position. Lines are only
/// included when `include_field_elements` is set.
pub fn to_form_pages(result: &AnalyzeResult, include_field_elements: bool) -> Vec<FormPage> {
    build_pages(result, include_field_elements, include_field_elements)
}

/// Pages for layout recognition. Lines are always mapped, in source order;
/// `include_field_elements` only controls the elements behind table cells.
pub fn to_layout_pages(result: &AnalyzeResult, include_field_elements: bool) -> Vec<FormPage> {
    build_pages(result, true, include_field_elements)
}

fn build_pages(
    result: &AnalyzeResult,
    include_lines: bool,
    include_field_elements: bool,
) -> Vec<FormPage> {
    result
        .read_results
        .iter()
        .enumerate()
        .map(|(index, read)| {
            let page_number = index as u32 + 1;
            let tables = result
                .page_results
                .get(index)
                .map(|page| {
                    to_tables(
                        &page.tables,
                        page_number,
                        &result.read_results,
                        include_field_elements,
                    )
                })
                .unwrap_or_default();

            let lines = if include_lines {
                read.lines
                    .iter()
                    .map(|line| to_line(line, page_number))
                    .collect()
            } else {
                Vec::new()
            };

            FormPage {
                page_number,
                width: read.width,
                height: read.height,
                unit: read.unit,
                text_angle: read.angle.unwrap_or_default(),
                lines,
                tables,
            }
        })
        .collect()
}

fn to_tables(
    tables: &[DataTable],
    page_number: u32,
    read_results: &[ReadResult],
    include_field_elements: bool,
) -> Vec<FormTable> {
    tables
        .iter()
        .map(|table| FormTable {
            page_number,
            row_count: table.rows,
            column_count: table.columns,
            cells: table
                .cells
                .iter()
                .map(|cell| FormTableCell {
                    row_index: cell.row_index,
                    column_index: cell.column_index,
                    row_span: cell.row_span.unwrap_or(1),
                    column_span: cell.column_span.unwrap_or(1),
                    text: cell.text.clone(),
                    bounding_box: to_bounding_box(&cell.bounding_box),
                    confidence: cell.confidence.unwrap_or(DEFAULT_CONFIDENCE),
                    is_header: cell.is_header.unwrap_or(false),
                    is_footer: cell.is_footer.unwrap_or(false),
                    page_number,
                    field_elements: if include_field_elements {
                        resolve_elements(&cell.elements, read_results)
                    } else {
                        Vec::new()
                    },
                })
                .collect(),
        })
        .collect()
}

fn to_line(line: &TextLine, page_number: u32) -> FormLine {
    FormLine {
        text: line.text.clone(),
        bounding_box: to_bounding_box(&line.bounding_box),
        page_number,
        words: line
            .words
            .iter()
            .map(|word| to_word(word, page_number))
            .collect(),
    }
}

fn to_word(word: &TextWord, page_number: u32) -> FormWord {
    FormWord {
        text: word.text.clone(),
        bounding_box: to_bounding_box(&word.bounding_box),
        page_number,
        confidence: word.confidence.unwrap_or(DEFAULT_CONFIDENCE),
    }
}

/// Build a box from `[x1, y1, ..., x4, y4]`. Any other length yields `None`.
pub fn to_bounding_box(coordinates: &[f32]) -> Option<BoundingBox> {
    if coordinates.len() != 8 {
        return None;
    }
    Some(BoundingBox {
        points: coordinates
            .chunks_exact(2)
            .map(|pair| Point {
                x: pair[0],
                y: pair[1],
            })
            .collect(),
    })
}

/// Resolve a reference such as `#/readResults/0/lines/3/words/1`.
///
/// Returns `None` for references that point elsewhere (selection marks, for
/// example) or outside the read results.
pub fn resolve_element(reference: &str, read_results: &[ReadResult]) -> Option<FormElement> {
    let segments: Vec<&str> = reference
        .strip_prefix(READ_RESULTS_PREFIX)?
        .split('/')
        .collect();

    match segments.as_slice() {
        [page, "lines", line] => {
            let page_index: usize = page.parse().ok()?;
            let line = read_results
                .get(page_index)?
                .lines
                .get(line.parse::<usize>().ok()?)?;
            Some(FormElement::Line(to_line(line, page_index as u32 + 1)))
        }
        [page, "lines", line, "words", word] => {
            let page_index: usize = page.parse().ok()?;
            let word = read_results
                .get(page_index)?
                .lines
                .get(line.parse::<usize>().ok()?)?
                .words
                .get(word.parse::<usize>().ok()?)?;
            Some(FormElement::Word(to_word(word, page_index as u32 + 1)))
        }
        _ => None,
    }
}

fn resolve_elements(references: &[String], read_results: &[ReadResult]) -> Vec<FormElement> {
    references
        .iter()
        .filter_map(|reference| resolve_element(reference, read_results))
        .collect()
}

// ---------------------------------------------------------------------------
// Forms
// ---------------------------------------------------------------------------

/// Convert an analyze result into recognized forms.
///
/// Results with document results (labeled or prebuilt models) yield one form per
/// document. Otherwise each page result becomes a form whose fields are named
/// `field-<n>` after the position of the key-value pair on the page.
pub fn to_recognized_forms(
    result: &AnalyzeResult,
    include_field_elements: bool,
    model_id: Option<&str>,
) -> Vec<RecognizedForm> {
    let pages = to_form_pages(result, include_field_elements);

    if !result.document_results.is_empty() {
        return result
            .document_results
            .iter()
            .map(|document| {
                let page_range = match document.page_range.as_slice() {
                    [first, last, ..] => FormPageRange {
                        first_page: *first,
                        last_page: *last,
                    },
                    [only] => FormPageRange {
                        first_page: *only,
                        last_page: *only,
                    },
                    [] => FormPageRange {
                        first_page: 1,
                        last_page: pages.len() as u32,
                    },
                };

                let fields = document
                    .fields
                    .iter()
                    .map(|(name, value)| {
                        let field = to_form_field(
                            name,
                            value.as_ref(),
                            page_range.first_page,
                            &result.read_results,
                            include_field_elements,
                        );
                        (name.clone(), field)
                    })
                    .collect();

                RecognizedForm {
                    form_type: document.doc_type.clone(),
                    fields,
                    page_range,
                    pages: slice_pages(&pages, page_range),
                }
            })
            .collect();
    }

    result
        .page_results
        .iter()
        .map(|page| unlabeled_form(page, &pages, &result.read_results, include_field_elements, model_id))
        .collect()
}

/// Convert a prebuilt receipt result into receipts.
pub fn to_recognized_receipts(
    result: &AnalyzeResult,
    include_field_elements: bool,
) -> Vec<RecognizedReceipt> {
    to_recognized_forms(result, include_field_elements, None)
        .into_iter()
        .map(|recognized_form| RecognizedReceipt {
            receipt_locale: RECEIPT_LOCALE.to_string(),
            recognized_form,
        })
        .collect()
}

fn slice_pages(pages: &[FormPage], range: FormPageRange) -> Vec<FormPage> {
    let start = range.first_page.saturating_sub(1) as usize;
    let end = (range.last_page as usize).min(pages.len());
    pages.get(start..end).map(<[FormPage]>::to_vec).unwrap_or_default()
}

fn unlabeled_form(
    page: &PageResult,
    pages: &[FormPage],
    read_results: &[ReadResult],
    include_field_elements: bool,
    model_id: Option<&str>,
) -> RecognizedForm {
    let page_number = page.page;
    let form_type = match page.cluster_id {
        Some(cluster_id) => format!("form-{cluster_id}"),
        None => format!("custom:{}", model_id.unwrap_or_default()),
    };

    let fields = page
        .key_value_pairs
        .iter()
        .enumerate()
        .map(|(index, pair)| {
            let name = format!("field-{index}");
            let field = FormField {
                name: name.clone(),
                label_data: Some(to_field_data(&pair.key, page_number, read_results, include_field_elements)),
                value_data: Some(to_field_data(&pair.value, page_number, read_results, include_field_elements)),
                value: FieldValue::String(pair.value.text.clone()),
                confidence: pair.confidence.unwrap_or(DEFAULT_CONFIDENCE),
            };
            (name, field)
        })
        .collect();

    let page_range = FormPageRange {
        first_page: page_number,
        last_page: page_number,
    };

    RecognizedForm {
        form_type,
        fields,
        page_range,
        pages: slice_pages(pages, page_range),
    }
}

fn to_field_data(
    element: &KeyValueElement,
    page_number: u32,
    read_results: &[ReadResult],
    include_field_elements: bool,
) -> FieldData {
    FieldData {
        text: Some(element.text.clone()),
        bounding_box: to_bounding_box(&element.bounding_box),
        page_number,
        field_elements: if include_field_elements {
            resolve_elements(&element.elements, read_results)
        } else {
            Vec::new()
        },
    }
}

fn to_form_field(
    name: &str,
    value: Option<&wire::FieldValue>,
    fallback_page: u32,
    read_results: &[ReadResult],
    include_field_elements: bool,
) -> FormField {
    let Some(value) = value else {
        return FormField {
            name: name.to_string(),
            label_data: None,
            value_data: None,
            value: FieldValue::Empty,
            confidence: DEFAULT_CONFIDENCE,
        };
    };

    let page_number = value.page.unwrap_or(fallback_page);
    let value_data = (value.text.is_some() || !value.bounding_box.is_empty()).then(|| FieldData {
        text: value.text.clone(),
        bounding_box: to_bounding_box(&value.bounding_box),
        page_number,
        field_elements: if include_field_elements {
            resolve_elements(&value.elements, read_results)
        } else {
            Vec::new()
        },
    });

    let typed = match value.value_type {
        FieldValueType::String => value.value_string.clone().map(FieldValue::String),
        FieldValueType::PhoneNumber => value.value_phone_number.clone().map(FieldValue::PhoneNumber),
        FieldValueType::Date => value
            .value_date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            .map(FieldValue::Date),
        FieldValueType::Time => value
            .value_time
            .as_deref()
            .and_then(|t| NaiveTime::parse_from_str(t, "%H:%M:%S").ok())
            .map(FieldValue::Time),
        FieldValueType::SelectionMark => value.value_selection_mark.map(FieldValue::SelectionMark),
        FieldValueType::CountryRegion => value.value_country_region.clone().map(FieldValue::String),
        FieldValueType::Unknown => None,
        FieldValueType::Number => value.value_number.map(FieldValue::Float),
        FieldValueType::Integer => value.value_integer.map(FieldValue::Long),
        // Array items have no key of their own and carry the parent name.
        FieldValueType::Array => Some(FieldValue::List(
            value
                .value_array
                .iter()
                .map(|item| to_form_field(name, Some(item), page_number, read_results, include_field_elements))
                .collect(),
        )),
        FieldValueType::Object => Some(FieldValue::Map(
            value
                .value_object
                .iter()
                .map(|(key, item)| {
                    let field = to_form_field(key, Some(item), page_number, read_results, include_field_elements);
                    (key.clone(), field)
                })
                .collect(),
        )),
    };

    FormField {
        name: name.to_string(),
        label_data: None,
        value_data,
        value: typed.unwrap_or(FieldValue::Empty),
        confidence: value.confidence.unwrap_or(DEFAULT_CONFIDENCE),
    }
}

// ---------------------------------------------------------------------------
// Custom models
// ---------------------------------------------------------------------------

/// Convert a model description into a [`CustomFormModel`].
///
/// Models trained without labels get one submodel per cluster with fields named
/// `field-<n>`. Labeled models get a single `custom:<modelId>` submodel with
/// per-field accuracy.
pub fn to_custom_form_model(model: &Model) -> CustomFormModel {
    let info = &model.model_info;
    let train_result = model.train_result.clone().unwrap_or_default();

    let clusters = model
        .keys
        .as_ref()
        .map(|keys| &keys.clusters)
        .filter(|clusters| !clusters.is_empty());

    let submodels = if let Some(clusters) = clusters {
        clusters
            .iter()
            .map(|(cluster_id, keys)| CustomFormSubmodel {
                form_type: format!("form-{cluster_id}"),
                accuracy: None,
                fields: keys
                    .iter()
                    .enumerate()
                    .map(|(index, key)| {
                        let name = format!("field-{index}");
                        let field = CustomFormModelField {
                            name: name.clone(),
                            label: Some(key.clone()),
                            accuracy: None,
                        };
                        (name, field)
                    })
                    .collect(),
            })
            .collect()
    } else if !train_result.fields.is_empty() {
        vec![CustomFormSubmodel {
            form_type: format!("custom:{}", info.model_id),
            accuracy: train_result.average_model_accuracy,
            fields: train_result
                .fields
                .iter()
                .map(|report| {
                    let field = CustomFormModelField {
                        name: report.field_name.clone(),
                        label: None,
                        accuracy: Some(report.accuracy),
                    };
                    (report.field_name.clone(), field)
                })
                .collect::<BTreeMap<_, _>>(),
        }]
    } else {
        Vec::new()
    };

    CustomFormModel {
        model_id: info.model_id.clone(),
        status: info.status,
        training_started_on: info.created_date_time,
        training_completed_on: info.last_updated_date_time,
        submodels,
        model_errors: to_errors(&train_result.errors),
        training_documents: train_result
            .training_documents
            .iter()
            .map(|doc| TrainingDocumentInfo {
                name: doc.document_name.clone(),
                status: doc.status,
                page_count: doc.pages,
                errors: to_errors(&doc.errors),
            })
            .collect(),
    }
}

pub fn to_custom_form_model_info(info: &ModelInfo) -> CustomFormModelInfo {
    CustomFormModelInfo {
        model_id: info.model_id.clone(),
        status: info.status,
        training_started_on: info.created_date_time,
        training_completed_on: info.last_updated_date_time,
    }
}

pub fn to_account_properties(summary: &ModelsSummary) -> AccountProperties {
    AccountProperties {
        custom_model_count: summary.count,
        custom_model_limit: summary.limit,
    }
}

pub(crate) fn to_errors(errors: &[wire::ErrorInformation]) -> Vec<FormRecognizerErrorInformation> {
    errors
        .iter()
        .map(|e| FormRecognizerErrorInformation {
            code: e.code.clone(),
            message: e.message.clone(),
        })
        .collect()
}
