//! Bulk import of applicant records from JSON or CSV files.
//!
//! Values are read as raw text and run through the same catalog rules as the
//! interactive form, so an out-of-set province or a blank cell is reported
//! per field instead of failing the whole file.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde_json::Value;

use super::catalog::FieldCatalog;
use super::domain::{ApplicationData, FieldName, ValidationReport};
use super::form::FormDraft;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFormat {
    Json,
    Csv,
}

impl RecordFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "json" => Some(Self::Json),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RecordImportError {
    #[error("failed to read applicant records: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid applicant JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid applicant CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("expected a JSON object or an array of objects")]
    UnexpectedJsonShape,
    #[error("cannot infer record format of {path}; use a .json or .csv extension")]
    UnknownFormat { path: String },
}

/// One imported row and the result of checking it.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordCheck {
    /// 1-based position in the file (data rows only for CSV).
    pub position: usize,
    pub draft: FormDraft,
    pub outcome: Result<ApplicationData, ValidationReport>,
}

impl RecordCheck {
    fn new(position: usize, draft: FormDraft, catalog: &FieldCatalog) -> Self {
        let outcome = draft.validate(catalog);
        Self {
            position,
            draft,
            outcome,
        }
    }

    pub fn applicant_id(&self) -> &str {
        self.draft.get(FieldName::ApplicantId)
    }

    pub fn is_valid(&self) -> bool {
        self.outcome.is_ok()
    }
}

pub fn load_drafts(path: &Path) -> Result<Vec<FormDraft>, RecordImportError> {
    let format = RecordFormat::from_path(path).ok_or_else(|| RecordImportError::UnknownFormat {
        path: path.display().to_string(),
    })?;
    let file = File::open(path)?;
    match format {
        RecordFormat::Json => drafts_from_json(file),
        RecordFormat::Csv => drafts_from_csv(file),
    }
}

pub fn check_file(
    path: &Path,
    catalog: &FieldCatalog,
) -> Result<Vec<RecordCheck>, RecordImportError> {
    Ok(check_drafts(load_drafts(path)?, catalog))
}

pub fn check_drafts(drafts: Vec<FormDraft>, catalog: &FieldCatalog) -> Vec<RecordCheck> {
    drafts
        .into_iter()
        .enumerate()
        .map(|(index, draft)| RecordCheck::new(index + 1, draft, catalog))
        .collect()
}

pub fn drafts_from_json<R: Read>(reader: R) -> Result<Vec<FormDraft>, RecordImportError> {
    let value: Value = serde_json::from_reader(reader)?;
    match value {
        Value::Object(object) => Ok(vec![draft_from_object(&object)]),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_object()
                    .map(draft_from_object)
                    .ok_or(RecordImportError::UnexpectedJsonShape)
            })
            .collect(),
        _ => Err(RecordImportError::UnexpectedJsonShape),
    }
}

fn draft_from_object(object: &serde_json::Map<String, Value>) -> FormDraft {
    let mut draft = FormDraft::blank();
    for field in FieldName::ordered() {
        let raw = match object.get(field.key()) {
            Some(Value::String(text)) => text.clone(),
            Some(Value::Number(number)) => number.to_string(),
            Some(Value::Bool(flag)) => flag.to_string(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        };
        draft.set(field, raw);
    }
    draft
}

/// Header row names the fields; unknown columns are ignored, missing ones stay blank.
pub fn drafts_from_csv<R: Read>(reader: R) -> Result<Vec<FormDraft>, RecordImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns: BTreeMap<usize, FieldName> = csv_reader
        .headers()?
        .iter()
        .enumerate()
        .filter_map(|(index, header)| FieldName::from_key(header).map(|field| (index, field)))
        .collect();

    let mut drafts = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let mut draft = FormDraft::blank();
        for (index, field) in &columns {
            if let Some(cell) = record.get(*index) {
                draft.set(*field, cell);
            }
        }
        drafts.push(draft);
    }

    Ok(drafts)
}
