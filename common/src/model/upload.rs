//! Payloads exchanged by the spreadsheet upload endpoints.
//!
//! Every upload ends in exactly one of four shapes: a success summary, a
//! correction preview (HTTP 200, nothing written), a missing-student error or
//! a parse failure. Row numbers are always the physical spreadsheet row, with
//! the header on row 1.

use crate::model::goal::{Goal, GoalRecord};
use crate::model::grade::{Grade, GradeRecord};
use crate::model::student::{Student, StudentRecord};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A row rejected by the parser's shape checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseError {
    pub row: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

/// A mapped row that failed schema validation, with every violated rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvalidRow {
    pub row: u32,
    pub data: Map<String, Value>,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationOutcome<T> {
    pub valid: Vec<T>,
    pub invalid: Vec<InvalidRow>,
}

impl<T> ValidationOutcome<T> {
    pub fn total(&self) -> usize {
        self.valid.len() + self.invalid.len()
    }

    pub fn is_clean(&self) -> bool {
        self.invalid.is_empty()
    }
}

impl<T> Default for ValidationOutcome<T> {
    fn default() -> Self {
        ValidationOutcome {
            valid: Vec::new(),
            invalid: Vec::new(),
        }
    }
}

/// Records written by a successful upload, keyed by record type in JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreatedRecords {
    Students(Vec<Student>),
    Grades(Vec<Grade>),
    Goals(Vec<Goal>),
}

impl CreatedRecords {
    pub fn len(&self) -> usize {
        match self {
            CreatedRecords::Students(v) => v.len(),
            CreatedRecords::Grades(v) => v.len(),
            CreatedRecords::Goals(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PreviewRows {
    Students(ValidationOutcome<StudentRecord>),
    Grades(ValidationOutcome<GradeRecord>),
    Goals(ValidationOutcome<GoalRecord>),
}

impl PreviewRows {
    pub fn valid_len(&self) -> usize {
        match self {
            PreviewRows::Students(o) => o.valid.len(),
            PreviewRows::Grades(o) => o.valid.len(),
            PreviewRows::Goals(o) => o.valid.len(),
        }
    }

    pub fn invalid(&self) -> &[InvalidRow] {
        match self {
            PreviewRows::Students(o) => &o.invalid,
            PreviewRows::Grades(o) => &o.invalid,
            PreviewRows::Goals(o) => &o.invalid,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadSummary {
    pub created: usize,
    pub total: usize,
    pub valid_rows: usize,
    #[serde(flatten)]
    pub records: CreatedRecords,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewData {
    #[serde(flatten)]
    pub rows: PreviewRows,
    pub total_rows: usize,
    pub valid_rows: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadSuccessResponse {
    pub success: bool,
    pub data: UploadSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct PreviewResponse {
    pub success: bool,
    pub preview: bool,
    pub data: PreviewData,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingStudentsResponse {
    pub success: bool,
    pub error: String,
    pub missing_students: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ambiguous_students: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseFailureResponse {
    pub success: bool,
    pub error: String,
    pub parse_errors: Vec<ParseError>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        ErrorResponse {
            success: false,
            error: error.into(),
        }
    }
}
