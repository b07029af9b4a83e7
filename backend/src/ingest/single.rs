//! Single-record writes that reuse the upload schemas.
//!
//! A grade or goal body names its student by `studentId`. The student must
//! belong to the caller's academy; its name is then filled in as
//! `studentName` so the body passes through the same schema as an uploaded
//! row.

use crate::db::{SqliteStore, StoreError};
use crate::ingest::validator::RecordSchema;
use common::model::student::StudentSummary;
use serde_json::{Map, Value};

pub const STUDENT_REQUIRED: &str = "학생을 선택해주세요";

#[derive(Debug, PartialEq)]
pub enum Checked<T> {
    Valid(StudentSummary, T),
    Invalid(Vec<String>),
    UnknownStudent,
}

pub fn check_for_student<T: RecordSchema>(
    store: &SqliteStore,
    academy_id: &str,
    body: &Map<String, Value>,
) -> Result<Checked<T>, StoreError> {
    let student_id = match body.get("studentId").and_then(Value::as_str) {
        Some(id) if !id.trim().is_empty() => id,
        _ => return Ok(Checked::Invalid(vec![STUDENT_REQUIRED.to_string()])),
    };
    let Some(student) = store.student_summary(academy_id, student_id)? else {
        return Ok(Checked::UnknownStudent);
    };

    let mut fields = body.clone();
    fields.remove("studentId");
    fields.insert("studentName".to_string(), Value::String(student.name.clone()));
    Ok(match T::from_fields(&fields) {
        Ok(record) => Checked::Valid(student, record),
        Err(errors) => Checked::Invalid(errors),
    })
}
