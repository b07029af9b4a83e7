//! Upload orchestration.
//!
//! ```text
//! Received → Parsed → Mapped → Validated ─┬─ Aborted(invalid preview)
//!                                         └─ ReferenceResolving ─┬─ Aborted(unresolved students)
//!                                                                └─ Persisted
//! ```
//!
//! A preview is a successful return (nothing written); every other abort is
//! an [`UploadError`]. There is no partially committed outcome.

use crate::db::AcademyStore;
use crate::ingest::error::UploadError;
use crate::ingest::mapper::{self, MappedRow};
use crate::ingest::parser::{self, UploadedFile};
use crate::ingest::resolver::{self, DuplicateNamePolicy};
use crate::ingest::validator::validate_rows;
use crate::ingest::persister;
use crate::tenant::TenantScope;
use common::model::goal::GoalRecord;
use common::model::grade::GradeRecord;
use common::model::record_type::RecordType;
use common::model::student::StudentRecord;
use common::model::upload::{CreatedRecords, PreviewData, PreviewRows, UploadSummary, ValidationOutcome};
use log::{info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum UploadOutcome {
    Persisted(UploadSummary),
    Preview(PreviewData),
}

fn preview(rows: PreviewRows, total_rows: usize) -> UploadOutcome {
    warn!(
        "Upload has {} invalid row(s), returning preview",
        rows.invalid().len()
    );
    let valid_rows = rows.valid_len();
    UploadOutcome::Preview(PreviewData {
        rows,
        total_rows,
        valid_rows,
    })
}

fn persisted(records: CreatedRecords, total: usize, valid_rows: usize) -> UploadOutcome {
    UploadOutcome::Persisted(UploadSummary {
        created: records.len(),
        total,
        valid_rows,
        records,
    })
}

/// Runs one upload end to end against `store` on behalf of `scope`.
pub fn run_upload<S: AcademyStore + ?Sized>(
    store: &S,
    scope: &TenantScope,
    record_type: RecordType,
    file: &UploadedFile,
    policy: DuplicateNamePolicy,
) -> Result<UploadOutcome, UploadError> {
    info!("Parsing {} spreadsheet '{}'...", record_type, file.file_name);
    let parsed = parser::parse_upload(file, record_type)?;
    if !parsed.errors.is_empty() {
        warn!("{} parse error(s) in '{}'", parsed.errors.len(), file.file_name);
        return Err(UploadError::RowErrors(parsed.errors));
    }
    let total = parsed.total_rows;

    info!("Mapping {} rows...", parsed.rows.len());
    let mapped = mapper::map_rows(&parsed.rows, record_type);

    info!("Validating {} rows...", mapped.len());
    match record_type {
        RecordType::Students => import_students(store, scope, &mapped, total),
        RecordType::Grades => import_grades(store, scope, &mapped, total, policy),
        RecordType::Goals => import_goals(store, scope, &mapped, total, policy),
    }
}

fn import_students<S: AcademyStore + ?Sized>(
    store: &S,
    scope: &TenantScope,
    mapped: &[MappedRow],
    total: usize,
) -> Result<UploadOutcome, UploadError> {
    let outcome: ValidationOutcome<StudentRecord> = validate_rows(mapped);
    if !outcome.is_clean() {
        return Ok(preview(PreviewRows::Students(outcome), total));
    }
    let valid_rows = outcome.valid.len();
    let created = persister::persist_students(store, scope, &outcome.valid)?;
    Ok(persisted(CreatedRecords::Students(created), total, valid_rows))
}

fn import_grades<S: AcademyStore + ?Sized>(
    store: &S,
    scope: &TenantScope,
    mapped: &[MappedRow],
    total: usize,
    policy: DuplicateNamePolicy,
) -> Result<UploadOutcome, UploadError> {
    let outcome: ValidationOutcome<GradeRecord> = validate_rows(mapped);
    if !outcome.is_clean() {
        return Ok(preview(PreviewRows::Grades(outcome), total));
    }
    let valid_rows = outcome.valid.len();
    let ids = resolver::resolve_student_names(
        store,
        scope,
        outcome.valid.iter().map(|g| g.student_name.as_str()),
        policy,
    )?;
    let created = persister::persist_grades(store, outcome.valid, &ids)?;
    Ok(persisted(CreatedRecords::Grades(created), total, valid_rows))
}

fn import_goals<S: AcademyStore + ?Sized>(
    store: &S,
    scope: &TenantScope,
    mapped: &[MappedRow],
    total: usize,
    policy: DuplicateNamePolicy,
) -> Result<UploadOutcome, UploadError> {
    let outcome: ValidationOutcome<GoalRecord> = validate_rows(mapped);
    if !outcome.is_clean() {
        return Ok(preview(PreviewRows::Goals(outcome), total));
    }
    let valid_rows = outcome.valid.len();
    let ids = resolver::resolve_student_names(
        store,
        scope,
        outcome.valid.iter().map(|g| g.student_name.as_str()),
        policy,
    )?;
    let created = persister::persist_goals(store, outcome.valid, &ids)?;
    Ok(persisted(CreatedRecords::Goals(created), total, valid_rows))
}
