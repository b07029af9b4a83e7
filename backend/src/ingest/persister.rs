//! Transactional bulk writes for fully validated, fully resolved records.

use crate::db::AcademyStore;
use crate::ingest::error::UploadError;
use crate::ingest::resolver::distinct_names;
use crate::tenant::TenantScope;
use common::model::goal::{Goal, GoalRecord};
use common::model::grade::{Grade, GradeRecord};
use common::model::student::{Student, StudentRecord};
use log::{error, info};
use std::collections::HashMap;

trait NamedRecord {
    fn student_name(&self) -> &str;
}

impl NamedRecord for GradeRecord {
    fn student_name(&self) -> &str {
        &self.student_name
    }
}

impl NamedRecord for GoalRecord {
    fn student_name(&self) -> &str {
        &self.student_name
    }
}

/// Pairs each record with its resolved student id. A name absent from `ids`
/// fails the batch rather than dropping the record.
fn link<T: NamedRecord>(
    records: Vec<T>,
    ids: &HashMap<String, String>,
) -> Result<Vec<(String, T)>, UploadError> {
    let missing = distinct_names(
        records
            .iter()
            .map(NamedRecord::student_name)
            .filter(|name| !ids.contains_key(*name)),
    );
    if !missing.is_empty() {
        return Err(UploadError::UnresolvedStudents {
            missing,
            ambiguous: Vec::new(),
        });
    }
    Ok(records
        .into_iter()
        .filter_map(|record| {
            let id = ids.get(record.student_name())?.clone();
            Some((id, record))
        })
        .collect())
}

fn logged<T>(kind: &str, result: Result<Vec<T>, crate::db::StoreError>) -> Result<Vec<T>, UploadError> {
    match result {
        Ok(created) => {
            info!("Successfully created {} {}", created.len(), kind);
            Ok(created)
        }
        Err(e) => {
            error!("Saving {} failed, batch rolled back: {}", kind, e);
            Err(e.into())
        }
    }
}

pub fn persist_students<S: AcademyStore + ?Sized>(
    store: &S,
    scope: &TenantScope,
    records: &[StudentRecord],
) -> Result<Vec<Student>, UploadError> {
    info!("Saving {} students to database...", records.len());
    logged("students", store.insert_students(&scope.academy_id, records))
}

pub fn persist_grades<S: AcademyStore + ?Sized>(
    store: &S,
    records: Vec<GradeRecord>,
    ids: &HashMap<String, String>,
) -> Result<Vec<Grade>, UploadError> {
    let linked = link(records, ids)?;
    info!("Saving {} grades to database...", linked.len());
    logged("grades", store.insert_grades(&linked))
}

pub fn persist_goals<S: AcademyStore + ?Sized>(
    store: &S,
    records: Vec<GoalRecord>,
    ids: &HashMap<String, String>,
) -> Result<Vec<Goal>, UploadError> {
    let linked = link(records, ids)?;
    info!("Saving {} goals to database...", linked.len());
    logged("goals", store.insert_goals(&linked))
}
