//! Student name → id resolution for grade and goal uploads.
//!
//! Resolution is all or nothing: one unknown (or, under
//! [`DuplicateNamePolicy::Reject`], ambiguous) name fails the whole batch.
//! Students are never created implicitly.

use crate::db::AcademyStore;
use crate::ingest::error::UploadError;
use crate::tenant::TenantScope;
use log::{info, warn};
use std::collections::{HashMap, HashSet};
use std::str::FromStr;

/// What to do when a name matches more than one student of the academy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicateNamePolicy {
    /// Report the name as ambiguous and abort the batch.
    #[default]
    Reject,
    /// Use the earliest registered student with that name.
    FirstMatch,
}

impl FromStr for DuplicateNamePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reject" => Ok(DuplicateNamePolicy::Reject),
            "first" => Ok(DuplicateNamePolicy::FirstMatch),
            other => Err(format!("unknown duplicate name policy '{}'", other)),
        }
    }
}

/// Distinct names in first-seen order.
pub fn distinct_names<'a, I>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    names
        .into_iter()
        .filter(|name| seen.insert(*name))
        .map(str::to_string)
        .collect()
}

/// Maps every distinct name to a student id of the caller's academy.
pub fn resolve_student_names<'a, S, I>(
    store: &S,
    scope: &TenantScope,
    names: I,
    policy: DuplicateNamePolicy,
) -> Result<HashMap<String, String>, UploadError>
where
    S: AcademyStore + ?Sized,
    I: IntoIterator<Item = &'a str>,
{
    let names = distinct_names(names);
    info!("Resolving {} student name(s)", names.len());

    let mut matches: HashMap<String, Vec<String>> = HashMap::new();
    for student in store.find_students_by_names(&scope.academy_id, &names)? {
        matches.entry(student.name).or_default().push(student.id);
    }

    let mut resolved = HashMap::with_capacity(names.len());
    let mut missing = Vec::new();
    let mut ambiguous = Vec::new();
    for name in names {
        match matches.get(&name).map(Vec::as_slice) {
            None | Some([]) => missing.push(name),
            Some([id]) => {
                resolved.insert(name, id.clone());
            }
            Some([first, ..]) => match policy {
                DuplicateNamePolicy::FirstMatch => {
                    resolved.insert(name, first.clone());
                }
                DuplicateNamePolicy::Reject => ambiguous.push(name),
            },
        }
    }

    if !missing.is_empty() || !ambiguous.is_empty() {
        warn!(
            "Unresolved students: missing {:?}, ambiguous {:?}",
            missing, ambiguous
        );
        return Err(UploadError::UnresolvedStudents { missing, ambiguous });
    }
    Ok(resolved)
}
