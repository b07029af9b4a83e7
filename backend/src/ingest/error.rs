use crate::db::StoreError;
use common::model::upload::ParseError;

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// The file could not be decoded as a spreadsheet at all.
    #[error("spreadsheet could not be decoded: {0}")]
    Structural(String),
    /// Rows failed the parser's presence/shape checks.
    #[error("{} row(s) failed shape checks", .0.len())]
    RowErrors(Vec<ParseError>),
    /// Student names that match no student, or more than one.
    #[error("unresolved students (missing: {missing:?}, ambiguous: {ambiguous:?})")]
    UnresolvedStudents {
        missing: Vec<String>,
        ambiguous: Vec<String>,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
}
