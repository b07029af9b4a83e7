//! Spreadsheet upload endpoints, one per record type.
//!
//! - `POST /api/upload/students`
//! - `POST /api/upload/grades`
//! - `POST /api/upload/goals`
//!
//! Each expects `multipart/form-data` with a single `file` part holding an
//! `.xlsx`/`.xls`/`.ods` workbook or a `.csv` file, and requires an `ADMIN` or
//! `TEACHER` caller. Responses:
//!
//! - `200 { success: true, data: { created, total, validRows, <type>: [...] } }`
//! - `200 { success: false, preview: true, data: { valid, invalid, totalRows, validRows } }`
//!   when any row fails validation; nothing is written.
//! - `400 { success: false, error, missingStudents, ambiguousStudents? }` when
//!   a referenced student cannot be resolved; nothing is written.
//! - `400 { success: false, error, parseErrors }` when the file cannot be read
//!   or rows fail the shape checks.

use actix_web::web::{post, scope};
use actix_web::Scope;

mod process;
mod respond;

const API_PATH: &str = "/api/upload";

pub fn configure_routes() -> Scope {
    scope(API_PATH).route("/{record_type}", post().to(process::process))
}
