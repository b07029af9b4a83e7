//! Grade endpoints.
//!
//! - `GET /api/grades?studentId=&subject=`: recorded grades, most recent exam
//!   first, each with a summary of its student.
//! - `POST /api/grades`: records one grade for a student of the caller's
//!   academy (staff only).

mod create;
mod list;

use actix_web::web::{get, post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/grades";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(list::process))
        .route("", post().to(create::process))
}
