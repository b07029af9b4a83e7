//! Student roster endpoints.
//!
//! - `GET /api/students?search=&grade=`: the caller's academy roster, newest
//!   first, each with its grade and goal counts.
//! - `POST /api/students`: registers one student (staff only), `201` with the
//!   stored row.
//! - `GET /api/students/{id}`: one student with its grades and goals, `404`
//!   when the id is not part of the caller's academy.

mod create;
mod detail;
mod list;

use actix_web::web::{get, post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/students";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(list::process))
        .route("", post().to(create::process))
        .route("/{student_id}", get().to(detail::process))
}
