//! Goal endpoints.
//!
//! - `GET /api/goals?studentId=`: learning goals by nearest deadline, each
//!   with a summary of its student.
//! - `POST /api/goals`: sets one goal for a student of the caller's academy
//!   (staff only). New goals start `IN_PROGRESS`.
//! - `PATCH /api/goals/{id}`: records progress (`currentScore`) and/or the
//!   outcome (`status`: `IN_PROGRESS`, `ACHIEVED`, `FAILED`).

mod create;
mod list;
mod update;

use actix_web::web::{get, patch, post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/goals";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(list::process))
        .route("", post().to(create::process))
        .route("/{goal_id}", patch().to(update::process))
}
