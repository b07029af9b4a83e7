//! `GET /api/dashboard`: headline counts, input and achievement rates, and
//! the latest grade entries for the caller's academy.

mod get;

use actix_web::web::scope;
use actix_web::Scope;

const API_PATH: &str = "/api/dashboard";

pub fn configure_routes() -> Scope {
    scope(API_PATH).route("", actix_web::web::get().to(get::process))
}
