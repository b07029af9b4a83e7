//! `GET /api/analytics`: score statistics for the caller's academy. Top
//! performers, per-subject averages, the score distribution, and monthly
//! averages over the last six months.

mod get;

use actix_web::web::scope;
use actix_web::Scope;

const API_PATH: &str = "/api/analytics";

pub fn configure_routes() -> Scope {
    scope(API_PATH).route("", actix_web::web::get().to(get::process))
}
