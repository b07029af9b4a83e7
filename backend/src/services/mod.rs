pub mod analytics;
pub mod dashboard;
pub mod goals;
pub mod grades;
pub mod students;
pub mod templates;
pub mod upload;

use crate::db::StoreError;
use actix_web::error::InternalError;
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use common::model::upload::ErrorResponse;
use log::{error, warn};
use serde::Serialize;

pub const STUDENT_NOT_FOUND: &str = "학생을 찾을 수 없습니다";
const BAD_REQUEST: &str = "잘못된 요청입니다";

fn rejected(err: impl std::fmt::Display + std::fmt::Debug + 'static) -> actix_web::Error {
    warn!("Rejected request: {}", err);
    InternalError::from_response(
        err,
        HttpResponse::BadRequest().json(ErrorResponse::new(BAD_REQUEST)),
    )
    .into()
}

/// Registers every API scope on the application.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::QueryConfig::default().error_handler(|err, _| rejected(err)))
        .app_data(
            web::JsonConfig::default()
                .limit(1024 * 1024)
                .error_handler(|err, _| rejected(err)),
        )
        .service(upload::configure_routes())
        .service(templates::configure_routes())
        .service(students::configure_routes())
        .service(grades::configure_routes())
        .service(goals::configure_routes())
        .service(dashboard::configure_routes())
        .service(analytics::configure_routes());
}

/// Runs a read query on the blocking pool and answers with its JSON, or a
/// `500` carrying `failure` when the query or the task fails.
pub(crate) async fn query_json<T, F>(query: F, failure: &'static str) -> HttpResponse
where
    T: Serialize + Send + 'static,
    F: FnOnce() -> Result<T, StoreError> + Send + 'static,
{
    match tokio::task::spawn_blocking(query).await {
        Ok(Ok(value)) => HttpResponse::Ok().json(value),
        Ok(Err(e)) => {
            error!("{}: {}", failure, e);
            HttpResponse::InternalServerError().json(ErrorResponse::new(failure))
        }
        Err(join_err) => {
            error!("{}: {}", failure, join_err);
            HttpResponse::InternalServerError().json(ErrorResponse::new(failure))
        }
    }
}

/// Why a single-record write was not carried out.
#[derive(Debug, thiserror::Error)]
pub(crate) enum WriteError {
    /// Validation messages, in rule order.
    #[error("invalid record: {0:?}")]
    Invalid(Vec<String>),
    #[error("{0}")]
    NotFound(&'static str),
    #[error("the store returned no row")]
    NothingWritten,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Like [`query_json`] for writes: answers `success` with the JSON of the
/// written value, `400` with the first validation message, `404` for a
/// missing target.
pub(crate) async fn write_json<T, F>(
    write: F,
    success: StatusCode,
    failure: &'static str,
) -> HttpResponse
where
    T: Serialize + Send + 'static,
    F: FnOnce() -> Result<T, WriteError> + Send + 'static,
{
    match tokio::task::spawn_blocking(write).await {
        Ok(Ok(value)) => HttpResponse::build(success).json(value),
        Ok(Err(WriteError::Invalid(errors))) => {
            let first = errors.into_iter().next().unwrap_or_else(|| BAD_REQUEST.to_string());
            HttpResponse::BadRequest().json(ErrorResponse::new(first))
        }
        Ok(Err(WriteError::NotFound(message))) => {
            HttpResponse::NotFound().json(ErrorResponse::new(message))
        }
        Ok(Err(e @ (WriteError::Store(_) | WriteError::NothingWritten))) => {
            error!("{}: {}", failure, e);
            HttpResponse::InternalServerError().json(ErrorResponse::new(failure))
        }
        Err(join_err) => {
            error!("{}: {}", failure, join_err);
            HttpResponse::InternalServerError().json(ErrorResponse::new(failure))
        }
    }
}
