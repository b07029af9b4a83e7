//! # Template Service Module
//!
//! Serves the example spreadsheets staff fill in before uploading. Every
//! template carries the localized header row the upload mapper expects and a
//! handful of rows that pass validation as-is.
//!
//! ## Sub-modules:
//! - `sheet`: Builds the `.xlsx` bytes and names for each record type.
//! - `list`: Describes every available template.
//! - `download`: Streams one template as an attachment.

mod download;
mod list;
pub mod sheet;

use actix_web::web::{get, scope};
use actix_web::Scope;

/// The base path for all template-related API endpoints.
const API_PATH: &str = "/api/templates";

/// Configures and returns the Actix `Scope` for all template-related routes.
///
/// # Registered Routes:
///
/// *   **`GET /`**:
///     - **Handler**: `list::process`
///     - **Description**: Returns `{type, name, description, fileName}` for
///       students, grades and goals, in that order.
///
/// *   **`GET /{record_type}`**:
///     - **Handler**: `download::process`
///     - **Description**: Generates the spreadsheet for the given record type
///       and returns it with an `attachment` disposition. Unknown types get a
///       `400` with `{ error: "유효하지 않은 템플릿 타입입니다" }`.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(list::process))
        .route("/{record_type}", get().to(download::process))
}
