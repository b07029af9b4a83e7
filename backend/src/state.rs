//! Application state shared by every worker via `web::Data`.

use crate::db::SqliteStore;
use crate::ingest::resolver::DuplicateNamePolicy;

#[derive(Clone)]
pub struct AppState {
    pub store: SqliteStore,
    pub duplicate_names: DuplicateNamePolicy,
}
