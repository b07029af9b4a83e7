//! Spreadsheet ingestion.
//!
//! An upload moves through `parser` → `mapper` → `validator`, then for record
//! types that reference students by name through `resolver`, and finally
//! `persister`. `pipeline` wires the stages together and decides the outcome:
//! either everything is written or nothing is.

pub mod error;
pub mod mapper;
pub mod parser;
pub mod persister;
pub mod pipeline;
pub mod resolver;
pub mod single;
pub mod validator;

pub use error::UploadError;
pub use parser::UploadedFile;
