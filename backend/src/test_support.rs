//! Fixtures shared by the in-crate tests.

use crate::db::{AcademyStore, SqliteStore};
use crate::ingest::resolver::DuplicateNamePolicy;
use crate::ingest::UploadedFile;
use crate::state::AppState;
use common::model::student::{Student, StudentRecord};

pub const BOUNDARY: &str = "----academy-test-boundary";

pub fn csv_file(name: &str, contents: &str) -> UploadedFile {
    UploadedFile::new(name, contents.as_bytes().to_vec())
}

pub fn seed_students(store: &SqliteStore, academy_id: &str, names: &[&str]) -> Vec<Student> {
    let records: Vec<StudentRecord> = names
        .iter()
        .map(|name| StudentRecord {
            name: name.to_string(),
            grade: 3,
            class: None,
            phone: None,
            parent_phone: None,
            address: None,
        })
        .collect();
    store.insert_students(academy_id, &records).unwrap()
}

pub fn count_rows(store: &SqliteStore, table: &str) -> i64 {
    store
        .with_conn(|conn| {
            Ok(conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
                row.get(0)
            })?)
        })
        .unwrap()
}

pub fn test_state() -> AppState {
    AppState {
        store: SqliteStore::open_in_memory().unwrap(),
        duplicate_names: DuplicateNamePolicy::Reject,
    }
}

/// A `multipart/form-data` body with a single `file` part.
pub fn multipart_body(file_name: &str, bytes: &[u8]) -> (String, Vec<u8>) {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
            file_name
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    (format!("multipart/form-data; boundary={}", BOUNDARY), body)
}
