use crate::db::AcademyStore;
use crate::ingest::validator::RecordSchema;
use crate::services::{write_json, WriteError};
use crate::state::AppState;
use crate::tenant::TenantScope;
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use common::model::student::StudentRecord;
use log::info;
use serde_json::{Map, Value};

/// The body uses the same fields and rules as an uploaded student row.
pub async fn process(
    tenant: TenantScope,
    body: web::Json<Map<String, Value>>,
    state: web::Data<AppState>,
) -> HttpResponse {
    if let Err(e) = tenant.require_staff() {
        return e.error_response();
    }
    let store = state.store.clone();
    let fields = body.into_inner();
    write_json(
        move || {
            let record = StudentRecord::from_fields(&fields).map_err(WriteError::Invalid)?;
            let mut created = store.insert_students(&tenant.academy_id, &[record])?;
            let student = created.pop().ok_or(WriteError::NothingWritten)?;
            info!("Registered student {} for academy {}", student.id, tenant.academy_id);
            Ok(student)
        },
        StatusCode::CREATED,
        "학생 등록에 실패했습니다",
    )
    .await
}
