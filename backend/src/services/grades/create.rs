use crate::db::AcademyStore;
use crate::ingest::single::{check_for_student, Checked};
use crate::services::{write_json, WriteError, STUDENT_NOT_FOUND};
use crate::state::AppState;
use crate::tenant::TenantScope;
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use common::model::grade::{GradeListItem, GradeRecord};
use serde_json::{Map, Value};

pub async fn process(
    tenant: TenantScope,
    body: web::Json<Map<String, Value>>,
    state: web::Data<AppState>,
) -> HttpResponse {
    if let Err(e) = tenant.require_staff() {
        return e.error_response();
    }
    let store = state.store.clone();
    let body = body.into_inner();
    write_json(
        move || match check_for_student::<GradeRecord>(&store, &tenant.academy_id, &body)? {
            Checked::Valid(student, record) => {
                let mut created = store.insert_grades(&[(student.id.clone(), record)])?;
                let grade = created.pop().ok_or(WriteError::NothingWritten)?;
                Ok(GradeListItem { grade, student })
            }
            Checked::Invalid(errors) => Err(WriteError::Invalid(errors)),
            Checked::UnknownStudent => Err(WriteError::NotFound(STUDENT_NOT_FOUND)),
        },
        StatusCode::CREATED,
        "성적 등록에 실패했습니다",
    )
    .await
}
