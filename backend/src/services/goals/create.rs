use crate::db::AcademyStore;
use crate::ingest::single::{check_for_student, Checked};
use crate::services::{write_json, WriteError, STUDENT_NOT_FOUND};
use crate::state::AppState;
use crate::tenant::TenantScope;
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use common::model::goal::{GoalListItem, GoalRecord};
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
        move || match check_for_student::<GoalRecord>(&store, &tenant.academy_id, &body)? {
            Checked::Valid(student, record) => {
                let mut created = store.insert_goals(&[(student.id.clone(), record)])?;
                let goal = created.pop().ok_or(WriteError::NothingWritten)?;
                Ok(GoalListItem { goal, student })
            }
            Checked::Invalid(errors) => Err(WriteError::Invalid(errors)),
            Checked::UnknownStudent => Err(WriteError::NotFound(STUDENT_NOT_FOUND)),
        },
        StatusCode::CREATED,
        "목표 생성에 실패했습니다",
    )
    .await
}
