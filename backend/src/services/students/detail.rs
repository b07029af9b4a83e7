use crate::services::{write_json, WriteError, STUDENT_NOT_FOUND};
use crate::state::AppState;
use crate::tenant::TenantScope;
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};

pub async fn process(
    student_id: web::Path<String>,
    tenant: TenantScope,
    state: web::Data<AppState>,
) -> HttpResponse {
    let store = state.store.clone();
    let student_id = student_id.into_inner();
    write_json(
        move || {
            store
                .student_detail(&tenant.academy_id, &student_id)?
                .ok_or(WriteError::NotFound(STUDENT_NOT_FOUND))
        },
        StatusCode::OK,
        "학생 정보를 불러오는데 실패했습니다",
    )
    .await
}
