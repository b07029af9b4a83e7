use crate::services::{write_json, WriteError};
use crate::state::AppState;
use crate::tenant::TenantScope;
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use common::requests::GoalUpdate;
use log::info;

const GOAL_NOT_FOUND: &str = "목표를 찾을 수 없습니다";

fn check(update: &GoalUpdate) -> Result<(), WriteError> {
    match update.current_score {
        Some(score) if !(0.0..=100.0).contains(&score) => Err(WriteError::Invalid(vec![
            "현재점수는 0~100 사이의 숫자여야 합니다".to_string(),
        ])),
        _ => Ok(()),
    }
}

pub async fn process(
    goal_id: web::Path<String>,
    tenant: TenantScope,
    body: web::Json<GoalUpdate>,
    state: web::Data<AppState>,
) -> HttpResponse {
    if let Err(e) = tenant.require_staff() {
        return e.error_response();
    }
    let store = state.store.clone();
    let goal_id = goal_id.into_inner();
    let update = body.into_inner();
    write_json(
        move || {
            check(&update)?;
            let updated = store
                .update_goal(&tenant.academy_id, &goal_id, &update)?
                .ok_or(WriteError::NotFound(GOAL_NOT_FOUND))?;
            info!("Goal {} is now {}", goal_id, updated.goal.status.as_str());
            Ok(updated)
        },
        StatusCode::OK,
        "목표 수정에 실패했습니다",
    )
    .await
}
