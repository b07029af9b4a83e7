use crate::services::query_json;
use crate::state::AppState;
use crate::tenant::TenantScope;
use actix_web::{web, HttpResponse};
use common::requests::GoalFilter;

pub async fn process(
    tenant: TenantScope,
    filter: web::Query<GoalFilter>,
    state: web::Data<AppState>,
) -> HttpResponse {
    let store = state.store.clone();
    let filter = filter.into_inner();
    query_json(
        move || store.list_goals(&tenant.academy_id, &filter),
        "목표 목록을 불러오는데 실패했습니다",
    )
    .await
}
