use crate::services::query_json;
use crate::state::AppState;
use crate::tenant::TenantScope;
use actix_web::{web, HttpResponse};

pub async fn process(tenant: TenantScope, state: web::Data<AppState>) -> HttpResponse {
    let store = state.store.clone();
    query_json(
        move || store.dashboard(&tenant.academy_id),
        "데이터를 불러오는데 실패했습니다",
    )
    .await
}
