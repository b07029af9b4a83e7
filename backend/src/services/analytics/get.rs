use crate::services::query_json;
use crate::state::AppState;
use crate::tenant::TenantScope;
use actix_web::{web, HttpResponse};
use chrono::{Months, NaiveDate, Utc};

const TREND_MONTHS: u32 = 6;

fn trends_since(today: NaiveDate) -> NaiveDate {
    today.checked_sub_months(Months::new(TREND_MONTHS)).unwrap_or(NaiveDate::MIN)
}

pub async fn process(tenant: TenantScope, state: web::Data<AppState>) -> HttpResponse {
    let store = state.store.clone();
    let since = trends_since(Utc::now().date_naive());
    query_json(
        move || store.analytics(&tenant.academy_id, since),
        "분석 데이터를 불러오는데 실패했습니다",
    )
    .await
}
