use crate::services::query_json;
use crate::state::AppState;
use crate::tenant::TenantScope;
use actix_web::{web, HttpResponse};
use common::requests::StudentFilter;

pub async fn process(
    tenant: TenantScope,
    filter: web::Query<StudentFilter>,
    state: web::Data<AppState>,
) -> HttpResponse {
    let store = state.store.clone();
    let filter = filter.into_inner();
    query_json(
        move || store.list_students(&tenant.academy_id, &filter),
        "학생 목록을 불러오는데 실패했습니다",
    )
    .await
}

#[cfg(test)]
mod tests {
    use crate::services;
    use crate::test_support::{seed_students, test_state};
    use crate::tenant::{ACADEMY_HEADER, ROLE_HEADER};
    use actix_web::http::StatusCode;
    use actix_web::{test, web, App};
    use serde_json::{json, Value};

    #[actix_web::test]
    async fn lists_only_the_callers_academy() {
        let state = test_state();
        seed_students(&state.store, "a1", &["김철수", "이영희"]);
        seed_students(&state.store, "a2", &["박민수"]);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(services::configure),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/students?search=%EC%9D%B4")
            .insert_header((ACADEMY_HEADER, "a1"))
            .insert_header((ROLE_HEADER, "PARENT"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        let names: Vec<&Value> = body
            .as_array()
            .map(|rows| rows.iter().map(|r| &r["name"]).collect())
            .unwrap_or_default();
        assert_eq!(names, vec![&json!("이영희")]);
        assert_eq!(body[0]["gradeCount"], json!(0));
    }

    #[actix_web::test]
    async fn missing_tenant_headers_are_unauthorized() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_state()))
                .configure(services::configure),
        )
        .await;
        let resp =
            test::call_service(&app, test::TestRequest::get().uri("/api/students").to_request()).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], json!("인증이 필요합니다"));
    }

    #[actix_web::test]
    async fn empty_filters_do_not_filter() {
        let state = test_state();
        seed_students(&state.store, "a1", &["김철수", "이영희"]);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(services::configure),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/students?search=&grade=")
            .insert_header((ACADEMY_HEADER, "a1"))
            .insert_header((ROLE_HEADER, "ADMIN"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body.as_array().map(Vec::len), Some(2));

        let req = test::TestRequest::get()
            .uri("/api/students?grade=three")
            .insert_header((ACADEMY_HEADER, "a1"))
            .insert_header((ROLE_HEADER, "ADMIN"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({"success": false, "error": "잘못된 요청입니다"}));
    }
}
