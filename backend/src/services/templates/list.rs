use super::sheet::all_template_info;
use actix_web::HttpResponse;

/// `GET /api/templates`
pub async fn process() -> HttpResponse {
    HttpResponse::Ok().json(all_template_info())
}

#[cfg(test)]
mod tests {
    use actix_web::{test, App};
    use serde_json::{json, Value};

    #[actix_web::test]
    async fn lists_all_three_templates() {
        let app = test::init_service(App::new().service(super::super::configure_routes())).await;
        let resp = test::call_service(&app, test::TestRequest::get().uri("/api/templates").to_request()).await;
        assert!(resp.status().is_success());

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(
            body[0],
            json!({
                "type": "students",
                "name": "학생 정보",
                "description": "학생의 기본 정보를 입력하는 템플릿입니다. 이름과 학년은 필수 항목입니다.",
                "fileName": "학생정보_템플릿.xlsx"
            })
        );
        assert_eq!(body[1]["type"], json!("grades"));
        assert_eq!(body[2]["type"], json!("goals"));
    }
}
