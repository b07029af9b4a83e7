use crate::services::query_json;
use crate::state::AppState;
use crate::tenant::TenantScope;
use actix_web::{web, HttpResponse};
use common::requests::GradeFilter;

pub async fn process(
    tenant: TenantScope,
    filter: web::Query<GradeFilter>,
    state: web::Data<AppState>,
) -> HttpResponse {
    let store = state.store.clone();
    let filter = filter.into_inner();
    query_json(
        move || store.list_grades(&tenant.academy_id, &filter),
        "성적 목록을 불러오는데 실패했습니다",
    )
    .await
}

#[cfg(test)]
mod tests {
    use crate::db::AcademyStore;
    use crate::services;
    use crate::test_support::{seed_students, test_state};
    use crate::tenant::{ACADEMY_HEADER, ROLE_HEADER};
    use actix_web::{test, web, App};
    use common::model::grade::{ExamType, GradeRecord};
    use serde_json::{json, Value};

    #[actix_web::test]
    async fn empty_student_and_subject_filters_list_everything() {
        let state = test_state();
        let students = seed_students(&state.store, "a1", &["김철수", "이영희"]);
        let rows: Vec<(String, GradeRecord)> = students
            .iter()
            .map(|student| {
                (
                    student.id.clone(),
                    GradeRecord {
                        student_name: student.name.clone(),
                        subject: "수학".to_string(),
                        semester: "2025-1학기".to_string(),
                        exam_type: ExamType::Midterm,
                        score: 80.0,
                        exam_date: "2025-05-15".to_string(),
                    },
                )
            })
            .collect();
        state.store.insert_grades(&rows).unwrap();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(services::configure),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/grades?studentId=&subject=")
            .insert_header((ACADEMY_HEADER, "a1"))
            .insert_header((ROLE_HEADER, "TEACHER"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.as_array().map(Vec::len), Some(2));

        let req = test::TestRequest::get()
            .uri(&format!("/api/grades?studentId={}&subject=", students[1].id))
            .insert_header((ACADEMY_HEADER, "a1"))
            .insert_header((ROLE_HEADER, "TEACHER"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.as_array().map(Vec::len), Some(1));
        assert_eq!(body[0]["student"]["name"], json!("이영희"));
    }
}
