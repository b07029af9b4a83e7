use crate::ingest::pipeline::UploadOutcome;
use crate::ingest::UploadError;
use actix_web::HttpResponse;
use common::model::upload::{
    ErrorResponse, MissingStudentsResponse, ParseFailureResponse, PreviewResponse,
    UploadSuccessResponse,
};
use log::{error, warn};

pub const PARSE_FAILED: &str = "파일 파싱 중 오류가 발생했습니다";
pub const MISSING_STUDENTS: &str = "등록되지 않은 학생이 있습니다";
pub const AMBIGUOUS_STUDENTS: &str = "이름이 같은 학생이 여러 명 있습니다";
pub const UPLOAD_FAILED: &str = "업로드 처리 중 오류가 발생했습니다";
pub const INVALID_UPLOAD_TYPE: &str = "유효하지 않은 업로드 타입입니다";

pub fn outcome_response(outcome: UploadOutcome) -> HttpResponse {
    match outcome {
        UploadOutcome::Persisted(data) => HttpResponse::Ok().json(UploadSuccessResponse {
            success: true,
            data,
        }),
        UploadOutcome::Preview(data) => HttpResponse::Ok().json(PreviewResponse {
            success: false,
            preview: true,
            data,
        }),
    }
}

pub fn error_response(err: UploadError) -> HttpResponse {
    match err {
        UploadError::Structural(detail) => {
            warn!("Unreadable spreadsheet: {}", detail);
            HttpResponse::BadRequest().json(ParseFailureResponse {
                success: false,
                error: PARSE_FAILED.to_string(),
                parse_errors: Vec::new(),
            })
        }
        UploadError::RowErrors(parse_errors) => {
            HttpResponse::BadRequest().json(ParseFailureResponse {
                success: false,
                error: PARSE_FAILED.to_string(),
                parse_errors,
            })
        }
        UploadError::UnresolvedStudents { missing, ambiguous } => {
            let message = if missing.is_empty() {
                AMBIGUOUS_STUDENTS
            } else {
                MISSING_STUDENTS
            };
            HttpResponse::BadRequest().json(MissingStudentsResponse {
                success: false,
                error: message.to_string(),
                missing_students: missing,
                ambiguous_students: ambiguous,
            })
        }
        UploadError::Store(e) => {
            error!("Upload failed: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse::new(UPLOAD_FAILED))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::StoreError;
    use actix_web::body::to_bytes;
    use actix_web::http::StatusCode;
    use serde_json::{json, Value};

    async fn body_of(resp: HttpResponse) -> Value {
        let bytes = to_bytes(resp.into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[actix_web::test]
    async fn ambiguous_names_alone_get_their_own_message() {
        let resp = error_response(UploadError::UnresolvedStudents {
            missing: Vec::new(),
            ambiguous: vec!["김철수".to_string()],
        });
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_of(resp).await,
            json!({
                "success": false,
                "error": "이름이 같은 학생이 여러 명 있습니다",
                "missingStudents": [],
                "ambiguousStudents": ["김철수"],
            })
        );
    }

    #[actix_web::test]
    async fn missing_names_take_precedence_over_ambiguous_ones() {
        let resp = error_response(UploadError::UnresolvedStudents {
            missing: vec!["이영희".to_string()],
            ambiguous: vec!["김철수".to_string()],
        });
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = body_of(resp).await;
        assert_eq!(body["error"], json!("등록되지 않은 학생이 있습니다"));
        assert_eq!(body["missingStudents"], json!(["이영희"]));
        assert_eq!(body["ambiguousStudents"], json!(["김철수"]));
    }

    #[actix_web::test]
    async fn store_failures_are_internal_errors() {
        let resp = error_response(UploadError::Store(StoreError::Poisoned));
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_of(resp).await,
            json!({"success": false, "error": "업로드 처리 중 오류가 발생했습니다"})
        );
    }
}
