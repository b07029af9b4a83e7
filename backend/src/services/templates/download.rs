//! # Template Download
//!
//! `GET /api/templates/{record_type}` builds the example workbook on the fly
//! and returns it as an attachment. The Korean file name is percent-encoded
//! in `Content-Disposition` with the same reserved set browsers use for
//! `encodeURIComponent`.

use super::sheet::{build_template, file_name};
use actix_web::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use actix_web::{web, HttpResponse};
use common::model::record_type::RecordType;
use common::model::upload::ErrorResponse;
use log::{error, info};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Characters left untouched by `encodeURIComponent`.
const FILE_NAME_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

fn attachment(name: &str) -> String {
    format!(
        "attachment; filename=\"{}\"",
        utf8_percent_encode(name, FILE_NAME_SET)
    )
}

pub async fn process(record_type: web::Path<String>) -> HttpResponse {
    let Ok(record_type) = record_type.parse::<RecordType>() else {
        return HttpResponse::BadRequest()
            .json(ErrorResponse::new("유효하지 않은 템플릿 타입입니다"));
    };

    match build_template(record_type) {
        Ok(bytes) => {
            info!("Serving {} template ({} bytes)", record_type, bytes.len());
            HttpResponse::Ok()
                .insert_header((CONTENT_TYPE, XLSX_CONTENT_TYPE))
                .insert_header((CONTENT_DISPOSITION, attachment(file_name(record_type))))
                .body(bytes)
        }
        Err(e) => {
            error!("Template generation failed: {}", e);
            HttpResponse::InternalServerError()
                .json(ErrorResponse::new("템플릿 다운로드 중 오류가 발생했습니다"))
        }
    }
}
