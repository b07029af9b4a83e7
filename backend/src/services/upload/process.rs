use super::respond::{error_response, outcome_response, INVALID_UPLOAD_TYPE, UPLOAD_FAILED};
use crate::ingest::pipeline::run_upload;
use crate::ingest::UploadedFile;
use crate::state::AppState;
use crate::tenant::TenantScope;
use actix_multipart::{Multipart, MultipartError};
use actix_web::{web, HttpResponse, ResponseError};
use common::model::record_type::RecordType;
use common::model::upload::ErrorResponse;
use futures_util::StreamExt;
use log::{error, info, warn};
use md5::Context;

/// Reads the `file` part of the form. Other parts are drained and ignored.
async fn read_file_field(mut payload: Multipart) -> Result<Option<UploadedFile>, MultipartError> {
    while let Some(item) = payload.next().await {
        let mut field = item?;
        let name = field
            .content_disposition()
            .and_then(|cd| cd.get_name().map(|n| n.to_string()));

        if name.as_deref() != Some("file") {
            while let Some(chunk) = field.next().await {
                chunk?;
            }
            continue;
        }

        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename().map(|f| f.to_string()))
            .unwrap_or_default();
        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            bytes.extend_from_slice(&chunk?);
        }
        return Ok(Some(UploadedFile::new(file_name, bytes)));
    }
    Ok(None)
}

pub(crate) async fn process(
    record_type: web::Path<String>,
    tenant: TenantScope,
    state: web::Data<AppState>,
    payload: Multipart,
) -> HttpResponse {
    let record_type = match record_type.parse::<RecordType>() {
        Ok(record_type) => record_type,
        Err(e) => {
            warn!("Rejected upload: {}", e);
            return HttpResponse::NotFound().json(ErrorResponse::new(INVALID_UPLOAD_TYPE));
        }
    };
    if let Err(e) = tenant.require_staff() {
        return e.error_response();
    }

    let file = match read_file_field(payload).await {
        Ok(Some(file)) => file,
        Ok(None) => return HttpResponse::BadRequest().json(ErrorResponse::new("파일이 없습니다")),
        Err(e) => {
            return HttpResponse::BadRequest()
                .json(ErrorResponse::new(format!("잘못된 업로드 요청입니다: {}", e)))
        }
    };

    let mut digest = Context::new();
    digest.consume(&file.bytes);
    info!(
        "Received {} upload '{}' for academy {} ({} bytes, md5 {:x})",
        record_type,
        file.file_name,
        tenant.academy_id,
        file.bytes.len(),
        digest.finalize()
    );

    let store = state.store.clone();
    let policy = state.duplicate_names;
    let handle = tokio::task::spawn_blocking(move || {
        run_upload(&store, &tenant, record_type, &file, policy)
    });

    match handle.await {
        Ok(Ok(outcome)) => outcome_response(outcome),
        Ok(Err(e)) => error_response(e),
        Err(join_err) => {
            error!("Upload task failed: {}", join_err);
            HttpResponse::InternalServerError().json(ErrorResponse::new(UPLOAD_FAILED))
        }
    }
}
