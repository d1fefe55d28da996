use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use futures_util::TryStreamExt;
use futures_util::stream::StreamExt;
use std::path::Path;

use super::StudentService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::records::PhotoUpload;
use crate::services::{bounded, current_user, failure};

fn bad_request(code: ErrorCode, message: &str) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(code, message))
}

pub async fn handle_upload_photo(
    service: &StudentService,
    request: &HttpRequest,
    student_id: i64,
    mut payload: Multipart,
) -> ActixResult<HttpResponse> {
    let caller = match current_user(request) {
        Ok(caller) => caller,
        Err(resp) => return Ok(resp),
    };
    let policy = &service.get_config().upload;

    let mut upload: Option<PhotoUpload> = None;
    while let Ok(Some(mut field)) = payload.try_next().await {
        let content_disposition = field.content_disposition();
        let name = content_disposition
            .and_then(|cd| cd.get_name())
            .unwrap_or_default()
            .to_string();
        if name != "file" {
            continue;
        }
        if upload.is_some() {
            return Ok(bad_request(
                ErrorCode::MultifileUploadNotAllowed,
                "Only one file can be uploaded at a time",
            ));
        }

        let extension = content_disposition
            .and_then(|cd| cd.get_filename())
            .and_then(|filename| {
                Path::new(filename)
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| ext.to_lowercase())
            })
            .unwrap_or_default();
        if !policy.allowed_extensions.iter().any(|t| *t == extension) {
            return Ok(bad_request(
                ErrorCode::FileTypeNotAllowed,
                "File type not allowed",
            ));
        }

        // 边读边校验大小，超限立即中止
        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let data = chunk?;
            if bytes.len() + data.len() > policy.max_size {
                return Ok(bad_request(
                    ErrorCode::FileSizeExceeded,
                    "File size exceeds the limit",
                ));
            }
            bytes.extend_from_slice(&data);
        }
        upload = Some(PhotoUpload { extension, bytes });
    }

    let Some(upload) = upload else {
        return Ok(bad_request(
            ErrorCode::FileNotFound,
            "No file found in upload payload",
        ));
    };

    let facade = service.get_facade(request);
    match bounded(
        service.deadline(),
        facade.update_photo(&caller, student_id, upload, policy),
    )
    .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Photo uploaded successfully",
        ))),
        Err(e) => Ok(failure("Upload photo", e)),
    }
}
