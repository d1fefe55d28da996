use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::header};
use std::path::Path;

use super::PhotoService;
use crate::errors::RecordsError;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::failure;

/// 按扩展名推断图片类型
fn content_type_for(key: &str) -> &'static str {
    match Path::new(key)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
    {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
}

pub async fn handle_download(
    service: &PhotoService,
    request: &HttpRequest,
    key: String,
) -> ActixResult<HttpResponse> {
    let objects = service.get_objects(request);

    match objects.download(&key).await {
        Ok(Some(bytes)) => Ok(HttpResponse::Ok()
            .insert_header((header::CONTENT_TYPE, content_type_for(&key)))
            .insert_header((header::CACHE_CONTROL, "public, max-age=86400, immutable"))
            .body(bytes)),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::FileNotFound,
            "Photo not found",
        ))),
        // 非法键视同不存在
        Err(RecordsError::Validation(_)) => Ok(HttpResponse::NotFound().json(
            ApiResponse::error_empty(ErrorCode::FileNotFound, "Photo not found"),
        )),
        Err(e) => Ok(failure("Download photo", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for("12-abc.png"), "image/png");
        assert_eq!(content_type_for("12-abc.jpeg"), "image/jpeg");
        assert_eq!(content_type_for("12-abc"), "application/octet-stream");
    }
}
