use actix_web::HttpResponse;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::errors::RecordsError;
use crate::models::ErrorCode;

// 统一的API响应结构
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "api.ts")]
pub struct ApiResponse<T: TS> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl<T: TS> ApiResponse<T> {
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success as i32,
            message: message.into(),
            data: Some(data),
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn error(code: ErrorCode, data: T, message: impl Into<String>) -> Self {
        Self {
            code: code as i32,
            message: message.into(),
            data: Some(data),
            timestamp: chrono::Utc::now(),
        }
    }
}

impl ApiResponse<()> {
    pub fn success_empty(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success as i32,
            message: message.into(),
            data: None,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn error_empty(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code as i32,
            message: message.into(),
            data: None,
            timestamp: chrono::Utc::now(),
        }
    }
}

/// 将业务错误映射为 HTTP 响应（状态码 + 统一响应体）
pub fn error_response(err: &RecordsError) -> HttpResponse {
    HttpResponse::build(err.status_code())
        .json(ApiResponse::error_empty(ErrorCode::from(err), err.message()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_success_envelope() {
        let resp = ApiResponse::success(3_i64, "ok");
        assert_eq!(resp.code, 0);
        assert_eq!(resp.data, Some(3));
    }

    #[test]
    fn test_error_response_status() {
        let resp = error_response(&RecordsError::not_found("Subject not found"));
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = error_response(&RecordsError::conflict("Student profile already exists"));
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }
}
