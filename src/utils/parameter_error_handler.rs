//! 请求参数解析失败时的统一响应

use actix_web::{
    HttpRequest, HttpResponse,
    error::{InternalError, JsonPayloadError, PathError, QueryPayloadError},
};

use crate::models::{ErrorCode, common::ApiResponse};

fn bad_request(message: String) -> actix_web::Error {
    let response =
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, &message));
    InternalError::from_response(message, response).into()
}

pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    tracing::debug!("Invalid JSON payload: {}", err);
    bad_request(format!("Invalid JSON payload: {err}"))
}

pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    tracing::debug!("Invalid query parameters: {}", err);
    bad_request(format!("Invalid query parameters: {err}"))
}

pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    tracing::debug!("Invalid path parameters: {}", err);
    bad_request(format!("Invalid path parameters: {err}"))
}
