//! 数据模型
//!
//! 业务实体、HTTP 请求/响应结构以及统一的 [`ErrorCode`]。

pub mod attendance;
pub mod auth;
pub mod common;
pub mod grades;
pub mod records;
pub mod students;
pub mod subjects;
pub mod system;
pub mod users;

pub use common::{ApiResponse, error_response};

use serde::Serialize;

use crate::errors::RecordsError;

/// 接口业务码，随 [`common::ApiResponse`] 一起返回
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用
    BadRequest = 1000,
    ValidationFailed = 1001,
    RateLimitExceeded = 1029,

    // 认证
    Unauthorized = 2000,
    AuthFailed = 2001,
    Forbidden = 2003,
    RegisterFailed = 2010,
    UserNameInvalid = 2011,
    UserEmailInvalid = 2012,
    UserPasswordInvalid = 2013,
    UserAlreadyExists = 2014,

    // 资源
    NotFound = 3000,
    FileNotFound = 3003,
    Conflict = 3009,

    // 文件
    FileTypeNotAllowed = 4000,
    FileSizeExceeded = 4001,
    FileUploadFailed = 4002,
    MultifileUploadNotAllowed = 4003,

    // 服务端
    InternalServerError = 5000,
    PersistenceFailed = 5001,
}

impl From<&RecordsError> for ErrorCode {
    fn from(err: &RecordsError) -> Self {
        match err {
            RecordsError::Validation(_) | RecordsError::DateParse(_) => ErrorCode::ValidationFailed,
            RecordsError::Authentication(_) => ErrorCode::AuthFailed,
            RecordsError::Authorization(_) => ErrorCode::Forbidden,
            RecordsError::NotFound(_) => ErrorCode::NotFound,
            RecordsError::Conflict(_) => ErrorCode::Conflict,
            RecordsError::Persistence(_) => ErrorCode::PersistenceFailed,
            RecordsError::ObjectStore(_) => ErrorCode::FileUploadFailed,
            _ => ErrorCode::InternalServerError,
        }
    }
}

/// 进程启动时间，用于健康检查中的 uptime
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}
