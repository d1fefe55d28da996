pub mod attendance;
pub mod auth;
pub mod grades;
pub mod photos;
pub mod records;
pub mod students;
pub mod subjects;
pub mod system;

pub use auth::AuthService;
pub use grades::GradeService;
pub use photos::PhotoService;
pub use records::RecordsFacade;
pub use students::StudentService;
pub use subjects::SubjectService;
pub use system::SystemService;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use actix_web::{HttpRequest, HttpResponse};
use tracing::error;

use crate::errors::{RecordsError, Result};
use crate::middlewares::RequireJWT;
use crate::models::auth::CurrentUser;
use crate::models::{ApiResponse, ErrorCode, error_response};
use crate::storage::{ObjectStore, Storage};

/// 为一次引擎调用加上截止时间，超时按持久化错误上报
pub async fn bounded<T, F>(deadline: Duration, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(deadline, fut).await {
        Ok(result) => result,
        Err(_) => Err(RecordsError::persistence(format!(
            "Operation timed out after {} seconds",
            deadline.as_secs()
        ))),
    }
}

/// 由请求上下文中的存储与对象存储构造门面
pub(crate) fn records_facade(request: &HttpRequest) -> RecordsFacade {
    let storage = request
        .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
        .expect("Storage not found in app data")
        .get_ref()
        .clone();
    let objects = request
        .app_data::<actix_web::web::Data<Arc<dyn ObjectStore>>>()
        .expect("Object store not found in app data")
        .get_ref()
        .clone();
    RecordsFacade::new(storage, objects)
}

/// 取出 RequireJWT 写入的调用者；缺失时返回 401 响应
pub(crate) fn current_user(request: &HttpRequest) -> std::result::Result<CurrentUser, HttpResponse> {
    RequireJWT::extract_current_user(request).ok_or_else(|| {
        HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        ))
    })
}

/// 记录服务端错误并转换为统一响应
pub(crate) fn failure(context: &str, err: RecordsError) -> HttpResponse {
    if err.status_code().is_server_error() {
        error!("{} failed: {}", context, err);
    }
    error_response(&err)
}
