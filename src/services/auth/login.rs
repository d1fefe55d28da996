use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::{ApiResponse, ErrorCode, auth::LoginRequest};
use crate::services::{bounded, failure};
use crate::utils::password::verify_password;

use super::{AuthService, resolve_role};

const INVALID_CREDENTIALS: &str = "Invalid login credentials";

pub async fn handle_login(
    service: &AuthService,
    login_request: LoginRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let deadline = service.get_config().operation_deadline();
    let email = login_request.email.trim().to_lowercase();

    // 1. 按邮箱查找账号
    let user = match bounded(deadline, storage.get_user_by_email(&email)).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::AuthFailed,
                INVALID_CREDENTIALS,
            )));
        }
        Err(e) => return Ok(failure("Login", e)),
    };

    // 2. 验证密码
    if !verify_password(&login_request.password, &user.password_hash) {
        tracing::info!("Failed login attempt for user {}", user.id);
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::AuthFailed,
            INVALID_CREDENTIALS,
        )));
    }

    // 3. 解析角色，失败时退化为学生
    let role = resolve_role(storage.as_ref(), user.id, deadline).await;
    let user_id = user.id;

    // 4. 签发令牌
    match service.issue_session(user, role, login_request.remember_me) {
        Ok((response, refresh_cookie)) => {
            service.get_sessions(request).signed_in(user_id, role);
            tracing::info!("User {} logged in as {}", user_id, role);
            Ok(HttpResponse::Ok()
                .cookie(refresh_cookie)
                .json(ApiResponse::success(response, "Login successful")))
        }
        Err(e) => Ok(failure("Login", e)),
    }
}
