use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::middlewares::require_jwt::{bearer_token, session_cache_key};
use crate::models::ApiResponse;
use crate::models::auth::{SessionEvent, SessionState};
use crate::services::current_user;
use crate::utils::jwt::JwtUtils;

use super::AuthService;

/// 处理用户登出
///
/// 清除刷新令牌 Cookie（max_age=0），并从会话缓存中移除当前访问令牌。
pub async fn handle_logout(
    service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let caller = match current_user(request) {
        Ok(caller) => caller,
        Err(resp) => return Ok(resp),
    };

    if let Some(token) = bearer_token(request.headers()) {
        service
            .get_cache(request)
            .remove(&session_cache_key(token))
            .await;
    }

    let from = SessionState::Unauthenticated
        .apply(SessionEvent::SignedIn)
        .apply(SessionEvent::RoleResolved(caller.role));
    service.get_sessions(request).signed_out(caller.id, from);
    tracing::info!("User {} logged out", caller.id);

    let empty_cookie =
        JwtUtils::create_empty_refresh_token_cookie(service.get_config().is_production());
    Ok(HttpResponse::Ok()
        .cookie(empty_cookie)
        .json(ApiResponse::<()>::success_empty("Logout successful")))
}
