use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::middlewares::require_jwt::{authenticate, bearer_token};
use crate::models::auth::{
    RefreshTokenResponse, SessionEvent, SessionResponse, SessionState, UserInfoResponse,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bounded, current_user, failure};
use crate::utils::jwt;

use super::AuthService;

pub async fn handle_refresh_token(
    service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let config = service.get_config();
    // 从 cookie 中提取 refresh token
    match jwt::JwtUtils::extract_refresh_token_from_cookie(request) {
        Some(refresh_token) => {
            match jwt::JwtUtils::refresh_access_token(&config.jwt, &refresh_token) {
                Ok(new_access_token) => {
                    let response = RefreshTokenResponse {
                        access_token: new_access_token,
                        expires_in: config.jwt.access_token_expiry * 60,
                    };
                    Ok(HttpResponse::Ok().json(ApiResponse::success(
                        response,
                        "Token refreshed successfully",
                    )))
                }
                Err(e) => {
                    tracing::info!("Refresh token rejected: {}", e);

                    // 清除无效的 refresh token cookie
                    let empty_cookie =
                        jwt::JwtUtils::create_empty_refresh_token_cookie(config.is_production());

                    Ok(HttpResponse::Unauthorized().cookie(empty_cookie).json(
                        ApiResponse::error_empty(
                            ErrorCode::Unauthorized,
                            "Login expired or invalid, please login again",
                        ),
                    ))
                }
            }
        }
        None => Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        ))),
    }
}

pub async fn handle_get_user(
    service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let caller = match current_user(request) {
        Ok(caller) => caller,
        Err(resp) => return Ok(resp),
    };

    let storage = service.get_storage(request);
    let deadline = service.get_config().operation_deadline();
    match bounded(deadline, storage.get_user_by_id(caller.id)).await {
        Ok(Some(user)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            UserInfoResponse {
                user,
                role: caller.role,
            },
            "User information retrieved successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "User not found",
        ))),
        Err(e) => Ok(failure("Get user", e)),
    }
}

/// 会话状态；令牌缺失或无效时为 Unauthenticated
pub async fn handle_session(
    service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let unauthenticated = SessionResponse {
        state: SessionState::Unauthenticated,
        user_id: None,
    };

    let Some(token) = bearer_token(request.headers()) else {
        return Ok(HttpResponse::Ok().json(ApiResponse::success(unauthenticated, "No session")));
    };

    let storage = service.get_storage(request);
    let cache = service.get_cache(request);
    match authenticate(token, storage.as_ref(), cache.as_ref()).await {
        Ok(user) => {
            let state = SessionState::Unauthenticated
                .apply(SessionEvent::SignedIn)
                .apply(SessionEvent::RoleResolved(user.role));
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                SessionResponse {
                    state,
                    user_id: Some(user.id),
                },
                "Session active",
            )))
        }
        Err(_) => Ok(HttpResponse::Ok().json(ApiResponse::success(unauthenticated, "No session"))),
    }
}
