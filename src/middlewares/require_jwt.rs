/*!
 * JWT 认证中间件
 *
 * 校验 `Authorization: Bearer <token>`，解析调用者角色后把 [`CurrentUser`]
 * 写入请求扩展，供后续处理程序与 [`RequireRole`](super::RequireRole) 使用。
 *
 * ## 使用方法
 *
 * ```rust,ignore
 * use actix_web::{web, HttpRequest, HttpResponse, Result};
 * use crate::middlewares::RequireJWT;
 *
 * async fn protected_handler(req: HttpRequest) -> Result<HttpResponse> {
 *     match RequireJWT::extract_current_user(&req) {
 *         Some(user) => Ok(HttpResponse::Ok().json(format!("user {} ({})", user.id, user.role))),
 *         None => Ok(HttpResponse::Unauthorized().finish()),
 *     }
 * }
 *
 * web::scope("/api").wrap(RequireJWT).route("/protected", web::get().to(protected_handler));
 * ```
 *
 * ## 认证流程
 *
 * 1. 校验访问令牌的签名、过期时间与类型
 * 2. 命中会话缓存 `user:{token}` 时直接使用缓存的调用者
 * 3. 否则经角色解析器读取账号角色（读取失败退化为学生），
 *    只有从账号资料解析出的角色才写入缓存
 * 4. 令牌缺失或无效时返回 401
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpRequest,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    http::header::{AUTHORIZATION, HeaderMap},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, info};

use super::create_error_response;
use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::models::ErrorCode;
use crate::models::auth::CurrentUser;
use crate::services::auth::role::resolve_role_detailed;
use crate::storage::Storage;
use crate::utils::jwt::JwtUtils;

const BEARER_PREFIX: &str = "Bearer ";

#[derive(Clone)]
pub struct RequireJWT;

/// 从请求头取出 Bearer 令牌
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// 会话缓存键
pub fn session_cache_key(token: &str) -> String {
    format!("user:{token}")
}

/// 校验令牌并解析调用者
pub async fn authenticate(
    token: &str,
    storage: &dyn Storage,
    cache: &dyn ObjectCache,
) -> Result<CurrentUser, String> {
    let config = AppConfig::get();
    let claims = JwtUtils::verify_access_token(&config.jwt, token).map_err(|err| {
        info!("JWT token validation failed: {}", err);
        "Invalid JWT token".to_string()
    })?;
    let user_id = claims
        .user_id()
        .ok_or_else(|| "Invalid user ID in JWT".to_string())?;

    let key = session_cache_key(token);
    match cache.get_raw(&key).await {
        CacheResult::Found(json) => match serde_json::from_str::<CurrentUser>(&json) {
            Ok(user) if user.id == user_id => return Ok(user),
            _ => {
                info!("Discarding unusable cached session for user {}", user_id);
                cache.remove(&key).await;
            }
        },
        _ => debug!("Session cache miss for user {}", user_id),
    }

    let resolved =
        resolve_role_detailed(storage, user_id, config.operation_deadline()).await;
    let user = CurrentUser {
        id: user_id,
        role: resolved.role,
    };

    if resolved.from_profile
        && let Ok(json) = serde_json::to_string(&user)
    {
        cache.insert_raw(key, json, config.cache.default_ttl).await;
    }
    Ok(user)
}

impl<S, B> Transform<S, ServiceRequest> for RequireJWT
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireJWTMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireJWTMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireJWTMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireJWTMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        Box::pin(async move {
            // 预检请求直接放行
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(req.into_response(
                    create_error_response(StatusCode::NO_CONTENT, ErrorCode::Success, "")
                        .map_into_right_body(),
                ));
            }

            let Some(token) = bearer_token(req.headers()).map(str::to_string) else {
                info!("Missing bearer token for request to {}", req.path());
                return Ok(req.into_response(
                    create_error_response(
                        StatusCode::UNAUTHORIZED,
                        ErrorCode::Unauthorized,
                        "Unauthorized: Missing or invalid Authorization header",
                    )
                    .map_into_right_body(),
                ));
            };

            let storage = req
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone();
            let cache = req
                .app_data::<actix_web::web::Data<Arc<dyn ObjectCache>>>()
                .expect("Cache not found in app data")
                .get_ref()
                .clone();

            match authenticate(&token, storage.as_ref(), cache.as_ref()).await {
                Ok(user) => {
                    debug!("JWT authentication successful for ID: {}", user.id);
                    req.extensions_mut().insert(user);
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Err(err) => {
                    info!(
                        "JWT authentication failed for request to {}: {}",
                        req.path(),
                        err
                    );
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            ErrorCode::Unauthorized,
                            &format!("Unauthorized: {err}"),
                        )
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

impl RequireJWT {
    /// 从请求扩展中取出调用者，需在 RequireJWT 保护的路由中使用
    pub fn extract_current_user(req: &HttpRequest) -> Option<CurrentUser> {
        req.extensions().get::<CurrentUser>().copied()
    }

    pub fn extract_user_id(req: &HttpRequest) -> Option<i64> {
        Self::extract_current_user(req).map(|user| user.id)
    }
}
