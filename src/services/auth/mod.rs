pub mod login;
pub mod logout;
pub mod register;
pub mod role;
pub mod session;
pub mod token;

pub use role::resolve_role;
pub use session::SessionHub;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, cookie::Cookie};
use std::sync::Arc;

use crate::cache::ObjectCache;
use crate::config::AppConfig;
use crate::errors::{RecordsError, Result};
use crate::models::auth::LoginResponse;
use crate::models::users::entities::{User, UserRole};
use crate::storage::Storage;
use crate::utils::jwt::JwtUtils;

pub struct AuthService {
    storage: Option<Arc<dyn Storage>>,
}

impl AuthService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub(crate) fn get_cache(&self, request: &HttpRequest) -> Arc<dyn ObjectCache> {
        request
            .app_data::<actix_web::web::Data<Arc<dyn ObjectCache>>>()
            .expect("Cache not found in app data")
            .get_ref()
            .clone()
    }

    pub(crate) fn get_sessions(&self, request: &HttpRequest) -> SessionHub {
        request
            .app_data::<actix_web::web::Data<SessionHub>>()
            .expect("Session hub not found in app data")
            .get_ref()
            .clone()
    }

    pub(crate) fn get_config(&self) -> &AppConfig {
        AppConfig::get()
    }

    /// 为已认证账号签发令牌对，返回登录响应与刷新令牌 Cookie
    pub(crate) fn issue_session(
        &self,
        user: User,
        role: UserRole,
        remember_me: bool,
    ) -> Result<(LoginResponse, Cookie<'static>)> {
        let config = self.get_config();
        let pair = JwtUtils::generate_token_pair(&config.jwt, user.id, remember_me)
            .map_err(|e| RecordsError::authentication(format!("Unable to generate token: {e}")))?;

        let max_age_days = if remember_me {
            config.jwt.refresh_token_remember_me_expiry
        } else {
            config.jwt.refresh_token_expiry
        };
        let cookie = JwtUtils::create_refresh_token_cookie(
            &pair.refresh_token,
            max_age_days,
            config.is_production(),
        );

        let response = LoginResponse {
            access_token: pair.access_token,
            expires_in: config.jwt.access_token_expiry * 60, // 转换为秒
            user,
            role,
            created_at: chrono::Utc::now(),
        };
        Ok((response, cookie))
    }

    // 登录
    pub async fn login(
        &self,
        login_request: crate::models::auth::requests::LoginRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        login::handle_login(self, login_request, request).await
    }

    // 注册
    pub async fn register(
        &self,
        register_request: crate::models::auth::requests::RegisterRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        register::handle_register(self, register_request, request).await
    }

    // 刷新令牌
    pub async fn refresh_token(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        token::handle_refresh_token(self, request).await
    }

    // 当前账号与生效角色
    pub async fn get_user(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        token::handle_get_user(self, request).await
    }

    // 当前请求的会话状态
    pub async fn session(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        token::handle_session(self, request).await
    }

    // 登出
    pub async fn logout(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        logout::handle_logout(self, request).await
    }
}
