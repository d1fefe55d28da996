use crate::config::JwtConfig;
use actix_web::cookie::{Cookie, SameSite};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

pub const ACCESS_TOKEN: &str = "access";
pub const REFRESH_TOKEN: &str = "refresh";
const REFRESH_COOKIE: &str = "refresh_token";

// JWT Claims 结构体；角色不放进令牌，每次由角色解析得出
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,        // Subject (user ID)
    pub token_type: String, // "access" 或 "refresh"
    pub exp: usize,
    pub iat: usize,
}

impl Claims {
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

pub struct JwtUtils;

impl JwtUtils {
    pub fn generate_access_token(
        config: &JwtConfig,
        user_id: i64,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        Self::generate_token_with_expiry(
            &config.secret,
            user_id,
            ACCESS_TOKEN,
            chrono::Duration::minutes(config.access_token_expiry),
        )
    }

    /// `remember_me` 时使用更长的刷新令牌有效期
    pub fn generate_token_pair(
        config: &JwtConfig,
        user_id: i64,
        remember_me: bool,
    ) -> Result<TokenPair, jsonwebtoken::errors::Error> {
        let refresh_days = if remember_me {
            config.refresh_token_remember_me_expiry
        } else {
            config.refresh_token_expiry
        };

        Ok(TokenPair {
            access_token: Self::generate_access_token(config, user_id)?,
            refresh_token: Self::generate_token_with_expiry(
                &config.secret,
                user_id,
                REFRESH_TOKEN,
                chrono::Duration::days(refresh_days),
            )?,
        })
    }

    pub fn generate_token_with_expiry(
        secret: &str,
        user_id: i64,
        token_type: &str,
        expiry_duration: chrono::Duration,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = chrono::Utc::now();
        let expiration = now + expiry_duration;

        let claims = Claims {
            sub: user_id.to_string(),
            token_type: token_type.to_string(),
            exp: expiration.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_ref()),
        )
    }

    /// 校验签名、过期时间与令牌类型
    pub fn verify_token_type(
        secret: &str,
        token: &str,
        expected_type: &str,
    ) -> Result<Claims, jsonwebtoken::errors::Error> {
        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_ref()),
            &Validation::default(),
        )?
        .claims;

        if claims.token_type != expected_type {
            return Err(jsonwebtoken::errors::Error::from(
                jsonwebtoken::errors::ErrorKind::InvalidToken,
            ));
        }
        Ok(claims)
    }

    pub fn verify_access_token(
        config: &JwtConfig,
        token: &str,
    ) -> Result<Claims, jsonwebtoken::errors::Error> {
        Self::verify_token_type(&config.secret, token, ACCESS_TOKEN)
    }

    /// 用刷新令牌换新的访问令牌
    pub fn refresh_access_token(
        config: &JwtConfig,
        refresh_token: &str,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = Self::verify_token_type(&config.secret, refresh_token, REFRESH_TOKEN)?;
        let user_id = claims
            .user_id()
            .ok_or(jsonwebtoken::errors::ErrorKind::InvalidToken)?;
        Self::generate_access_token(config, user_id)
    }

    pub fn create_refresh_token_cookie(
        refresh_token: &str,
        max_age_days: i64,
        secure: bool,
    ) -> Cookie<'static> {
        Cookie::build(REFRESH_COOKIE, refresh_token.to_string())
            .path("/")
            .max_age(actix_web::cookie::time::Duration::days(max_age_days))
            .same_site(SameSite::Strict)
            .http_only(true)
            .secure(secure)
            .finish()
    }

    /// 空 Cookie，用于注销
    pub fn create_empty_refresh_token_cookie(secure: bool) -> Cookie<'static> {
        Cookie::build(REFRESH_COOKIE, "")
            .path("/")
            .max_age(actix_web::cookie::time::Duration::seconds(0))
            .same_site(SameSite::Strict)
            .http_only(true)
            .secure(secure)
            .finish()
    }

    pub fn extract_refresh_token_from_cookie(req: &actix_web::HttpRequest) -> Option<String> {
        req.cookie(REFRESH_COOKIE)
            .map(|cookie| cookie.value().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> JwtConfig {
        JwtConfig {
            secret: "unit-test-secret".to_string(),
            access_token_expiry: 15,
            refresh_token_expiry: 7,
            refresh_token_remember_me_expiry: 30,
        }
    }

    #[test]
    fn test_access_token_roundtrip() {
        let config = config();
        let pair = JwtUtils::generate_token_pair(&config, 42, false).unwrap();
        let claims = JwtUtils::verify_access_token(&config, &pair.access_token).unwrap();
        assert_eq!(claims.user_id(), Some(42));
    }

    #[test]
    fn test_refresh_token_is_not_access_token() {
        let config = config();
        let pair = JwtUtils::generate_token_pair(&config, 42, true).unwrap();
        assert!(JwtUtils::verify_access_token(&config, &pair.refresh_token).is_err());

        let access = JwtUtils::refresh_access_token(&config, &pair.refresh_token).unwrap();
        assert!(JwtUtils::verify_access_token(&config, &access).is_ok());
        assert!(JwtUtils::refresh_access_token(&config, &access).is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let config = config();
        let token = JwtUtils::generate_access_token(&config, 1).unwrap();
        let other = JwtConfig {
            secret: "another".to_string(),
            ..config
        };
        assert!(JwtUtils::verify_access_token(&other, &token).is_err());
    }
}
