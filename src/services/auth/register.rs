use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::errors::RecordsError;
use crate::models::students::requests::RegisterStudentProfileRequest;
use crate::models::users::{entities::UserRole, requests::CreateUserRequest};
use crate::models::{ApiResponse, ErrorCode, auth::RegisterRequest};
use crate::services::{bounded, failure};
use crate::utils::password::hash_password;
use crate::utils::validate::{require_text, validate_email, validate_password, validate_username};

use super::AuthService;

fn bad_request(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(code, message))
}

/// 学生注册时同时提供姓名与学号则一并建档
fn student_profile(
    request: &RegisterRequest,
) -> Result<Option<RegisterStudentProfileRequest>, String> {
    if request.role != UserRole::Student {
        return Ok(None);
    }
    match (&request.full_name, &request.student_number) {
        (None, None) => Ok(None),
        (Some(full_name), Some(student_number)) => Ok(Some(RegisterStudentProfileRequest {
            full_name: require_text("full_name", full_name)?,
            student_number: require_text("student_number", student_number)?,
        })),
        _ => Err("full_name and student_number must be provided together".to_string()),
    }
}

pub async fn handle_register(
    service: &AuthService,
    register_request: RegisterRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    // 1. 校验输入，任何一项不通过都不会写入
    if register_request.password != register_request.confirm_password {
        return Ok(bad_request(
            ErrorCode::ValidationFailed,
            "Passwords do not match",
        ));
    }
    let username = register_request.username.trim().to_string();
    if let Err(msg) = validate_username(&username) {
        return Ok(bad_request(ErrorCode::UserNameInvalid, msg));
    }
    let email = register_request.email.trim().to_lowercase();
    if let Err(msg) = validate_email(&email) {
        return Ok(bad_request(ErrorCode::UserEmailInvalid, msg));
    }
    if let Err(msg) = validate_password(&register_request.password) {
        return Ok(bad_request(ErrorCode::UserPasswordInvalid, msg));
    }
    let profile = match student_profile(&register_request) {
        Ok(profile) => profile,
        Err(msg) => return Ok(bad_request(ErrorCode::ValidationFailed, msg)),
    };

    // 2. 哈希密码
    let config = service.get_config();
    let password_hash = match hash_password(&register_request.password, &config.argon2) {
        Ok(hash) => hash,
        Err(e) => {
            tracing::error!("Password hashing failed: {}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::RegisterFailed,
                    "Register failed",
                )),
            );
        }
    };

    // 3. 创建账号（学生建档时账号与档案在同一事务中）
    let storage = service.get_storage(request);
    let account = CreateUserRequest {
        username,
        email,
        password_hash,
        role: register_request.role,
    };
    let deadline = config.operation_deadline();
    let created = match profile {
        Some(profile) => bounded(deadline, storage.enroll_student(account, profile))
            .await
            .map(|(user, _)| user),
        None => bounded(deadline, storage.create_user(account)).await,
    };

    let user = match created {
        Ok(user) => user,
        Err(RecordsError::Conflict(_)) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::UserAlreadyExists,
                "Username, email or student number already exists",
            )));
        }
        Err(e) => return Ok(failure("Register", e)),
    };

    // 4. 注册即登录
    let role = user.role.unwrap_or_default();
    let user_id = user.id;
    match service.issue_session(user, role, false) {
        Ok((response, refresh_cookie)) => {
            service.get_sessions(request).signed_in(user_id, role);
            tracing::info!("User {} registered as {}", user_id, role);
            Ok(HttpResponse::Created()
                .cookie(refresh_cookie)
                .json(ApiResponse::success(response, "Registration successful")))
        }
        Err(e) => Ok(failure("Register", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(role: UserRole, full_name: Option<&str>, number: Option<&str>) -> RegisterRequest {
        RegisterRequest {
            email: "ana@school.test".to_string(),
            username: "ana".to_string(),
            password: "secret1".to_string(),
            confirm_password: "secret1".to_string(),
            role,
            full_name: full_name.map(str::to_string),
            student_number: number.map(str::to_string),
        }
    }

    #[test]
    fn test_student_profile_requires_both_fields() {
        assert!(student_profile(&request(UserRole::Student, None, None)).unwrap().is_none());
        assert!(student_profile(&request(UserRole::Student, Some("Ana"), None)).is_err());
        assert!(student_profile(&request(UserRole::Student, Some(" "), Some("S-1"))).is_err());

        let profile = student_profile(&request(UserRole::Student, Some(" Ana "), Some("S-1")))
            .unwrap()
            .unwrap();
        assert_eq!(profile.full_name, "Ana");
    }

    #[test]
    fn test_teachers_never_get_a_profile() {
        let profile = student_profile(&request(UserRole::Teacher, Some("Ana"), Some("S-1")));
        assert!(profile.unwrap().is_none());
    }
}
