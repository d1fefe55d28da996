use serde::Deserialize;
use ts_rs::TS;

use crate::models::users::entities::UserRole;

// 登录请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "auth.ts")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// 是否记住我
    #[serde(default)]
    pub remember_me: bool,
}

// 注册请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "auth.ts")]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
    pub confirm_password: String,
    #[serde(default)]
    pub role: UserRole,
    /// 学生注册时可同时建档
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub student_number: Option<String>,
}
