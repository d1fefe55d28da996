use super::entities::UserRole;

/// 存储层创建账号的入参，密码已哈希
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
}
