use std::time::Duration;

use tracing::warn;

use crate::models::users::entities::UserRole;
use crate::services::bounded;
use crate::storage::Storage;

/// 角色解析结果；`from_profile` 为假表示使用了回退角色
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedRole {
    pub role: UserRole,
    pub from_profile: bool,
}

impl ResolvedRole {
    fn fallback() -> Self {
        Self {
            role: UserRole::Student,
            from_profile: false,
        }
    }
}

/// 由账号资料解析会话角色
///
/// 资料缺失、角色为空、读取失败或超过 `deadline` 时退化为学生角色，不向上传播错误。
pub async fn resolve_role(
    storage: &dyn Storage,
    user_id: i64,
    deadline: Duration,
) -> UserRole {
    resolve_role_detailed(storage, user_id, deadline).await.role
}

pub async fn resolve_role_detailed(
    storage: &dyn Storage,
    user_id: i64,
    deadline: Duration,
) -> ResolvedRole {
    match bounded(deadline, storage.get_user_by_id(user_id)).await {
        Ok(Some(user)) => match user.role {
            Some(role) => ResolvedRole {
                role,
                from_profile: true,
            },
            None => {
                warn!("User {} has no role on profile, falling back to student", user_id);
                ResolvedRole::fallback()
            }
        },
        Ok(None) => {
            warn!("No profile found for user {}, falling back to student", user_id);
            ResolvedRole::fallback()
        }
        Err(e) => {
            warn!(
                "Failed to read profile for user {}: {}, falling back to student",
                user_id, e
            );
            ResolvedRole::fallback()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SeaOrmStorage;
    use crate::storage::sea_orm_storage::fixtures;

    const DEADLINE: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn test_profile_role_wins() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let teacher = fixtures::user(&storage, "teacher", UserRole::Teacher).await;
        let student = fixtures::user(&storage, "pupil", UserRole::Student).await;

        assert_eq!(resolve_role(&storage, teacher.id, DEADLINE).await, UserRole::Teacher);
        assert!(resolve_role_detailed(&storage, teacher.id, DEADLINE).await.from_profile);
        assert_eq!(resolve_role(&storage, student.id, DEADLINE).await, UserRole::Student);
    }

    #[tokio::test]
    async fn test_missing_profile_falls_back_to_student() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        assert_eq!(resolve_role(&storage, 4242, DEADLINE).await, UserRole::Student);
        assert!(!resolve_role_detailed(&storage, 4242, DEADLINE).await.from_profile);
    }

    #[tokio::test]
    async fn test_unknown_stored_role_falls_back_to_student() {
        use crate::entity::users::{Column, Entity};
        use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, sea_query::Expr};

        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let user = fixtures::user(&storage, "ghost", UserRole::Teacher).await;
        Entity::update_many()
            .col_expr(Column::Role, Expr::value("principal"))
            .filter(Column::Id.eq(user.id))
            .exec(&storage.db)
            .await
            .unwrap();

        assert_eq!(resolve_role(&storage, user.id, DEADLINE).await, UserRole::Student);
    }

    #[tokio::test]
    async fn test_unreadable_profile_falls_back_to_student() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        storage.db.clone().close().await.unwrap();
        assert_eq!(resolve_role(&storage, 1, DEADLINE).await, UserRole::Student);
    }

    #[tokio::test]
    async fn test_slow_profile_read_falls_back_to_student() {
        use sea_orm::TransactionTrait;

        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let teacher = fixtures::user(&storage, "teacher", UserRole::Teacher).await;

        // 唯一的连接被事务占用，读取只能等到截止时间
        let txn = storage.db.begin().await.unwrap();
        let resolved =
            resolve_role_detailed(&storage, teacher.id, Duration::from_millis(50)).await;
        assert_eq!(resolved.role, UserRole::Student);
        assert!(!resolved.from_profile);
        txn.rollback().await.unwrap();

        assert_eq!(resolve_role(&storage, teacher.id, DEADLINE).await, UserRole::Teacher);
    }
}
