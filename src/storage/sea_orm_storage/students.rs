use super::{SeaOrmStorage, map_write_err};
use crate::entity::students::{ActiveModel, Column, Entity as Students};
use crate::errors::{RecordsError, Result};
use crate::models::{
    common::PaginationInfo,
    students::{
        entities::Student,
        requests::{RegisterStudentProfileRequest, StudentListQuery},
        responses::StudentListResponse,
    },
    users::{entities::User, requests::CreateUserRequest},
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建学生档案
    pub async fn create_student_impl(
        &self,
        user_id: Option<i64>,
        profile: RegisterStudentProfileRequest,
    ) -> Result<Student> {
        Self::insert_student(&self.db, user_id, profile).await
    }

    async fn insert_student<C: ConnectionTrait>(
        conn: &C,
        user_id: Option<i64>,
        profile: RegisterStudentProfileRequest,
    ) -> Result<Student> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            user_id: Set(user_id),
            full_name: Set(profile.full_name),
            student_number: Set(profile.student_number),
            photo_url: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(conn)
            .await
            .map_err(|e| map_write_err("创建学生档案失败", e))?;

        Ok(result.into_student())
    }

    /// 账号与档案在同一事务中创建，任一步失败都不留下半成品
    pub async fn enroll_student_impl(
        &self,
        user: CreateUserRequest,
        profile: RegisterStudentProfileRequest,
    ) -> Result<(User, Student)> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| RecordsError::persistence(format!("开启事务失败: {e}")))?;

        let result = async {
            let user = Self::insert_user(&txn, user).await?;
            let student = Self::insert_student(&txn, Some(user.id), profile).await?;
            Ok::<_, RecordsError>((user, student))
        }
        .await;

        match result {
            Ok(created) => {
                txn.commit()
                    .await
                    .map_err(|e| RecordsError::persistence(format!("提交事务失败: {e}")))?;
                Ok(created)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Enrollment rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }

    pub async fn get_student_by_id_impl(&self, id: i64) -> Result<Option<Student>> {
        let result = Students::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| RecordsError::persistence(format!("查询学生失败: {e}")))?;

        Ok(result.map(|m| m.into_student()))
    }

    pub async fn get_student_by_user_id_impl(&self, user_id: i64) -> Result<Option<Student>> {
        let result = Students::find()
            .filter(Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(|e| RecordsError::persistence(format!("查询学生失败: {e}")))?;

        Ok(result.map(|m| m.into_student()))
    }

    /// 完整名单
    pub async fn list_students_impl(&self) -> Result<Vec<Student>> {
        let results = Students::find()
            .order_by_asc(Column::FullName)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| RecordsError::persistence(format!("查询学生名单失败: {e}")))?;

        Ok(results.into_iter().map(|m| m.into_student()).collect())
    }

    /// 分页列出学生
    pub async fn list_students_with_pagination_impl(
        &self,
        query: StudentListQuery,
    ) -> Result<StudentListResponse> {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(10).clamp(1, 100) as u64;

        let mut select = Students::find();

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::FullName.contains(&escaped))
                    .add(Column::StudentNumber.contains(&escaped)),
            );
        }

        select = select
            .order_by_asc(Column::FullName)
            .order_by_asc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| RecordsError::persistence(format!("查询学生总数失败: {e}")))?;

        let students = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| RecordsError::persistence(format!("查询学生列表失败: {e}")))?;

        Ok(StudentListResponse {
            items: students.into_iter().map(|m| m.into_student()).collect(),
            pagination: PaginationInfo::new(page as i64, size as i64, total as i64),
        })
    }

    /// 更新照片地址
    pub async fn update_student_photo_impl(
        &self,
        id: i64,
        photo_url: &str,
    ) -> Result<Option<Student>> {
        let result = Students::update_many()
            .col_expr(
                Column::PhotoUrl,
                sea_orm::sea_query::Expr::value(photo_url.to_string()),
            )
            .col_expr(
                Column::UpdatedAt,
                sea_orm::sea_query::Expr::value(chrono::Utc::now().timestamp()),
            )
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| RecordsError::persistence(format!("更新学生照片失败: {e}")))?;

        if result.rows_affected == 0 {
            return Ok(None);
        }
        self.get_student_by_id_impl(id).await
    }

    /// 删除学生档案
    pub async fn delete_student_impl(&self, id: i64) -> Result<bool> {
        let result = Students::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| RecordsError::persistence(format!("删除学生失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures;
    use super::*;
    use crate::models::users::entities::UserRole;

    fn profile(name: &str, number: &str) -> RegisterStudentProfileRequest {
        RegisterStudentProfileRequest {
            full_name: name.to_string(),
            student_number: number.to_string(),
        }
    }

    fn account(username: &str) -> CreateUserRequest {
        CreateUserRequest {
            username: username.to_string(),
            email: format!("{username}@school.test"),
            password_hash: "hash".to_string(),
            role: UserRole::Student,
        }
    }

    #[tokio::test]
    async fn test_enroll_creates_linked_account() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let (user, student) = storage
            .enroll_student_impl(account("2024-0001"), profile("Ana Cruz", "2024-0001"))
            .await
            .unwrap();

        assert_eq!(student.user_id, Some(user.id));
        let found = storage.get_student_by_user_id_impl(user.id).await.unwrap();
        assert_eq!(found.map(|s| s.id), Some(student.id));
    }

    #[tokio::test]
    async fn test_enroll_rolls_back_on_duplicate_number() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        fixtures::student(&storage, "Ana Cruz", "2024-0001").await;

        let err = storage
            .enroll_student_impl(account("newcomer"), profile("Ben Reyes", "2024-0001"))
            .await
            .unwrap_err();
        assert!(matches!(err, RecordsError::Conflict(_)));
        // 账号也不应被留下
        assert!(
            storage
                .get_user_by_username_impl("newcomer")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_second_profile_for_user_is_conflict() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let user = fixtures::user(&storage, "student1", UserRole::Student).await;
        storage
            .create_student_impl(Some(user.id), profile("Ana Cruz", "2024-0001"))
            .await
            .unwrap();

        let err = storage
            .create_student_impl(Some(user.id), profile("Ana Cruz", "2024-0002"))
            .await
            .unwrap_err();
        assert!(matches!(err, RecordsError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_paginated_search() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        fixtures::student(&storage, "Carla Diaz", "2024-0003").await;
        fixtures::student(&storage, "Ana Cruz", "2024-0001").await;
        fixtures::student(&storage, "Ben Reyes", "2024-0002").await;

        let all = storage
            .list_students_with_pagination_impl(StudentListQuery {
                page: Some(1),
                size: Some(2),
                search: None,
            })
            .await
            .unwrap();
        assert_eq!(all.pagination.total, 3);
        assert_eq!(all.pagination.total_pages, 2);
        assert_eq!(all.items[0].full_name, "Ana Cruz");

        let found = storage
            .list_students_with_pagination_impl(StudentListQuery {
                page: None,
                size: None,
                search: Some("0002".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(found.items.len(), 1);
        assert_eq!(found.items[0].full_name, "Ben Reyes");
    }

    #[tokio::test]
    async fn test_update_photo() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let student = fixtures::student(&storage, "Ana Cruz", "2024-0001").await;

        let updated = storage
            .update_student_photo_impl(student.id, "/api/v1/photos/1-abc.png")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.photo_url.as_deref(), Some("/api/v1/photos/1-abc.png"));
        assert!(
            storage
                .update_student_photo_impl(999, "x")
                .await
                .unwrap()
                .is_none()
        );
    }
}
