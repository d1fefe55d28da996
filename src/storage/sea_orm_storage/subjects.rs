use super::{SeaOrmStorage, map_write_err};
use crate::entity::subjects::{ActiveModel, Column, Entity as Subjects};
use crate::errors::{RecordsError, Result};
use crate::models::subjects::{entities::Subject, requests::CreateSubjectRequest};
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};

impl SeaOrmStorage {
    /// 创建科目
    pub async fn create_subject_impl(
        &self,
        req: CreateSubjectRequest,
        created_by: i64,
    ) -> Result<Subject> {
        let model = ActiveModel {
            name: Set(req.name),
            semester: Set(req.semester),
            school_year: Set(req.school_year),
            created_by: Set(Some(created_by)),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| map_write_err("创建科目失败", e))?;

        Ok(result.into_subject())
    }

    pub async fn get_subject_by_id_impl(&self, id: i64) -> Result<Option<Subject>> {
        let result = Subjects::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| RecordsError::persistence(format!("查询科目失败: {e}")))?;

        Ok(result.map(|m| m.into_subject()))
    }

    /// 全部科目，按名称排序
    pub async fn list_subjects_impl(&self) -> Result<Vec<Subject>> {
        let results = Subjects::find()
            .order_by_asc(Column::Name)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| RecordsError::persistence(format!("查询科目列表失败: {e}")))?;

        Ok(results.into_iter().map(|m| m.into_subject()).collect())
    }

    /// 删除科目（成绩、考勤由外键级联删除）
    pub async fn delete_subject_impl(&self, id: i64) -> Result<bool> {
        let result = Subjects::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| RecordsError::persistence(format!("删除科目失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
