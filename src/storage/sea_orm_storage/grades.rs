use super::{SeaOrmStorage, map_write_err};
use crate::entity::grades::{ActiveModel, Column, Entity as Grades};
use crate::errors::{RecordsError, Result};
use crate::models::grades::entities::{GradeRecord, RawGrades, Term};
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    pub async fn get_grade_record_impl(
        &self,
        student_id: i64,
        subject_id: i64,
    ) -> Result<Option<GradeRecord>> {
        let result = Grades::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::SubjectId.eq(subject_id))
            .one(&self.db)
            .await
            .map_err(|e| RecordsError::persistence(format!("查询成绩失败: {e}")))?;

        Ok(result.map(|m| m.into_grade_record()))
    }

    /// 新建成绩记录，只填一个阶段
    pub async fn create_grade_record_impl(
        &self,
        student_id: i64,
        subject_id: i64,
        term: Term,
        value: f64,
        actor: i64,
    ) -> Result<GradeRecord> {
        let now = chrono::Utc::now().timestamp();
        let grades = RawGrades::only(term, value);

        let model = ActiveModel {
            student_id: Set(student_id),
            subject_id: Set(subject_id),
            prelim: Set(grades.prelim),
            midterm: Set(grades.midterm),
            semi_final: Set(grades.semi_final),
            final_term: Set(grades.final_term),
            created_by: Set(Some(actor)),
            updated_by: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| map_write_err("创建成绩记录失败", e))?;

        Ok(result.into_grade_record())
    }

    /// 单列条件更新：只写 `term` 对应的列，其它阶段保持数据库中的值
    pub async fn update_grade_term_impl(
        &self,
        record_id: i64,
        term: Term,
        value: f64,
        actor: i64,
    ) -> Result<bool> {
        let result = Grades::update_many()
            .col_expr(Column::for_term(term), Expr::value(value))
            .col_expr(
                Column::UpdatedAt,
                Expr::value(chrono::Utc::now().timestamp()),
            )
            .col_expr(Column::UpdatedBy, Expr::value(actor))
            .filter(Column::Id.eq(record_id))
            .exec(&self.db)
            .await
            .map_err(|e| RecordsError::persistence(format!("更新成绩失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn list_grades_by_subject_impl(&self, subject_id: i64) -> Result<Vec<GradeRecord>> {
        let results = Grades::find()
            .filter(Column::SubjectId.eq(subject_id))
            .order_by_asc(Column::StudentId)
            .all(&self.db)
            .await
            .map_err(|e| RecordsError::persistence(format!("查询科目成绩失败: {e}")))?;

        Ok(results.into_iter().map(|m| m.into_grade_record()).collect())
    }

    pub async fn list_grades_by_student_impl(&self, student_id: i64) -> Result<Vec<GradeRecord>> {
        let results = Grades::find()
            .filter(Column::StudentId.eq(student_id))
            .order_by_asc(Column::SubjectId)
            .all(&self.db)
            .await
            .map_err(|e| RecordsError::persistence(format!("查询学生成绩失败: {e}")))?;

        Ok(results.into_iter().map(|m| m.into_grade_record()).collect())
    }
}
