use super::{SeaOrmStorage, map_write_err};
use crate::entity::attendance::{ActiveModel, Column, Entity as Attendance};
use crate::errors::{RecordsError, Result};
use crate::models::attendance::entities::{AttendanceEntry, AttendanceRecord};
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

impl SeaOrmStorage {
    /// 整批替换 (科目, 日期) 的考勤
    ///
    /// 删除与插入在同一事务中执行；任一行失败则整体回滚，旧数据保持不变。
    pub async fn replace_attendance_impl(
        &self,
        subject_id: i64,
        date: NaiveDate,
        entries: &[AttendanceEntry],
        actor: i64,
    ) -> Result<usize> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| RecordsError::persistence(format!("开启事务失败: {e}")))?;

        match Self::replace_in_txn(&txn, subject_id, date, entries, actor).await {
            Ok(written) => {
                txn.commit()
                    .await
                    .map_err(|e| RecordsError::persistence(format!("提交考勤失败: {e}")))?;
                Ok(written)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Attendance rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }

    async fn replace_in_txn(
        txn: &DatabaseTransaction,
        subject_id: i64,
        date: NaiveDate,
        entries: &[AttendanceEntry],
        actor: i64,
    ) -> Result<usize> {
        Attendance::delete_many()
            .filter(Column::SubjectId.eq(subject_id))
            .filter(Column::Date.eq(date))
            .exec(txn)
            .await
            .map_err(|e| RecordsError::persistence(format!("清除旧考勤失败: {e}")))?;

        let now = chrono::Utc::now().timestamp();
        for entry in entries {
            ActiveModel {
                student_id: Set(entry.student_id),
                subject_id: Set(subject_id),
                date: Set(date),
                status: Set(entry.status.to_string()),
                recorded_by: Set(Some(actor)),
                created_at: Set(now),
                ..Default::default()
            }
            .insert(txn)
            .await
            .map_err(|e| map_write_err("写入考勤失败", e))?;
        }

        Ok(entries.len())
    }

    pub async fn list_attendance_by_subject_date_impl(
        &self,
        subject_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>> {
        let results = Attendance::find()
            .filter(Column::SubjectId.eq(subject_id))
            .filter(Column::Date.eq(date))
            .order_by_asc(Column::StudentId)
            .all(&self.db)
            .await
            .map_err(|e| RecordsError::persistence(format!("查询考勤失败: {e}")))?;

        results
            .into_iter()
            .map(|m| m.into_attendance_record())
            .collect()
    }

    /// 学生的全部考勤，按日期倒序
    pub async fn list_attendance_by_student_impl(
        &self,
        student_id: i64,
    ) -> Result<Vec<AttendanceRecord>> {
        let results = Attendance::find()
            .filter(Column::StudentId.eq(student_id))
            .order_by_desc(Column::Date)
            .order_by_asc(Column::SubjectId)
            .all(&self.db)
            .await
            .map_err(|e| RecordsError::persistence(format!("查询学生考勤失败: {e}")))?;

        results
            .into_iter()
            .map(|m| m.into_attendance_record())
            .collect()
    }
}
