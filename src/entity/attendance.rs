//! 考勤实体

use sea_orm::entity::prelude::*;

use super::timestamp_to_datetime;
use crate::errors::RecordsError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "attendance")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub subject_id: i64,
    pub date: Date,
    pub status: String,
    pub recorded_by: Option<i64>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::students::Entity",
        from = "Column::StudentId",
        to = "super::students::Column::Id",
        on_delete = "Cascade"
    )]
    Student,
    #[sea_orm(
        belongs_to = "super::subjects::Entity",
        from = "Column::SubjectId",
        to = "super::subjects::Column::Id",
        on_delete = "Cascade"
    )]
    Subject,
}

impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::subjects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subject.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// 库中的状态值无法识别时视为数据损坏
    pub fn into_attendance_record(
        self,
    ) -> Result<crate::models::attendance::entities::AttendanceRecord, RecordsError> {
        Ok(crate::models::attendance::entities::AttendanceRecord {
            id: self.id,
            student_id: self.student_id,
            subject_id: self.subject_id,
            date: self.date,
            status: self.status.parse().map_err(|_| {
                RecordsError::persistence(format!(
                    "Stored attendance {} has unknown status '{}'",
                    self.id, self.status
                ))
            })?,
            recorded_by: self.recorded_by,
            created_at: timestamp_to_datetime(self.created_at),
        })
    }
}
