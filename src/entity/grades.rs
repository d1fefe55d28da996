//! 成绩实体

use sea_orm::entity::prelude::*;

use super::timestamp_to_datetime;
use crate::models::grades::entities::Term;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "grades")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub subject_id: i64,
    pub prelim: Option<f64>,
    pub midterm: Option<f64>,
    pub semi_final: Option<f64>,
    #[sea_orm(column_name = "final")]
    pub final_term: Option<f64>,
    pub created_by: Option<i64>,
    pub updated_by: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
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

impl Column {
    /// 阶段对应的成绩列
    pub fn for_term(term: Term) -> Self {
        match term {
            Term::Prelim => Column::Prelim,
            Term::Midterm => Column::Midterm,
            Term::SemiFinal => Column::SemiFinal,
            Term::Final => Column::FinalTerm,
        }
    }
}

impl Model {
    pub fn raw_grades(&self) -> crate::models::grades::entities::RawGrades {
        crate::models::grades::entities::RawGrades {
            prelim: self.prelim,
            midterm: self.midterm,
            semi_final: self.semi_final,
            final_term: self.final_term,
        }
    }

    pub fn into_grade_record(self) -> crate::models::grades::entities::GradeRecord {
        crate::models::grades::entities::GradeRecord {
            id: self.id,
            student_id: self.student_id,
            subject_id: self.subject_id,
            grades: self.raw_grades(),
            created_by: self.created_by,
            updated_by: self.updated_by,
            created_at: timestamp_to_datetime(self.created_at),
            updated_at: timestamp_to_datetime(self.updated_at),
        }
    }
}
