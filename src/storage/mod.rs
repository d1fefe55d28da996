//! 持久化协作方
//!
//! [`Storage`] 覆盖 users / students / subjects / grades / attendance 五张表，
//! [`object_store::ObjectStore`] 负责学生照片。

use std::sync::Arc;

use chrono::NaiveDate;

use crate::errors::Result;
use crate::models::{
    attendance::entities::{AttendanceEntry, AttendanceRecord},
    grades::entities::{GradeRecord, Term},
    students::{
        entities::Student,
        requests::{RegisterStudentProfileRequest, StudentListQuery},
        responses::StudentListResponse,
    },
    subjects::{entities::Subject, requests::CreateSubjectRequest},
    users::{entities::User, requests::CreateUserRequest},
};

pub mod object_store;
pub mod sea_orm_storage;

pub use object_store::{LocalObjectStore, ObjectStore};
pub use sea_orm_storage::SeaOrmStorage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 账号
    // 创建账号，用户名或邮箱重复返回 Conflict
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;

    /// 学生档案
    // 为已有账号（或无账号）创建档案
    async fn create_student(
        &self,
        user_id: Option<i64>,
        profile: RegisterStudentProfileRequest,
    ) -> Result<Student>;
    // 在同一事务中创建学生账号与档案
    async fn enroll_student(
        &self,
        user: CreateUserRequest,
        profile: RegisterStudentProfileRequest,
    ) -> Result<(User, Student)>;
    async fn get_student_by_id(&self, id: i64) -> Result<Option<Student>>;
    async fn get_student_by_user_id(&self, user_id: i64) -> Result<Option<Student>>;
    // 完整名单，按姓名排序
    async fn list_students(&self) -> Result<Vec<Student>>;
    async fn list_students_with_pagination(
        &self,
        query: StudentListQuery,
    ) -> Result<StudentListResponse>;
    async fn update_student_photo(&self, id: i64, photo_url: &str) -> Result<Option<Student>>;
    // 删除档案，成绩与考勤级联删除
    async fn delete_student(&self, id: i64) -> Result<bool>;

    /// 科目
    async fn create_subject(&self, subject: CreateSubjectRequest, created_by: i64)
    -> Result<Subject>;
    async fn get_subject_by_id(&self, id: i64) -> Result<Option<Subject>>;
    async fn list_subjects(&self) -> Result<Vec<Subject>>;
    // 删除科目，成绩与考勤级联删除
    async fn delete_subject(&self, id: i64) -> Result<bool>;

    /// 成绩
    async fn get_grade_record(&self, student_id: i64, subject_id: i64)
    -> Result<Option<GradeRecord>>;
    // 新建只含一个阶段的记录；(学生, 科目) 已存在时返回 Conflict
    async fn create_grade_record(
        &self,
        student_id: i64,
        subject_id: i64,
        term: Term,
        value: f64,
        actor: i64,
    ) -> Result<GradeRecord>;
    // 按记录 id 只更新一个阶段列，返回是否命中
    async fn update_grade_term(
        &self,
        record_id: i64,
        term: Term,
        value: f64,
        actor: i64,
    ) -> Result<bool>;
    async fn list_grades_by_subject(&self, subject_id: i64) -> Result<Vec<GradeRecord>>;
    async fn list_grades_by_student(&self, student_id: i64) -> Result<Vec<GradeRecord>>;

    /// 考勤
    // 在一个事务内以 entries 整体替换 (科目, 日期) 的考勤，返回写入行数
    async fn replace_attendance(
        &self,
        subject_id: i64,
        date: NaiveDate,
        entries: &[AttendanceEntry],
        actor: i64,
    ) -> Result<usize>;
    async fn list_attendance_by_subject_date(
        &self,
        subject_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>>;
    // 按日期倒序
    async fn list_attendance_by_student(&self, student_id: i64) -> Result<Vec<AttendanceRecord>>;
}

pub type SharedStorage = Arc<dyn Storage>;
