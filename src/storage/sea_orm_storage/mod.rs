//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod attendance;
mod grades;
mod students;
mod subjects;
mod users;

use crate::config::DatabaseConfig;
use crate::errors::{RecordsError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr, SqlErr};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 连接数据库并运行迁移
    pub async fn new_async(config: &DatabaseConfig) -> Result<Self> {
        let db_url = Self::build_database_url(&config.url)?;

        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        Migrator::up(&db, None)
            .await
            .map_err(|e| RecordsError::persistence(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM storage ready, database: {}", db_url);

        Ok(Self { db })
    }

    /// 测试用内存数据库（单连接，保证所有查询落在同一个库上）
    #[cfg(test)]
    pub(crate) async fn in_memory() -> Result<Self> {
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1)
            .min_connections(1)
            .sqlx_logging(false);

        let db = Database::connect(opt)
            .await
            .map_err(|e| RecordsError::database_connection(format!("SQLite 连接失败: {e}")))?;
        Migrator::up(&db, None)
            .await
            .map_err(|e| RecordsError::persistence(format!("数据库迁移失败: {e}")))?;

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| RecordsError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| RecordsError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.pool_size)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(config.timeout))
            .acquire_timeout(Duration::from_secs(config.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false);

        Database::connect(opt)
            .await
            .map_err(|e| RecordsError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 推断数据库类型
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(RecordsError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

/// 写操作错误映射：唯一约束 → Conflict，外键约束 → NotFound，其余 → Persistence
pub(crate) fn map_write_err(context: &str, err: DbErr) -> RecordsError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            RecordsError::conflict(format!("{context}: {detail}"))
        }
        Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
            RecordsError::not_found(format!("{context}: referenced record missing ({detail})"))
        }
        _ => RecordsError::persistence(format!("{context}: {err}")),
    }
}

// Storage trait 实现
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
use crate::storage::Storage;
use async_trait::async_trait;
use chrono::NaiveDate;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 账号
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.get_user_by_username_impl(username).await
    }

    // 学生档案
    async fn create_student(
        &self,
        user_id: Option<i64>,
        profile: RegisterStudentProfileRequest,
    ) -> Result<Student> {
        self.create_student_impl(user_id, profile).await
    }

    async fn enroll_student(
        &self,
        user: CreateUserRequest,
        profile: RegisterStudentProfileRequest,
    ) -> Result<(User, Student)> {
        self.enroll_student_impl(user, profile).await
    }

    async fn get_student_by_id(&self, id: i64) -> Result<Option<Student>> {
        self.get_student_by_id_impl(id).await
    }

    async fn get_student_by_user_id(&self, user_id: i64) -> Result<Option<Student>> {
        self.get_student_by_user_id_impl(user_id).await
    }

    async fn list_students(&self) -> Result<Vec<Student>> {
        self.list_students_impl().await
    }

    async fn list_students_with_pagination(
        &self,
        query: StudentListQuery,
    ) -> Result<StudentListResponse> {
        self.list_students_with_pagination_impl(query).await
    }

    async fn update_student_photo(&self, id: i64, photo_url: &str) -> Result<Option<Student>> {
        self.update_student_photo_impl(id, photo_url).await
    }

    async fn delete_student(&self, id: i64) -> Result<bool> {
        self.delete_student_impl(id).await
    }

    // 科目
    async fn create_subject(
        &self,
        subject: CreateSubjectRequest,
        created_by: i64,
    ) -> Result<Subject> {
        self.create_subject_impl(subject, created_by).await
    }

    async fn get_subject_by_id(&self, id: i64) -> Result<Option<Subject>> {
        self.get_subject_by_id_impl(id).await
    }

    async fn list_subjects(&self) -> Result<Vec<Subject>> {
        self.list_subjects_impl().await
    }

    async fn delete_subject(&self, id: i64) -> Result<bool> {
        self.delete_subject_impl(id).await
    }

    // 成绩
    async fn get_grade_record(
        &self,
        student_id: i64,
        subject_id: i64,
    ) -> Result<Option<GradeRecord>> {
        self.get_grade_record_impl(student_id, subject_id).await
    }

    async fn create_grade_record(
        &self,
        student_id: i64,
        subject_id: i64,
        term: Term,
        value: f64,
        actor: i64,
    ) -> Result<GradeRecord> {
        self.create_grade_record_impl(student_id, subject_id, term, value, actor)
            .await
    }

    async fn update_grade_term(
        &self,
        record_id: i64,
        term: Term,
        value: f64,
        actor: i64,
    ) -> Result<bool> {
        self.update_grade_term_impl(record_id, term, value, actor)
            .await
    }

    async fn list_grades_by_subject(&self, subject_id: i64) -> Result<Vec<GradeRecord>> {
        self.list_grades_by_subject_impl(subject_id).await
    }

    async fn list_grades_by_student(&self, student_id: i64) -> Result<Vec<GradeRecord>> {
        self.list_grades_by_student_impl(student_id).await
    }

    // 考勤
    async fn replace_attendance(
        &self,
        subject_id: i64,
        date: NaiveDate,
        entries: &[AttendanceEntry],
        actor: i64,
    ) -> Result<usize> {
        self.replace_attendance_impl(subject_id, date, entries, actor)
            .await
    }

    async fn list_attendance_by_subject_date(
        &self,
        subject_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>> {
        self.list_attendance_by_subject_date_impl(subject_id, date)
            .await
    }

    async fn list_attendance_by_student(&self, student_id: i64) -> Result<Vec<AttendanceRecord>> {
        self.list_attendance_by_student_impl(student_id).await
    }
}
