//! 学籍记录门面
//!
//! 所有读写入口按 授权 -> 校验 -> 存在性 -> 写入 的顺序执行。
//! 门面不缓存任何成绩或考勤数据，每次读取都直达存储。

mod roster;
mod views;
mod writes;

use std::sync::Arc;

use tracing::info;

use crate::errors::{RecordsError, Result};
use crate::models::auth::CurrentUser;
use crate::models::students::entities::Student;
use crate::models::subjects::entities::Subject;
use crate::storage::{ObjectStore, Storage};

pub use roster::PhotoUpload;

#[derive(Clone)]
pub struct RecordsFacade {
    storage: Arc<dyn Storage>,
    objects: Arc<dyn ObjectStore>,
}

impl RecordsFacade {
    pub fn new(storage: Arc<dyn Storage>, objects: Arc<dyn ObjectStore>) -> Self {
        Self { storage, objects }
    }

    fn require_teacher(caller: &CurrentUser, action: &str) -> Result<()> {
        if caller.is_teacher() {
            return Ok(());
        }
        info!("User {} ({}) refused: {}", caller.id, caller.role, action);
        Err(RecordsError::authorization(format!(
            "Only teachers may {action}"
        )))
    }

    /// 教师，或档案归属于调用者本人
    ///
    /// 非教师只与自己的档案比对，不会因此得知其他学生是否存在。
    async fn require_teacher_or_owner(
        &self,
        caller: &CurrentUser,
        student_id: i64,
        action: &str,
    ) -> Result<()> {
        if caller.is_teacher() {
            return Ok(());
        }
        let own = self.storage.get_student_by_user_id(caller.id).await?;
        if own.map(|s| s.id) == Some(student_id) {
            return Ok(());
        }
        info!(
            "User {} refused: {} for student {}",
            caller.id, action, student_id
        );
        Err(RecordsError::authorization(format!(
            "You may only {action} for your own student profile"
        )))
    }

    async fn require_subject(&self, subject_id: i64) -> Result<Subject> {
        self.storage
            .get_subject_by_id(subject_id)
            .await?
            .ok_or_else(|| RecordsError::not_found(format!("Subject {subject_id} not found")))
    }

    async fn require_student(&self, student_id: i64) -> Result<Student> {
        self.storage
            .get_student_by_id(student_id)
            .await?
            .ok_or_else(|| RecordsError::not_found(format!("Student {student_id} not found")))
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::path::PathBuf;
    use std::sync::Arc;

    use super::RecordsFacade;
    use crate::models::auth::CurrentUser;
    use crate::models::users::entities::{User, UserRole};
    use crate::storage::sea_orm_storage::fixtures;
    use crate::storage::{LocalObjectStore, SeaOrmStorage};

    pub struct Harness {
        pub storage: Arc<SeaOrmStorage>,
        pub facade: RecordsFacade,
        pub teacher: CurrentUser,
        pub photo_dir: PathBuf,
    }

    impl Drop for Harness {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.photo_dir);
        }
    }

    pub fn caller(user: &User) -> CurrentUser {
        CurrentUser {
            id: user.id,
            role: user.role.unwrap_or_default(),
        }
    }

    pub async fn harness() -> Harness {
        let storage = Arc::new(SeaOrmStorage::in_memory().await.unwrap());
        let photo_dir =
            std::env::temp_dir().join(format!("records-facade-{}", uuid::Uuid::new_v4()));
        let objects = Arc::new(LocalObjectStore::new(&photo_dir, "/api/v1/photos"));
        let teacher = fixtures::user(&storage, "teacher", UserRole::Teacher).await;

        Harness {
            facade: RecordsFacade::new(storage.clone(), objects),
            storage,
            teacher: caller(&teacher),
            photo_dir,
        }
    }
}
