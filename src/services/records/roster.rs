//! 名单维护：科目、学生档案与照片

use std::sync::Arc;

use tracing::{info, warn};

use super::RecordsFacade;
use crate::config::{Argon2Config, UploadConfig};
use crate::errors::{RecordsError, Result};
use crate::models::auth::CurrentUser;
use crate::models::students::{
    entities::Student,
    requests::{EnrollStudentRequest, RegisterStudentProfileRequest, StudentListQuery},
    responses::{PhotoUploadResponse, StudentListResponse},
};
use crate::models::subjects::{entities::Subject, requests::CreateSubjectRequest};
use crate::models::users::{
    entities::{User, UserRole},
    requests::CreateUserRequest,
};
use crate::storage::object_store::photo_key;
use crate::storage::{ObjectStore, Storage};
use crate::utils::password::hash_password;
use crate::utils::validate::{require_text, validate_email, validate_password, validate_username};
use crate::utils::validate_magic_bytes;

/// 一次照片上传的内容
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub extension: String,
    pub bytes: Vec<u8>,
}

fn text(field: &'static str, value: &str) -> Result<String> {
    require_text(field, value).map_err(RecordsError::validation)
}

fn validated_profile(request: &RegisterStudentProfileRequest) -> Result<RegisterStudentProfileRequest> {
    Ok(RegisterStudentProfileRequest {
        full_name: text("full_name", &request.full_name)?,
        student_number: text("student_number", &request.student_number)?,
    })
}

impl RecordsFacade {
    pub async fn list_subjects(&self) -> Result<Vec<Subject>> {
        self.storage.list_subjects().await
    }

    pub async fn create_subject(
        &self,
        caller: &CurrentUser,
        request: CreateSubjectRequest,
    ) -> Result<Subject> {
        Self::require_teacher(caller, "create subjects")?;
        let request = CreateSubjectRequest {
            name: text("name", &request.name)?,
            semester: request.semester.trim().to_string(),
            school_year: request.school_year.trim().to_string(),
        };

        let subject = self.storage.create_subject(request, caller.id).await?;
        info!("Subject {} ({}) created by user {}", subject.id, subject.name, caller.id);
        Ok(subject)
    }

    /// 删除科目，其成绩与考勤一并删除
    pub async fn delete_subject(&self, caller: &CurrentUser, subject_id: i64) -> Result<()> {
        Self::require_teacher(caller, "delete subjects")?;
        if !self.storage.delete_subject(subject_id).await? {
            return Err(RecordsError::not_found(format!("Subject {subject_id} not found")));
        }
        info!("Subject {} deleted by user {}", subject_id, caller.id);
        Ok(())
    }

    pub async fn list_students(
        &self,
        caller: &CurrentUser,
        query: StudentListQuery,
    ) -> Result<StudentListResponse> {
        Self::require_teacher(caller, "list students")?;
        self.storage.list_students_with_pagination(query).await
    }

    /// 教师代建：学生账号与档案在同一事务中创建，用户名缺省为学号
    pub async fn enroll_student(
        &self,
        caller: &CurrentUser,
        request: EnrollStudentRequest,
        argon2: &Argon2Config,
    ) -> Result<(User, Student)> {
        Self::require_teacher(caller, "enroll students")?;

        let profile = validated_profile(&RegisterStudentProfileRequest {
            full_name: request.full_name,
            student_number: request.student_number,
        })?;
        let email = request.email.trim().to_lowercase();
        validate_email(&email).map_err(RecordsError::validation)?;
        validate_password(&request.password).map_err(RecordsError::validation)?;
        let username = match request.username.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => {
                validate_username(name).map_err(RecordsError::validation)?;
                name.to_string()
            }
            _ => profile.student_number.clone(),
        };

        let account = CreateUserRequest {
            username,
            email,
            password_hash: hash_password(&request.password, argon2)?,
            role: UserRole::Student,
        };
        let (user, student) = self.storage.enroll_student(account, profile).await?;
        info!(
            "Student {} ({}) enrolled by user {}",
            student.id, student.student_number, caller.id
        );
        Ok((user, student))
    }

    /// 学生为自己建档，同一账号只能有一份档案
    pub async fn register_own_profile(
        &self,
        caller: &CurrentUser,
        request: RegisterStudentProfileRequest,
    ) -> Result<Student> {
        if caller.role != UserRole::Student {
            info!("User {} refused: self-registration as {}", caller.id, caller.role);
            return Err(RecordsError::authorization(
                "Only student accounts can register a student profile",
            ));
        }
        let profile = validated_profile(&request)?;

        if self.storage.get_student_by_user_id(caller.id).await?.is_some() {
            return Err(RecordsError::conflict(
                "A student profile already exists for this account",
            ));
        }
        let student = self.storage.create_student(Some(caller.id), profile).await?;
        info!("User {} registered student profile {}", caller.id, student.id);
        Ok(student)
    }

    pub async fn delete_student(&self, caller: &CurrentUser, student_id: i64) -> Result<()> {
        Self::require_teacher(caller, "delete students")?;
        if !self.storage.delete_student(student_id).await? {
            return Err(RecordsError::not_found(format!("Student {student_id} not found")));
        }
        info!("Student {} deleted by user {}", student_id, caller.id);
        Ok(())
    }

    /// 更新学生照片：上传到新键，再把档案的 photo_url 指向它
    pub async fn update_photo(
        &self,
        caller: &CurrentUser,
        student_id: i64,
        upload: PhotoUpload,
        policy: &UploadConfig,
    ) -> Result<PhotoUploadResponse> {
        self.require_teacher_or_owner(caller, student_id, "update the photo")
            .await?;

        let extension = upload.extension.trim_start_matches('.').to_lowercase();
        if !policy.allowed_extensions.iter().any(|e| e == &extension) {
            return Err(RecordsError::validation(format!(
                "File type '{extension}' is not allowed"
            )));
        }
        if upload.bytes.is_empty() {
            return Err(RecordsError::validation("Uploaded file is empty"));
        }
        if upload.bytes.len() > policy.max_size {
            return Err(RecordsError::validation(format!(
                "File exceeds the maximum size of {} bytes",
                policy.max_size
            )));
        }
        if !validate_magic_bytes(&upload.bytes, &extension) {
            return Err(RecordsError::validation(
                "File content does not match its extension",
            ));
        }

        self.require_student(student_id).await?;

        // 调用方超时放弃后，任务仍会完成写入与关联
        let storage = self.storage.clone();
        let objects = self.objects.clone();
        let actor = caller.id;
        tokio::spawn(async move {
            store_photo(storage, objects, student_id, &extension, &upload.bytes, actor).await
        })
        .await
        .map_err(|e| RecordsError::object_store(format!("Photo store task failed: {e}")))?
    }
}

async fn store_photo(
    storage: Arc<dyn Storage>,
    objects: Arc<dyn ObjectStore>,
    student_id: i64,
    extension: &str,
    bytes: &[u8],
    actor: i64,
) -> Result<PhotoUploadResponse> {
    let key = photo_key(student_id, extension);
    objects.upload(&key, bytes).await?;
    let photo_url = objects.public_url(&key);

    match storage.update_student_photo(student_id, &photo_url).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            warn!(
                "Student {} disappeared after photo upload, orphaned object {}",
                student_id, key
            );
            return Err(RecordsError::not_found(format!("Student {student_id} not found")));
        }
        Err(e) => {
            warn!(
                "Failed to link photo for student {}, orphaned object {}: {}",
                student_id, key, e
            );
            return Err(e);
        }
    }

    info!("Photo {} stored for student {} by user {}", key, student_id, actor);
    Ok(PhotoUploadResponse {
        student_id,
        key,
        photo_url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::grades::entities::Term;
    use crate::services::records::test_support::{caller, harness};
    use crate::storage::sea_orm_storage::fixtures;
    use crate::storage::{LocalObjectStore, Storage};

    const PNG: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

    fn argon2() -> Argon2Config {
        Argon2Config {
            memory_cost: 8,
            time_cost: 1,
            parallelism: 1,
        }
    }

    fn policy() -> UploadConfig {
        UploadConfig {
            photo_dir: String::new(),
            public_base_url: "/api/v1/photos".to_string(),
            max_size: 1024,
            allowed_extensions: vec!["png".to_string(), "jpg".to_string()],
        }
    }

    fn subject_request(name: &str) -> CreateSubjectRequest {
        CreateSubjectRequest {
            name: name.to_string(),
            semester: "2nd Semester".to_string(),
            school_year: "2024-2025".to_string(),
        }
    }

    fn enroll_request(number: &str, email: &str) -> EnrollStudentRequest {
        EnrollStudentRequest {
            full_name: "Ana Cruz".to_string(),
            student_number: number.to_string(),
            email: email.to_string(),
            password: "secret1".to_string(),
            username: None,
        }
    }

    #[tokio::test]
    async fn test_subject_lifecycle_cascades() {
        let h = harness().await;
        let err = h
            .facade
            .create_subject(&h.teacher, subject_request("   "))
            .await
            .unwrap_err();
        assert!(matches!(err, RecordsError::Validation(_)));

        let subject = h
            .facade
            .create_subject(&h.teacher, subject_request("Physics"))
            .await
            .unwrap();
        assert_eq!(subject.created_by, Some(h.teacher.id));

        let student = fixtures::student(&h.storage, "Ana Cruz", "S-001").await;
        h.storage
            .create_grade_record(student.id, subject.id, Term::Prelim, 1.25, h.teacher.id)
            .await
            .unwrap();

        h.facade.delete_subject(&h.teacher, subject.id).await.unwrap();
        assert!(h.storage.list_grades_by_student(student.id).await.unwrap().is_empty());

        let err = h
            .facade
            .delete_subject(&h.teacher, subject.id)
            .await
            .unwrap_err();
        assert!(matches!(err, RecordsError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_students_cannot_manage_roster() {
        let h = harness().await;
        let pupil = fixtures::user(&h.storage, "pupil", UserRole::Student).await;
        let pupil = caller(&pupil);

        let err = h
            .facade
            .create_subject(&pupil, subject_request("Physics"))
            .await
            .unwrap_err();
        assert!(matches!(err, RecordsError::Authorization(_)));

        let err = h
            .facade
            .enroll_student(&pupil, enroll_request("S-100", "x@school.test"), &argon2())
            .await
            .unwrap_err();
        assert!(matches!(err, RecordsError::Authorization(_)));
    }

    #[tokio::test]
    async fn test_enroll_defaults_username_to_number() {
        let h = harness().await;
        let (user, student) = h
            .facade
            .enroll_student(&h.teacher, enroll_request("2024-0001", "Ana@School.test"), &argon2())
            .await
            .unwrap();
        assert_eq!(user.username, "2024-0001");
        assert_eq!(user.email, "ana@school.test");
        assert_eq!(user.role, Some(UserRole::Student));
        assert_eq!(student.user_id, Some(user.id));

        let mut short = enroll_request("2024-0002", "ben@school.test");
        short.password = "12345".to_string();
        let err = h
            .facade
            .enroll_student(&h.teacher, short, &argon2())
            .await
            .unwrap_err();
        assert!(matches!(err, RecordsError::Validation(_)));
    }

    #[tokio::test]
    async fn test_self_registration_once() {
        let h = harness().await;
        let pupil = fixtures::user(&h.storage, "pupil", UserRole::Student).await;
        let request = RegisterStudentProfileRequest {
            full_name: "Ana Cruz".to_string(),
            student_number: "S-001".to_string(),
        };

        let student = h
            .facade
            .register_own_profile(&caller(&pupil), request.clone())
            .await
            .unwrap();
        assert_eq!(student.user_id, Some(pupil.id));

        let err = h
            .facade
            .register_own_profile(&caller(&pupil), request.clone())
            .await
            .unwrap_err();
        assert!(matches!(err, RecordsError::Conflict(_)));

        let err = h
            .facade
            .register_own_profile(&h.teacher, request)
            .await
            .unwrap_err();
        assert!(matches!(err, RecordsError::Authorization(_)));
    }

    #[tokio::test]
    async fn test_photo_update_rules() {
        let h = harness().await;
        let owner = fixtures::user(&h.storage, "owner", UserRole::Student).await;
        let stranger = fixtures::user(&h.storage, "stranger", UserRole::Student).await;
        let student = h
            .storage
            .create_student(
                Some(owner.id),
                RegisterStudentProfileRequest {
                    full_name: "Ana Cruz".to_string(),
                    student_number: "S-001".to_string(),
                },
            )
            .await
            .unwrap();
        let png = || PhotoUpload {
            extension: ".PNG".to_string(),
            bytes: PNG.to_vec(),
        };

        let err = h
            .facade
            .update_photo(&caller(&stranger), student.id, png(), &policy())
            .await
            .unwrap_err();
        assert!(matches!(err, RecordsError::Authorization(_)));

        let err = h
            .facade
            .update_photo(
                &caller(&owner),
                student.id,
                PhotoUpload {
                    extension: "png".to_string(),
                    bytes: b"not an image".to_vec(),
                },
                &policy(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, RecordsError::Validation(_)));

        let err = h
            .facade
            .update_photo(
                &caller(&owner),
                student.id,
                PhotoUpload {
                    extension: "gif".to_string(),
                    bytes: b"GIF89a".to_vec(),
                },
                &policy(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, RecordsError::Validation(_)));

        let response = h
            .facade
            .update_photo(&caller(&owner), student.id, png(), &policy())
            .await
            .unwrap();
        assert!(response.key.starts_with(&format!("{}-", student.id)));
        assert!(response.key.ends_with(".png"));
        assert_eq!(response.photo_url, format!("/api/v1/photos/{}", response.key));

        let stored = h.storage.get_student_by_id(student.id).await.unwrap().unwrap();
        assert_eq!(stored.photo_url.as_deref(), Some(response.photo_url.as_str()));

        let second = h
            .facade
            .update_photo(&h.teacher, student.id, png(), &policy())
            .await
            .unwrap();
        assert_ne!(second.key, response.key);

        let err = h
            .facade
            .update_photo(&h.teacher, 9999, png(), &policy())
            .await
            .unwrap_err();
        assert!(matches!(err, RecordsError::NotFound(_)));
    }

    /// 上传前先等待一段时间的对象存储
    struct SlowObjects {
        inner: LocalObjectStore,
        delay: std::time::Duration,
    }

    #[async_trait::async_trait]
    impl ObjectStore for SlowObjects {
        async fn upload(&self, key: &str, bytes: &[u8]) -> Result<()> {
            tokio::time::sleep(self.delay).await;
            self.inner.upload(key, bytes).await
        }

        async fn download(&self, key: &str) -> Result<Option<Vec<u8>>> {
            self.inner.download(key).await
        }

        fn public_url(&self, key: &str) -> String {
            self.inner.public_url(key)
        }
    }

    #[tokio::test]
    async fn test_photo_is_linked_after_caller_deadline() {
        use crate::services::bounded;
        use std::time::Duration;

        let h = harness().await;
        let student = fixtures::student(&h.storage, "Ana Cruz", "S-001").await;
        let objects = Arc::new(SlowObjects {
            inner: LocalObjectStore::new(&h.photo_dir, "/api/v1/photos"),
            delay: Duration::from_millis(200),
        });
        let facade = RecordsFacade::new(h.storage.clone(), objects.clone());
        let upload = PhotoUpload {
            extension: "png".to_string(),
            bytes: PNG.to_vec(),
        };

        let err = bounded(
            Duration::from_millis(50),
            facade.update_photo(&h.teacher, student.id, upload, &policy()),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RecordsError::Persistence(_)));

        let mut linked = None;
        for _ in 0..50 {
            tokio::time::sleep(Duration::from_millis(20)).await;
            linked = h
                .storage
                .get_student_by_id(student.id)
                .await
                .unwrap()
                .and_then(|s| s.photo_url);
            if linked.is_some() {
                break;
            }
        }
        let url = linked.expect("photo should be linked once the upload finishes");
        let key = url.trim_start_matches("/api/v1/photos/");
        assert_eq!(objects.download(key).await.unwrap().as_deref(), Some(PNG));
    }
}
