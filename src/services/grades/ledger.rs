//! 成绩台账：每个 (学生, 科目) 至多一条记录，每次只合并一个阶段

use tracing::{debug, info};

use crate::errors::{RecordsError, Result};
use crate::models::grades::entities::{GradeRecord, Term};
use crate::storage::Storage;

pub const MIN_GRADE: f64 = 1.0;
pub const MAX_GRADE: f64 = 5.0;

pub fn validate_grade(value: f64) -> Result<()> {
    if !value.is_finite() || !(MIN_GRADE..=MAX_GRADE).contains(&value) {
        return Err(RecordsError::validation(format!(
            "Grade must be a number between {MIN_GRADE:.1} and {MAX_GRADE:.1}, got {value}"
        )));
    }
    Ok(())
}

/// 写入单个阶段成绩
///
/// 已有记录时只更新该阶段所在的列，其余阶段不受影响；
/// 没有记录时新建一条只含该阶段的记录。并发首次写入落败时（Conflict）改走更新。
pub async fn record_term(
    storage: &dyn Storage,
    student_id: i64,
    subject_id: i64,
    term: Term,
    value: f64,
    actor: i64,
) -> Result<GradeRecord> {
    validate_grade(value)?;

    let record = match storage.get_grade_record(student_id, subject_id).await? {
        Some(existing) => {
            update_existing(storage, existing.id, student_id, subject_id, term, value, actor)
                .await?
        }
        None => match storage
            .create_grade_record(student_id, subject_id, term, value, actor)
            .await
        {
            Ok(created) => created,
            Err(RecordsError::Conflict(_)) => {
                debug!(
                    "Grade record for student {} subject {} created concurrently, merging",
                    student_id, subject_id
                );
                let existing = storage
                    .get_grade_record(student_id, subject_id)
                    .await?
                    .ok_or_else(|| {
                        RecordsError::persistence("Grade record vanished after conflict")
                    })?;
                update_existing(storage, existing.id, student_id, subject_id, term, value, actor)
                    .await?
            }
            Err(e) => return Err(e),
        },
    };

    info!(
        "Recorded {} = {} for student {} in subject {} by user {}",
        term, value, student_id, subject_id, actor
    );
    Ok(record)
}

async fn update_existing(
    storage: &dyn Storage,
    record_id: i64,
    student_id: i64,
    subject_id: i64,
    term: Term,
    value: f64,
    actor: i64,
) -> Result<GradeRecord> {
    if !storage.update_grade_term(record_id, term, value, actor).await? {
        return Err(RecordsError::not_found(format!(
            "Grade record {record_id} no longer exists"
        )));
    }
    storage
        .get_grade_record(student_id, subject_id)
        .await?
        .ok_or_else(|| RecordsError::not_found(format!("Grade record {record_id} no longer exists")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserRole;
    use crate::storage::SeaOrmStorage;
    use crate::config::DatabaseConfig;
    use crate::storage::sea_orm_storage::fixtures;
    use std::sync::Arc;

    #[test]
    fn test_validate_grade_bounds() {
        assert!(validate_grade(1.0).is_ok());
        assert!(validate_grade(5.0).is_ok());
        assert!(validate_grade(2.75).is_ok());
        assert!(matches!(validate_grade(0.9), Err(RecordsError::Validation(_))));
        assert!(matches!(validate_grade(5.1), Err(RecordsError::Validation(_))));
        assert!(matches!(validate_grade(f64::NAN), Err(RecordsError::Validation(_))));
        assert!(matches!(
            validate_grade(f64::INFINITY),
            Err(RecordsError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_terms_merge_into_one_record() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let teacher = fixtures::user(&storage, "teacher", UserRole::Teacher).await;
        let student = fixtures::student(&storage, "Ana Cruz", "S-001").await;
        let subject = fixtures::subject(&storage, "Algebra", teacher.id).await;

        let first = record_term(&storage, student.id, subject.id, Term::Prelim, 2.0, teacher.id)
            .await
            .unwrap();
        let second = record_term(&storage, student.id, subject.id, Term::Midterm, 4.0, teacher.id)
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.grades.prelim, Some(2.0));
        assert_eq!(second.grades.midterm, Some(4.0));
        assert_eq!(second.grades.semi_final, None);
        assert_eq!(storage.list_grades_by_subject(subject.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_out_of_range_writes_nothing() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let teacher = fixtures::user(&storage, "teacher", UserRole::Teacher).await;
        let student = fixtures::student(&storage, "Ana Cruz", "S-001").await;
        let subject = fixtures::subject(&storage, "Algebra", teacher.id).await;

        for bad in [5.1, 0.9] {
            let err = record_term(&storage, student.id, subject.id, Term::Final, bad, teacher.id)
                .await
                .unwrap_err();
            assert!(matches!(err, RecordsError::Validation(_)));
        }
        assert!(
            storage
                .get_grade_record(student.id, subject.id)
                .await
                .unwrap()
                .is_none()
        );

        for good in [5.0, 1.0] {
            let record =
                record_term(&storage, student.id, subject.id, Term::Final, good, teacher.id)
                    .await
                    .unwrap();
            assert_eq!(record.grades.final_term, Some(good));
        }
    }

    #[tokio::test]
    async fn test_overwrite_same_term_stamps_actor() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let first = fixtures::user(&storage, "first", UserRole::Teacher).await;
        let second = fixtures::user(&storage, "second", UserRole::Teacher).await;
        let student = fixtures::student(&storage, "Ana Cruz", "S-001").await;
        let subject = fixtures::subject(&storage, "Algebra", first.id).await;

        record_term(&storage, student.id, subject.id, Term::Prelim, 2.0, first.id)
            .await
            .unwrap();
        let record = record_term(&storage, student.id, subject.id, Term::Prelim, 1.5, second.id)
            .await
            .unwrap();

        assert_eq!(record.grades.prelim, Some(1.5));
        assert_eq!(record.created_by, Some(first.id));
        assert_eq!(record.updated_by, Some(second.id));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_first_writes_merge_into_one_record() {
        let path = std::env::temp_dir().join(format!("grades-{}.db", uuid::Uuid::new_v4().simple()));
        let config = DatabaseConfig {
            url: path.to_string_lossy().into_owned(),
            pool_size: 8,
            timeout: 10,
        };
        let storage = Arc::new(SeaOrmStorage::new_async(&config).await.unwrap());
        let teacher = fixtures::user(&storage, "teacher", UserRole::Teacher).await;
        let student = fixtures::student(&storage, "Ana Cruz", "S-001").await;

        let terms = [
            (Term::Prelim, 1.0),
            (Term::Midterm, 2.0),
            (Term::SemiFinal, 3.0),
            (Term::Final, 4.0),
        ];
        for round in 0..10 {
            let subject =
                fixtures::subject(&storage, &format!("Algebra {round}"), teacher.id).await;

            let writes: Vec<_> = terms
                .iter()
                .map(|&(term, value)| {
                    let storage = storage.clone();
                    let (student_id, subject_id, actor) = (student.id, subject.id, teacher.id);
                    tokio::spawn(async move {
                        record_term(storage.as_ref(), student_id, subject_id, term, value, actor)
                            .await
                    })
                })
                .collect();
            for write in writes {
                write.await.unwrap().unwrap();
            }

            let records = storage.list_grades_by_subject(subject.id).await.unwrap();
            assert_eq!(records.len(), 1, "round {round}");
            let grades = records[0].grades;
            assert_eq!(grades.prelim, Some(1.0));
            assert_eq!(grades.midterm, Some(2.0));
            assert_eq!(grades.semi_final, Some(3.0));
            assert_eq!(grades.final_term, Some(4.0));
        }

        drop(storage);
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{suffix}", path.display()));
        }
    }
}
