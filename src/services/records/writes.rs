use std::collections::HashSet;

use chrono::NaiveDate;

use super::RecordsFacade;
use crate::errors::{RecordsError, Result};
use crate::models::attendance::requests::RecordDayRequest;
use crate::models::auth::CurrentUser;
use crate::models::grades::{entities::GradeRecord, requests::RecordTermRequest};
use crate::services::{attendance, grades};

impl RecordsFacade {
    pub async fn record_term(
        &self,
        caller: &CurrentUser,
        subject_id: i64,
        request: RecordTermRequest,
    ) -> Result<GradeRecord> {
        Self::require_teacher(caller, "record grades")?;
        grades::ledger::validate_grade(request.value)?;
        self.require_subject(subject_id).await?;
        self.require_student(request.student_id).await?;

        grades::record_term(
            self.storage.as_ref(),
            request.student_id,
            subject_id,
            request.term,
            request.value,
            caller.id,
        )
        .await
    }

    /// 整批替换某天的考勤，返回 (日期, 写入行数)
    pub async fn record_day(
        &self,
        caller: &CurrentUser,
        subject_id: i64,
        request: &RecordDayRequest,
    ) -> Result<(NaiveDate, usize)> {
        Self::require_teacher(caller, "record attendance")?;
        let date = attendance::ledger::parse_date(&request.date)?;
        let entries = attendance::ledger::parse_entries(&request.entries)?;

        self.require_subject(subject_id).await?;
        let enrolled: HashSet<i64> = self
            .storage
            .list_students()
            .await?
            .into_iter()
            .map(|s| s.id)
            .collect();
        if let Some(unknown) = entries.iter().find(|e| !enrolled.contains(&e.student_id)) {
            return Err(RecordsError::not_found(format!(
                "Student {} not found",
                unknown.student_id
            )));
        }

        let written =
            attendance::record_day(self.storage.as_ref(), subject_id, date, &entries, caller.id)
                .await?;
        Ok((date, written))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{caller, harness};
    use crate::errors::RecordsError;
    use crate::models::attendance::requests::{AttendanceEntryInput, RecordDayRequest};
    use crate::models::grades::{entities::Term, requests::RecordTermRequest};
    use crate::models::users::entities::UserRole;
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::fixtures;

    fn day(date: &str, entries: &[(i64, &str)]) -> RecordDayRequest {
        RecordDayRequest {
            date: date.to_string(),
            entries: entries
                .iter()
                .map(|(student_id, status)| AttendanceEntryInput {
                    student_id: *student_id,
                    status: status.to_string(),
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_record_term_checks_in_order() {
        let h = harness().await;
        let subject = fixtures::subject(&h.storage, "Algebra", h.teacher.id).await;
        let student = fixtures::student(&h.storage, "Ana Cruz", "S-001").await;
        let pupil = fixtures::user(&h.storage, "pupil", UserRole::Student).await;

        // 非教师：即使数值越界也先报授权错误
        let err = h
            .facade
            .record_term(
                &caller(&pupil),
                subject.id,
                RecordTermRequest {
                    student_id: student.id,
                    term: Term::Final,
                    value: 9.0,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, RecordsError::Authorization(_)));

        // 数值越界先于存在性检查
        let err = h
            .facade
            .record_term(
                &h.teacher,
                9999,
                RecordTermRequest {
                    student_id: student.id,
                    term: Term::Final,
                    value: 0.5,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, RecordsError::Validation(_)));

        let err = h
            .facade
            .record_term(
                &h.teacher,
                subject.id,
                RecordTermRequest {
                    student_id: 9999,
                    term: Term::Final,
                    value: 2.0,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, RecordsError::NotFound(_)));

        let record = h
            .facade
            .record_term(
                &h.teacher,
                subject.id,
                RecordTermRequest {
                    student_id: student.id,
                    term: Term::SemiFinal,
                    value: 2.5,
                },
            )
            .await
            .unwrap();
        assert_eq!(record.grades.semi_final, Some(2.5));
        assert_eq!(record.updated_by, None);
    }

    #[tokio::test]
    async fn test_record_day_rejects_whole_batch() {
        let h = harness().await;
        let subject = fixtures::subject(&h.storage, "Biology", h.teacher.id).await;
        let ana = fixtures::student(&h.storage, "Ana Cruz", "S-001").await;

        let (date, written) = h
            .facade
            .record_day(&h.teacher, subject.id, &day("2024-09-02", &[(ana.id, "present")]))
            .await
            .unwrap();
        assert_eq!(written, 1);

        let err = h
            .facade
            .record_day(
                &h.teacher,
                subject.id,
                &day("2024-09-02", &[(ana.id, "absent"), (9999, "present")]),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, RecordsError::NotFound(_)));

        let err = h
            .facade
            .record_day(&h.teacher, subject.id, &day("2024-09-02", &[(ana.id, "gone")]))
            .await
            .unwrap_err();
        assert!(matches!(err, RecordsError::Validation(_)));

        let err = h
            .facade
            .record_day(&h.teacher, subject.id, &day("yesterday", &[]))
            .await
            .unwrap_err();
        assert!(matches!(err, RecordsError::DateParse(_)));

        let rows = h
            .storage
            .list_attendance_by_subject_date(subject.id, date)
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].status.as_str(), "present");
    }
}
