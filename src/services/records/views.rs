use std::collections::HashMap;

use chrono::NaiveDate;

use super::RecordsFacade;
use crate::errors::{RecordsError, Result};
use crate::models::auth::CurrentUser;
use crate::models::records::responses::{
    AttendanceLogItem, AttendanceTallies, RosterAttendanceResponse, RosterAttendanceRow,
    RosterGradeRow, RosterGradesResponse, StudentSummary, SubjectGradeSummary,
};
use crate::models::students::entities::Student;
use crate::services::grades::cumulative;

impl RecordsFacade {
    /// 完整名单左连接该科目成绩，没有记录的学生各阶段为空
    pub async fn roster_with_grades(
        &self,
        caller: &CurrentUser,
        subject_id: i64,
    ) -> Result<RosterGradesResponse> {
        Self::require_teacher(caller, "view subject grades")?;
        let subject = self.require_subject(subject_id).await?;

        let students = self.storage.list_students().await?;
        let mut records: HashMap<i64, _> = self
            .storage
            .list_grades_by_subject(subject_id)
            .await?
            .into_iter()
            .map(|record| (record.student_id, record))
            .collect();

        let rows = students
            .into_iter()
            .map(|student| {
                let record = records.remove(&student.id);
                let grades = record.as_ref().map(|r| r.grades).unwrap_or_default();
                RosterGradeRow {
                    record_id: record.map(|r| r.id),
                    cumulative: cumulative(&grades),
                    grades,
                    student,
                }
            })
            .collect();

        Ok(RosterGradesResponse { subject, rows })
    }

    /// 完整名单左连接该科目当天考勤，没有记录的学生状态为空
    pub async fn roster_with_attendance(
        &self,
        caller: &CurrentUser,
        subject_id: i64,
        date: NaiveDate,
    ) -> Result<RosterAttendanceResponse> {
        Self::require_teacher(caller, "view subject attendance")?;
        let subject = self.require_subject(subject_id).await?;

        let students = self.storage.list_students().await?;
        let statuses: HashMap<i64, _> = self
            .storage
            .list_attendance_by_subject_date(subject_id, date)
            .await?
            .into_iter()
            .map(|record| (record.student_id, record.status))
            .collect();

        let rows = students
            .into_iter()
            .map(|student| RosterAttendanceRow {
                status: statuses.get(&student.id).copied(),
                student,
            })
            .collect();

        Ok(RosterAttendanceResponse {
            subject,
            date,
            rows,
        })
    }

    pub async fn student_summary(
        &self,
        caller: &CurrentUser,
        student_id: i64,
    ) -> Result<StudentSummary> {
        self.require_teacher_or_owner(caller, student_id, "view the summary")
            .await?;
        let student = self.require_student(student_id).await?;
        self.summarize(student).await
    }

    /// 调用者自己的汇总
    pub async fn own_summary(&self, caller: &CurrentUser) -> Result<StudentSummary> {
        let student = self
            .storage
            .get_student_by_user_id(caller.id)
            .await?
            .ok_or_else(|| RecordsError::not_found("No student profile for this account"))?;
        self.summarize(student).await
    }

    async fn summarize(&self, student: Student) -> Result<StudentSummary> {
        let subject_names: HashMap<i64, String> = self
            .storage
            .list_subjects()
            .await?
            .into_iter()
            .map(|subject| (subject.id, subject.name))
            .collect();
        let name_of = |subject_id: i64| {
            subject_names
                .get(&subject_id)
                .cloned()
                .unwrap_or_default()
        };

        let mut grades: Vec<SubjectGradeSummary> = self
            .storage
            .list_grades_by_student(student.id)
            .await?
            .into_iter()
            .map(|record| SubjectGradeSummary {
                subject_id: record.subject_id,
                subject_name: name_of(record.subject_id),
                cumulative: cumulative(&record.grades),
                grades: record.grades,
            })
            .collect();
        grades.sort_by(|a, b| a.subject_name.cmp(&b.subject_name));

        let mut tallies = AttendanceTallies::default();
        let attendance = self
            .storage
            .list_attendance_by_student(student.id)
            .await?
            .into_iter()
            .map(|record| {
                tallies.count(record.status);
                AttendanceLogItem {
                    subject_id: record.subject_id,
                    subject_name: name_of(record.subject_id),
                    date: record.date,
                    status: record.status,
                }
            })
            .collect();

        Ok(StudentSummary {
            student,
            grades,
            attendance,
            tallies,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::super::test_support::{caller, harness};
    use crate::errors::RecordsError;
    use crate::models::attendance::entities::{AttendanceEntry, AttendanceStatus};
    use crate::models::grades::entities::{GradeStatus, Term};
    use crate::models::students::requests::RegisterStudentProfileRequest;
    use crate::models::users::entities::UserRole;
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::fixtures;

    #[tokio::test]
    async fn test_roster_with_grades_left_joins_everyone() {
        let h = harness().await;
        let subject = fixtures::subject(&h.storage, "Algebra", h.teacher.id).await;
        let graded = fixtures::student(&h.storage, "Ana Cruz", "S-001").await;
        let ungraded = fixtures::student(&h.storage, "Ben Diaz", "S-002").await;

        h.storage
            .create_grade_record(graded.id, subject.id, Term::Prelim, 1.0, h.teacher.id)
            .await
            .unwrap();

        let view = h
            .facade
            .roster_with_grades(&h.teacher, subject.id)
            .await
            .unwrap();
        assert_eq!(view.rows.len(), 2);

        let ana = view.rows.iter().find(|r| r.student.id == graded.id).unwrap();
        assert!(ana.record_id.is_some());
        assert_eq!(ana.grades.prelim, Some(1.0));
        assert_eq!(ana.cumulative.status, Some(GradeStatus::Passed));

        let ben = view.rows.iter().find(|r| r.student.id == ungraded.id).unwrap();
        assert_eq!(ben.record_id, None);
        assert_eq!(ben.grades.prelim, None);
        assert_eq!(ben.cumulative.status, None);
    }

    #[tokio::test]
    async fn test_roster_with_attendance_shape() {
        let h = harness().await;
        let subject = fixtures::subject(&h.storage, "Biology", h.teacher.id).await;
        let ana = fixtures::student(&h.storage, "Ana Cruz", "S-001").await;
        let ben = fixtures::student(&h.storage, "Ben Diaz", "S-002").await;
        let date = NaiveDate::from_ymd_opt(2024, 9, 2).unwrap();

        h.storage
            .replace_attendance(
                subject.id,
                date,
                &[AttendanceEntry {
                    student_id: ana.id,
                    status: AttendanceStatus::Excused,
                }],
                h.teacher.id,
            )
            .await
            .unwrap();

        let view = h
            .facade
            .roster_with_attendance(&h.teacher, subject.id, date)
            .await
            .unwrap();
        assert_eq!(view.date, date);
        let status_of = |id: i64| view.rows.iter().find(|r| r.student.id == id).unwrap().status;
        assert_eq!(status_of(ana.id), Some(AttendanceStatus::Excused));
        assert_eq!(status_of(ben.id), None);
    }

    #[tokio::test]
    async fn test_roster_views_are_teacher_only() {
        let h = harness().await;
        let subject = fixtures::subject(&h.storage, "Algebra", h.teacher.id).await;
        let pupil = fixtures::user(&h.storage, "pupil", UserRole::Student).await;

        let err = h
            .facade
            .roster_with_grades(&caller(&pupil), subject.id)
            .await
            .unwrap_err();
        assert!(matches!(err, RecordsError::Authorization(_)));
    }

    #[tokio::test]
    async fn test_missing_subject_is_not_found() {
        let h = harness().await;
        let err = h
            .facade
            .roster_with_grades(&h.teacher, 404)
            .await
            .unwrap_err();
        assert!(matches!(err, RecordsError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_student_summary_owner_and_others() {
        let h = harness().await;
        let algebra = fixtures::subject(&h.storage, "Algebra", h.teacher.id).await;
        let biology = fixtures::subject(&h.storage, "Biology", h.teacher.id).await;

        let owner = fixtures::user(&h.storage, "owner", UserRole::Student).await;
        let other = fixtures::user(&h.storage, "other", UserRole::Student).await;
        let profile = h
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

        h.storage
            .create_grade_record(profile.id, biology.id, Term::Prelim, 2.0, h.teacher.id)
            .await
            .unwrap();
        h.storage
            .create_grade_record(profile.id, algebra.id, Term::Prelim, 4.0, h.teacher.id)
            .await
            .unwrap();
        for (day, status) in [(1, AttendanceStatus::Present), (2, AttendanceStatus::Late)] {
            h.storage
                .replace_attendance(
                    algebra.id,
                    NaiveDate::from_ymd_opt(2024, 9, day).unwrap(),
                    &[AttendanceEntry {
                        student_id: profile.id,
                        status,
                    }],
                    h.teacher.id,
                )
                .await
                .unwrap();
        }

        let summary = h
            .facade
            .student_summary(&caller(&owner), profile.id)
            .await
            .unwrap();
        assert_eq!(summary.grades.len(), 2);
        assert_eq!(summary.grades[0].subject_name, "Algebra");
        assert_eq!(summary.grades[0].cumulative.status, Some(GradeStatus::Failed));
        assert_eq!(summary.attendance.len(), 2);
        assert_eq!(
            summary.attendance[0].date,
            NaiveDate::from_ymd_opt(2024, 9, 2).unwrap()
        );
        assert_eq!(summary.tallies.present, 1);
        assert_eq!(summary.tallies.late, 1);

        let own = h.facade.own_summary(&caller(&owner)).await.unwrap();
        assert_eq!(own.student.id, profile.id);

        let err = h
            .facade
            .student_summary(&caller(&other), profile.id)
            .await
            .unwrap_err();
        assert!(matches!(err, RecordsError::Authorization(_)));

        let err = h.facade.own_summary(&caller(&other)).await.unwrap_err();
        assert!(matches!(err, RecordsError::NotFound(_)));

        let teacher_view = h
            .facade
            .student_summary(&h.teacher, profile.id)
            .await
            .unwrap();
        assert_eq!(teacher_view.tallies.present, 1);
    }
}
