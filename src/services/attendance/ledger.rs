//! 考勤台账：一次提交即为该科目当天的完整点名快照

use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::info;

use crate::errors::{RecordsError, Result};
use crate::models::attendance::{
    entities::{AttendanceEntry, AttendanceStatus},
    requests::AttendanceEntryInput,
};
use crate::storage::Storage;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn parse_date(value: &str) -> Result<NaiveDate> {
    Ok(NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)?)
}

/// 解析并校验整批点名；任何一项不合法则整批拒绝
pub fn parse_entries(inputs: &[AttendanceEntryInput]) -> Result<Vec<AttendanceEntry>> {
    let mut seen = HashSet::with_capacity(inputs.len());
    inputs
        .iter()
        .map(|input| {
            if !seen.insert(input.student_id) {
                return Err(RecordsError::validation(format!(
                    "Student {} appears more than once in the batch",
                    input.student_id
                )));
            }
            Ok(AttendanceEntry {
                student_id: input.student_id,
                status: input.status.trim().parse::<AttendanceStatus>()?,
            })
        })
        .collect()
}

/// 以 entries 整体替换 (科目, 日期) 的考勤
///
/// 未出现在 entries 中的学生当天没有记录。重复提交相同 entries 结果不变。
pub async fn record_day(
    storage: &dyn Storage,
    subject_id: i64,
    date: NaiveDate,
    entries: &[AttendanceEntry],
    actor: i64,
) -> Result<usize> {
    let mut seen = HashSet::with_capacity(entries.len());
    if let Some(dup) = entries.iter().find(|e| !seen.insert(e.student_id)) {
        return Err(RecordsError::validation(format!(
            "Student {} appears more than once in the batch",
            dup.student_id
        )));
    }

    let written = storage
        .replace_attendance(subject_id, date, entries, actor)
        .await?;

    info!(
        "Replaced attendance for subject {} on {} with {} rows by user {}",
        subject_id, date, written, actor
    );
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserRole;
    use crate::storage::SeaOrmStorage;
    use crate::storage::sea_orm_storage::fixtures;

    fn input(student_id: i64, status: &str) -> AttendanceEntryInput {
        AttendanceEntryInput {
            student_id,
            status: status.to_string(),
        }
    }

    #[test]
    fn test_parse_entries_rejects_unknown_status() {
        let err = parse_entries(&[input(1, "present"), input(2, "sick")]).unwrap_err();
        assert!(matches!(err, RecordsError::Validation(_)));
    }

    #[test]
    fn test_parse_entries_rejects_duplicates() {
        let err = parse_entries(&[input(1, "present"), input(1, "late")]).unwrap_err();
        assert!(matches!(err, RecordsError::Validation(_)));
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-09-02").unwrap(),
            NaiveDate::from_ymd_opt(2024, 9, 2).unwrap()
        );
        assert!(matches!(
            parse_date("02/09/2024"),
            Err(RecordsError::DateParse(_))
        ));
    }

    #[tokio::test]
    async fn test_replay_is_idempotent() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let teacher = fixtures::user(&storage, "teacher", UserRole::Teacher).await;
        let subject = fixtures::subject(&storage, "Biology", teacher.id).await;
        let ana = fixtures::student(&storage, "Ana Cruz", "S-001").await;
        let ben = fixtures::student(&storage, "Ben Diaz", "S-002").await;
        let date = NaiveDate::from_ymd_opt(2024, 9, 2).unwrap();

        let entries = vec![
            AttendanceEntry {
                student_id: ana.id,
                status: AttendanceStatus::Present,
            },
            AttendanceEntry {
                student_id: ben.id,
                status: AttendanceStatus::Late,
            },
        ];

        record_day(&storage, subject.id, date, &entries, teacher.id)
            .await
            .unwrap();
        let first: Vec<_> = storage
            .list_attendance_by_subject_date(subject.id, date)
            .await
            .unwrap()
            .into_iter()
            .map(|r| (r.student_id, r.status))
            .collect();

        record_day(&storage, subject.id, date, &entries, teacher.id)
            .await
            .unwrap();
        let second: Vec<_> = storage
            .list_attendance_by_subject_date(subject.id, date)
            .await
            .unwrap()
            .into_iter()
            .map(|r| (r.student_id, r.status))
            .collect();

        assert_eq!(first.len(), 2);
        let mut first_sorted = first.clone();
        let mut second_sorted = second.clone();
        first_sorted.sort_by_key(|(id, _)| *id);
        second_sorted.sort_by_key(|(id, _)| *id);
        assert_eq!(first_sorted, second_sorted);
    }

    #[tokio::test]
    async fn test_omitted_student_has_no_record() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let teacher = fixtures::user(&storage, "teacher", UserRole::Teacher).await;
        let subject = fixtures::subject(&storage, "Biology", teacher.id).await;
        let ana = fixtures::student(&storage, "Ana Cruz", "S-001").await;
        let ben = fixtures::student(&storage, "Ben Diaz", "S-002").await;
        let date = NaiveDate::from_ymd_opt(2024, 9, 2).unwrap();

        let both = [
            AttendanceEntry {
                student_id: ana.id,
                status: AttendanceStatus::Present,
            },
            AttendanceEntry {
                student_id: ben.id,
                status: AttendanceStatus::Absent,
            },
        ];
        record_day(&storage, subject.id, date, &both, teacher.id)
            .await
            .unwrap();
        record_day(&storage, subject.id, date, &both[..1], teacher.id)
            .await
            .unwrap();

        let rows = storage
            .list_attendance_by_subject_date(subject.id, date)
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].student_id, ana.id);
    }
}
