//! 查询视图：名单与成绩/考勤的左连接，以及学生个人汇总

use serde::Serialize;
use ts_rs::TS;

use crate::models::attendance::entities::AttendanceStatus;
use crate::models::grades::entities::{CumulativeGrade, RawGrades};
use crate::models::students::entities::Student;
use crate::models::subjects::entities::Subject;

/// 名单中的一行；没有成绩记录的学生 `record_id` 为空、各阶段为空
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "records.ts")]
pub struct RosterGradeRow {
    pub student: Student,
    pub record_id: Option<i64>,
    pub grades: RawGrades,
    pub cumulative: CumulativeGrade,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "records.ts")]
pub struct RosterGradesResponse {
    pub subject: Subject,
    pub rows: Vec<RosterGradeRow>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "records.ts")]
pub struct RosterAttendanceRow {
    pub student: Student,
    pub status: Option<AttendanceStatus>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "records.ts")]
pub struct RosterAttendanceResponse {
    pub subject: Subject,
    pub date: chrono::NaiveDate,
    pub rows: Vec<RosterAttendanceRow>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "records.ts")]
pub struct SubjectGradeSummary {
    pub subject_id: i64,
    pub subject_name: String,
    pub grades: RawGrades,
    pub cumulative: CumulativeGrade,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "records.ts")]
pub struct AttendanceLogItem {
    pub subject_id: i64,
    pub subject_name: String,
    pub date: chrono::NaiveDate,
    pub status: AttendanceStatus,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "records.ts")]
pub struct AttendanceTallies {
    pub present: u32,
    pub absent: u32,
    pub late: u32,
    pub excused: u32,
}

impl AttendanceTallies {
    pub fn count(&mut self, status: AttendanceStatus) {
        match status {
            AttendanceStatus::Present => self.present += 1,
            AttendanceStatus::Absent => self.absent += 1,
            AttendanceStatus::Late => self.late += 1,
            AttendanceStatus::Excused => self.excused += 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "records.ts")]
pub struct StudentSummary {
    pub student: Student,
    pub grades: Vec<SubjectGradeSummary>,
    /// 按日期倒序
    pub attendance: Vec<AttendanceLogItem>,
    pub tallies: AttendanceTallies,
}
