use serde::Deserialize;
use ts_rs::TS;

/// 某科目某天的整批点名
///
/// 日期与状态以字符串接收，由服务层解析校验。
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "attendance.ts")]
pub struct RecordDayRequest {
    /// YYYY-MM-DD
    pub date: String,
    pub entries: Vec<AttendanceEntryInput>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "attendance.ts")]
pub struct AttendanceEntryInput {
    pub student_id: i64,
    pub status: String,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "attendance.ts")]
pub struct AttendanceDateQuery {
    pub date: String,
}
