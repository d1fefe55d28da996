use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "attendance.ts")]
pub struct RecordDayResponse {
    pub subject_id: i64,
    pub date: chrono::NaiveDate,
    /// 写入的行数
    pub recorded: usize,
}
