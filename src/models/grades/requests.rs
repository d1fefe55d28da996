use serde::Deserialize;
use ts_rs::TS;

use super::entities::Term;

/// 录入一个阶段的成绩
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "grade.ts")]
pub struct RecordTermRequest {
    pub student_id: i64,
    pub term: Term,
    pub value: f64,
}
