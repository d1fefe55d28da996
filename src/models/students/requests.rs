use serde::Deserialize;
use ts_rs::TS;

use crate::models::common::PaginationQuery;

// 教师代建：同时创建学生账号与档案
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "student.ts")]
pub struct EnrollStudentRequest {
    pub full_name: String,
    pub student_number: String,
    pub email: String,
    pub password: String,
    /// 缺省时使用学号作为用户名
    #[serde(default)]
    pub username: Option<String>,
}

// 学生自助建档
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "student.ts")]
pub struct RegisterStudentProfileRequest {
    pub full_name: String,
    pub student_number: String,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "student.ts")]
pub struct StudentListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    /// 按姓名或学号模糊搜索
    pub search: Option<String>,
}

/// 存储层使用的列表查询
#[derive(Debug, Clone, Default)]
pub struct StudentListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub search: Option<String>,
}

impl From<StudentListParams> for StudentListQuery {
    fn from(params: StudentListParams) -> Self {
        Self {
            page: Some(params.pagination.page),
            size: Some(params.pagination.size),
            search: params.search,
        }
    }
}
