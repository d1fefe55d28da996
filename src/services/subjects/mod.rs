pub mod attendance;
pub mod grades;
pub mod manage;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::time::Duration;

use crate::config::AppConfig;
use crate::models::attendance::requests::{AttendanceDateQuery, RecordDayRequest};
use crate::models::grades::requests::RecordTermRequest;
use crate::models::subjects::requests::CreateSubjectRequest;

use super::{RecordsFacade, records_facade};

pub struct SubjectService;

impl SubjectService {
    pub fn new_lazy() -> Self {
        Self
    }

    pub(crate) fn get_facade(&self, request: &HttpRequest) -> RecordsFacade {
        records_facade(request)
    }

    pub(crate) fn deadline(&self) -> Duration {
        AppConfig::get().operation_deadline()
    }

    // 科目列表
    pub async fn list_subjects(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        manage::handle_list_subjects(self, request).await
    }

    // 创建科目
    pub async fn create_subject(
        &self,
        request: &HttpRequest,
        body: CreateSubjectRequest,
    ) -> ActixResult<HttpResponse> {
        manage::handle_create_subject(self, request, body).await
    }

    // 删除科目
    pub async fn delete_subject(
        &self,
        request: &HttpRequest,
        subject_id: i64,
    ) -> ActixResult<HttpResponse> {
        manage::handle_delete_subject(self, request, subject_id).await
    }

    // 名单 + 成绩
    pub async fn roster_grades(
        &self,
        request: &HttpRequest,
        subject_id: i64,
    ) -> ActixResult<HttpResponse> {
        grades::handle_roster_grades(self, request, subject_id).await
    }

    // 录入单个阶段成绩
    pub async fn record_term(
        &self,
        request: &HttpRequest,
        subject_id: i64,
        body: RecordTermRequest,
    ) -> ActixResult<HttpResponse> {
        grades::handle_record_term(self, request, subject_id, body).await
    }

    // 名单 + 当天考勤
    pub async fn roster_attendance(
        &self,
        request: &HttpRequest,
        subject_id: i64,
        query: AttendanceDateQuery,
    ) -> ActixResult<HttpResponse> {
        attendance::handle_roster_attendance(self, request, subject_id, query).await
    }

    // 整批提交当天考勤
    pub async fn record_day(
        &self,
        request: &HttpRequest,
        subject_id: i64,
        body: RecordDayRequest,
    ) -> ActixResult<HttpResponse> {
        attendance::handle_record_day(self, request, subject_id, body).await
    }
}
