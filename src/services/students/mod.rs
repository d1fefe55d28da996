pub mod manage;
pub mod photo;
pub mod summary;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::time::Duration;

use crate::config::AppConfig;
use crate::models::students::requests::{
    EnrollStudentRequest, RegisterStudentProfileRequest, StudentListParams,
};

use super::{RecordsFacade, records_facade};

pub struct StudentService;

impl StudentService {
    pub fn new_lazy() -> Self {
        Self
    }

    pub(crate) fn get_facade(&self, request: &HttpRequest) -> RecordsFacade {
        records_facade(request)
    }

    pub(crate) fn get_config(&self) -> &AppConfig {
        AppConfig::get()
    }

    pub(crate) fn deadline(&self) -> Duration {
        self.get_config().operation_deadline()
    }

    // 学生列表（分页 + 搜索）
    pub async fn list_students(
        &self,
        request: &HttpRequest,
        params: StudentListParams,
    ) -> ActixResult<HttpResponse> {
        manage::handle_list_students(self, request, params).await
    }

    // 教师代建学生账号与档案
    pub async fn enroll_student(
        &self,
        request: &HttpRequest,
        body: EnrollStudentRequest,
    ) -> ActixResult<HttpResponse> {
        manage::handle_enroll_student(self, request, body).await
    }

    // 学生自助建档
    pub async fn register_self(
        &self,
        request: &HttpRequest,
        body: RegisterStudentProfileRequest,
    ) -> ActixResult<HttpResponse> {
        manage::handle_register_self(self, request, body).await
    }

    // 删除学生
    pub async fn delete_student(
        &self,
        request: &HttpRequest,
        student_id: i64,
    ) -> ActixResult<HttpResponse> {
        manage::handle_delete_student(self, request, student_id).await
    }

    // 学生个人汇总
    pub async fn summary(
        &self,
        request: &HttpRequest,
        student_id: Option<i64>,
    ) -> ActixResult<HttpResponse> {
        summary::handle_summary(self, request, student_id).await
    }

    // 上传照片
    pub async fn upload_photo(
        &self,
        request: &HttpRequest,
        student_id: i64,
        payload: Multipart,
    ) -> ActixResult<HttpResponse> {
        photo::handle_upload_photo(self, request, student_id, payload).await
    }
}
