use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::StudentService;
use crate::models::ApiResponse;
use crate::services::{bounded, current_user, failure};

/// `student_id` 为空时返回调用者本人的汇总
pub async fn handle_summary(
    service: &StudentService,
    request: &HttpRequest,
    student_id: Option<i64>,
) -> ActixResult<HttpResponse> {
    let caller = match current_user(request) {
        Ok(caller) => caller,
        Err(resp) => return Ok(resp),
    };

    let facade = service.get_facade(request);
    let result = match student_id {
        Some(id) => bounded(service.deadline(), facade.student_summary(&caller, id)).await,
        None => bounded(service.deadline(), facade.own_summary(&caller)).await,
    };

    match result {
        Ok(summary) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            summary,
            "Student summary retrieved successfully",
        ))),
        Err(e) => Ok(failure("Student summary", e)),
    }
}
