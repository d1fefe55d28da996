use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubjectService;
use crate::models::ApiResponse;
use crate::models::subjects::{requests::CreateSubjectRequest, responses::SubjectListResponse};
use crate::services::{bounded, current_user, failure};

pub async fn handle_list_subjects(
    service: &SubjectService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let facade = service.get_facade(request);
    match bounded(service.deadline(), facade.list_subjects()).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            SubjectListResponse { items },
            "Subjects retrieved successfully",
        ))),
        Err(e) => Ok(failure("List subjects", e)),
    }
}

pub async fn handle_create_subject(
    service: &SubjectService,
    request: &HttpRequest,
    body: CreateSubjectRequest,
) -> ActixResult<HttpResponse> {
    let caller = match current_user(request) {
        Ok(caller) => caller,
        Err(resp) => return Ok(resp),
    };

    let facade = service.get_facade(request);
    match bounded(service.deadline(), facade.create_subject(&caller, body)).await {
        Ok(subject) => Ok(HttpResponse::Created().json(ApiResponse::success(
            subject,
            "Subject created successfully",
        ))),
        Err(e) => Ok(failure("Create subject", e)),
    }
}

pub async fn handle_delete_subject(
    service: &SubjectService,
    request: &HttpRequest,
    subject_id: i64,
) -> ActixResult<HttpResponse> {
    let caller = match current_user(request) {
        Ok(caller) => caller,
        Err(resp) => return Ok(resp),
    };

    let facade = service.get_facade(request);
    match bounded(service.deadline(), facade.delete_subject(&caller, subject_id)).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty(
            "Subject deleted successfully",
        ))),
        Err(e) => Ok(failure("Delete subject", e)),
    }
}
