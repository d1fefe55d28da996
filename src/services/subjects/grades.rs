use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubjectService;
use crate::models::ApiResponse;
use crate::models::grades::requests::RecordTermRequest;
use crate::services::{bounded, current_user, failure};

pub async fn handle_roster_grades(
    service: &SubjectService,
    request: &HttpRequest,
    subject_id: i64,
) -> ActixResult<HttpResponse> {
    let caller = match current_user(request) {
        Ok(caller) => caller,
        Err(resp) => return Ok(resp),
    };

    let facade = service.get_facade(request);
    match bounded(
        service.deadline(),
        facade.roster_with_grades(&caller, subject_id),
    )
    .await
    {
        Ok(view) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            view,
            "Grades retrieved successfully",
        ))),
        Err(e) => Ok(failure("Roster grades", e)),
    }
}

pub async fn handle_record_term(
    service: &SubjectService,
    request: &HttpRequest,
    subject_id: i64,
    body: RecordTermRequest,
) -> ActixResult<HttpResponse> {
    let caller = match current_user(request) {
        Ok(caller) => caller,
        Err(resp) => return Ok(resp),
    };

    let facade = service.get_facade(request);
    match bounded(service.deadline(), facade.record_term(&caller, subject_id, body)).await {
        Ok(record) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            record,
            "Grade recorded successfully",
        ))),
        Err(e) => Ok(failure("Record term", e)),
    }
}
