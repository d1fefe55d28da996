use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubjectService;
use crate::models::ApiResponse;
use crate::models::attendance::{
    requests::{AttendanceDateQuery, RecordDayRequest},
    responses::RecordDayResponse,
};
use crate::services::attendance::ledger::parse_date;
use crate::services::{bounded, current_user, failure};

pub async fn handle_roster_attendance(
    service: &SubjectService,
    request: &HttpRequest,
    subject_id: i64,
    query: AttendanceDateQuery,
) -> ActixResult<HttpResponse> {
    let caller = match current_user(request) {
        Ok(caller) => caller,
        Err(resp) => return Ok(resp),
    };
    let date = match parse_date(&query.date) {
        Ok(date) => date,
        Err(e) => return Ok(failure("Roster attendance", e)),
    };

    let facade = service.get_facade(request);
    match bounded(
        service.deadline(),
        facade.roster_with_attendance(&caller, subject_id, date),
    )
    .await
    {
        Ok(view) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            view,
            "Attendance retrieved successfully",
        ))),
        Err(e) => Ok(failure("Roster attendance", e)),
    }
}

pub async fn handle_record_day(
    service: &SubjectService,
    request: &HttpRequest,
    subject_id: i64,
    body: RecordDayRequest,
) -> ActixResult<HttpResponse> {
    let caller = match current_user(request) {
        Ok(caller) => caller,
        Err(resp) => return Ok(resp),
    };

    let facade = service.get_facade(request);
    match bounded(service.deadline(), facade.record_day(&caller, subject_id, &body)).await {
        Ok((date, recorded)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            RecordDayResponse {
                subject_id,
                date,
                recorded,
            },
            "Attendance recorded successfully",
        ))),
        Err(e) => Ok(failure("Record attendance", e)),
    }
}
