use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::StudentService;
use crate::models::ApiResponse;
use crate::models::students::{
    requests::{EnrollStudentRequest, RegisterStudentProfileRequest, StudentListParams},
    responses::StudentResponse,
};
use crate::services::{bounded, current_user, failure};

pub async fn handle_list_students(
    service: &StudentService,
    request: &HttpRequest,
    params: StudentListParams,
) -> ActixResult<HttpResponse> {
    let caller = match current_user(request) {
        Ok(caller) => caller,
        Err(resp) => return Ok(resp),
    };

    let params = StudentListParams {
        pagination: params.pagination.normalized(),
        search: params.search,
    };
    let facade = service.get_facade(request);
    match bounded(service.deadline(), facade.list_students(&caller, params.into())).await {
        Ok(list) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            list,
            "Students retrieved successfully",
        ))),
        Err(e) => Ok(failure("List students", e)),
    }
}

pub async fn handle_enroll_student(
    service: &StudentService,
    request: &HttpRequest,
    body: EnrollStudentRequest,
) -> ActixResult<HttpResponse> {
    let caller = match current_user(request) {
        Ok(caller) => caller,
        Err(resp) => return Ok(resp),
    };

    let facade = service.get_facade(request);
    let argon2 = &service.get_config().argon2;
    match bounded(
        service.deadline(),
        facade.enroll_student(&caller, body, argon2),
    )
    .await
    {
        Ok((_, student)) => Ok(HttpResponse::Created().json(ApiResponse::success(
            StudentResponse { student },
            "Student enrolled successfully",
        ))),
        Err(e) => Ok(failure("Enroll student", e)),
    }
}

pub async fn handle_register_self(
    service: &StudentService,
    request: &HttpRequest,
    body: RegisterStudentProfileRequest,
) -> ActixResult<HttpResponse> {
    let caller = match current_user(request) {
        Ok(caller) => caller,
        Err(resp) => return Ok(resp),
    };

    let facade = service.get_facade(request);
    match bounded(service.deadline(), facade.register_own_profile(&caller, body)).await {
        Ok(student) => Ok(HttpResponse::Created().json(ApiResponse::success(
            StudentResponse { student },
            "Student profile registered successfully",
        ))),
        Err(e) => Ok(failure("Register student profile", e)),
    }
}

pub async fn handle_delete_student(
    service: &StudentService,
    request: &HttpRequest,
    student_id: i64,
) -> ActixResult<HttpResponse> {
    let caller = match current_user(request) {
        Ok(caller) => caller,
        Err(resp) => return Ok(resp),
    };

    let facade = service.get_facade(request);
    match bounded(service.deadline(), facade.delete_student(&caller, student_id)).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty(
            "Student deleted successfully",
        ))),
        Err(e) => Ok(failure("Delete student", e)),
    }
}
