use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::students::requests::{
    EnrollStudentRequest, RegisterStudentProfileRequest, StudentListParams,
};
use crate::models::users::entities::UserRole;
use crate::services::StudentService;

// 懒加载的全局 STUDENT_SERVICE 实例
static STUDENT_SERVICE: Lazy<StudentService> = Lazy::new(StudentService::new_lazy);

pub async fn list_students(
    req: HttpRequest,
    query: web::Query<StudentListParams>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.list_students(&req, query.into_inner()).await
}

pub async fn enroll_student(
    req: HttpRequest,
    student_data: web::Json<EnrollStudentRequest>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .enroll_student(&req, student_data.into_inner())
        .await
}

pub async fn register_self(
    req: HttpRequest,
    profile_data: web::Json<RegisterStudentProfileRequest>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .register_self(&req, profile_data.into_inner())
        .await
}

pub async fn own_summary(req: HttpRequest) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.summary(&req, None).await
}

pub async fn student_summary(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.summary(&req, Some(path.into_inner())).await
}

pub async fn upload_photo(
    req: HttpRequest,
    path: web::Path<i64>,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .upload_photo(&req, path.into_inner(), payload)
        .await
}

pub async fn delete_student(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .delete_student(&req, path.into_inner())
        .await
}

// 配置路由
pub fn configure_students_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/students")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles()))
                    .route(web::get().to(list_students))
                    .route(web::post().to(enroll_student)),
            )
            // `/me` 需在 `/{student_id}` 之前注册
            .route("/me", web::post().to(register_self))
            .route("/me/summary", web::get().to(own_summary))
            .route("/{student_id}/summary", web::get().to(student_summary))
            .service(
                web::resource("/{student_id}/photo")
                    .wrap(middlewares::RateLimit::photo_upload())
                    .route(web::post().to(upload_photo)),
            )
            .route(
                "/{student_id}",
                web::delete()
                    .to(delete_student)
                    .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
            ),
    );
}
