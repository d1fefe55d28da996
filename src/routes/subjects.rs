use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::attendance::requests::{AttendanceDateQuery, RecordDayRequest};
use crate::models::grades::requests::RecordTermRequest;
use crate::models::subjects::requests::CreateSubjectRequest;
use crate::models::users::entities::UserRole;
use crate::services::SubjectService;

// 懒加载的全局 SUBJECT_SERVICE 实例
static SUBJECT_SERVICE: Lazy<SubjectService> = Lazy::new(SubjectService::new_lazy);

pub async fn list_subjects(req: HttpRequest) -> ActixResult<HttpResponse> {
    SUBJECT_SERVICE.list_subjects(&req).await
}

pub async fn create_subject(
    req: HttpRequest,
    subject_data: web::Json<CreateSubjectRequest>,
) -> ActixResult<HttpResponse> {
    SUBJECT_SERVICE
        .create_subject(&req, subject_data.into_inner())
        .await
}

pub async fn delete_subject(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    SUBJECT_SERVICE
        .delete_subject(&req, path.into_inner())
        .await
}

pub async fn roster_grades(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    SUBJECT_SERVICE.roster_grades(&req, path.into_inner()).await
}

pub async fn record_term(
    req: HttpRequest,
    path: web::Path<i64>,
    grade_data: web::Json<RecordTermRequest>,
) -> ActixResult<HttpResponse> {
    SUBJECT_SERVICE
        .record_term(&req, path.into_inner(), grade_data.into_inner())
        .await
}

pub async fn roster_attendance(
    req: HttpRequest,
    path: web::Path<i64>,
    query: web::Query<AttendanceDateQuery>,
) -> ActixResult<HttpResponse> {
    SUBJECT_SERVICE
        .roster_attendance(&req, path.into_inner(), query.into_inner())
        .await
}

pub async fn record_day(
    req: HttpRequest,
    path: web::Path<i64>,
    attendance_data: web::Json<RecordDayRequest>,
) -> ActixResult<HttpResponse> {
    SUBJECT_SERVICE
        .record_day(&req, path.into_inner(), attendance_data.into_inner())
        .await
}

// 配置路由
pub fn configure_subjects_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/subjects")
            .wrap(middlewares::RequireJWT)
            .service(
                // 所有已登录用户可查看科目，只有教师可以创建
                web::resource("").route(web::get().to(list_subjects)).route(
                    web::post()
                        .to(create_subject)
                        .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                ),
            )
            .service(
                web::scope("/{subject_id}")
                    .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles()))
                    .route("", web::delete().to(delete_subject))
                    .route("/grades", web::get().to(roster_grades))
                    .route("/grades", web::put().to(record_term))
                    .route("/attendance", web::get().to(roster_attendance))
                    .route("/attendance", web::put().to(record_day)),
            ),
    );
}
