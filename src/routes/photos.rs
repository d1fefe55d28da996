use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::services::PhotoService;

// 懒加载的全局 PHOTO_SERVICE 实例
static PHOTO_SERVICE: Lazy<PhotoService> = Lazy::new(PhotoService::new_lazy);

pub async fn serve_photo(req: HttpRequest, key: web::Path<String>) -> ActixResult<HttpResponse> {
    PHOTO_SERVICE.serve(&req, key.into_inner()).await
}

// 配置路由；照片地址公开，可直接用于 <img>
pub fn configure_photo_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/api/v1/photos").route("/{key}", web::get().to(serve_photo)));
}
