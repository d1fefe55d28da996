pub mod download;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::storage::ObjectStore;

pub struct PhotoService {
    objects: Option<Arc<dyn ObjectStore>>,
}

impl PhotoService {
    pub fn new_lazy() -> Self {
        Self { objects: None }
    }

    pub(crate) fn get_objects(&self, request: &HttpRequest) -> Arc<dyn ObjectStore> {
        if let Some(objects) = &self.objects {
            objects.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn ObjectStore>>>()
                .expect("Object store not found in app data")
                .get_ref()
                .clone()
        }
    }

    // 读取学生照片
    pub async fn serve(&self, request: &HttpRequest, key: String) -> ActixResult<HttpResponse> {
        download::handle_download(self, request, key).await
    }
}
