pub mod aggregate;
pub mod ledger;

pub use aggregate::cumulative;
pub use ledger::record_term;

use actix_web::{HttpResponse, Result as ActixResult};

use crate::models::ApiResponse;
use crate::models::grades::entities::RawGrades;

pub struct GradeService;

impl GradeService {
    pub fn new_lazy() -> Self {
        Self
    }

    // 计算累计成绩，不读写存储
    pub async fn cumulative(&self, raw: RawGrades) -> ActixResult<HttpResponse> {
        Ok(HttpResponse::Ok().json(ApiResponse::success(
            cumulative(&raw),
            "Cumulative grade computed",
        )))
    }
}
