use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::models::grades::requests::GradeInputRequest;
use crate::services::GradeService;

static GRADE_SERVICE: Lazy<GradeService> = Lazy::new(GradeService::new_lazy);

pub async fn upsert_grade(
    req: HttpRequest,
    grade_data: web::Json<GradeInputRequest>,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE.upsert_grade(grade_data.into_inner(), &req).await
}

pub fn configure_grade_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/api/v1/grades").route("", web::post().to(upsert_grade)));
}
