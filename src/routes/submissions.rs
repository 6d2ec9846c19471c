use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::services::SubmissionService;
use crate::utils::SafeIDI64;

static SUBMISSION_SERVICE: Lazy<SubmissionService> = Lazy::new(SubmissionService::new_lazy);

pub async fn get_submission_grade(
    req: HttpRequest,
    submission_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .get_submission_grade(submission_id.0, &req)
        .await
}

pub fn configure_submission_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/submissions").route("/{id}/grade", web::get().to(get_submission_grade)),
    );
}
