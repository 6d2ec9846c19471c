use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::models::submissions::requests::SubmitWorkRequest;
use crate::services::SubmissionService;
use crate::utils::SafeIDI64;

static SUBMISSION_SERVICE: Lazy<SubmissionService> = Lazy::new(SubmissionService::new_lazy);

// 同一参与者重复提交会覆盖上一次的内容
pub async fn submit_work(
    req: HttpRequest,
    assignment_id: SafeIDI64,
    submission_data: web::Json<SubmitWorkRequest>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .submit_work(assignment_id.0, submission_data.into_inner(), &req)
        .await
}

pub fn configure_assignment_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/assignments").route("/{id}/submissions", web::put().to(submit_work)),
    );
}
