use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::SubmissionService;
use crate::models::{ApiResponse, ErrorCode, submissions::requests::SubmitWorkRequest};

pub async fn submit_work(
    service: &SubmissionService,
    assignment_id: i64,
    submission_data: SubmitWorkRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_assignment_by_id(assignment_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::AssignmentNotFound,
                "Assignment not found",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to get assignment: {e}"),
                )),
            );
        }
    }

    match storage.get_user_by_id(submission_data.participant_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::UserNotFound,
                "Participant not found",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to get participant: {e}"),
                )),
            );
        }
    }

    let participant_id = submission_data.participant_id;
    match storage.upsert_submission(assignment_id, submission_data).await {
        Ok((submission, true)) => {
            info!(
                "Participant {} submitted assignment {}",
                participant_id, assignment_id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(submission, "Work submitted")))
        }
        // 重新提交保留已有评分
        Ok((submission, false)) => {
            info!(
                "Participant {} resubmitted assignment {}",
                participant_id, assignment_id
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(submission, "Work resubmitted")))
        }
        Err(e) => {
            error!("Submission failed: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Submission failed: {e}"),
                )),
            )
        }
    }
}
