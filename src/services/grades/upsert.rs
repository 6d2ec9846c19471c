use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::Utc;
use tracing::{error, info, warn};

use super::GradeService;
use crate::grading::grade_submission;
use crate::models::grades::entities::GradeWriteOutcome;
use crate::models::grades::requests::GradeInputRequest;
use crate::models::grades::responses::GradeWriteResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::validate::validate_grade_input;

pub async fn upsert_grade(
    service: &GradeService,
    grade_data: GradeInputRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let assignment = match storage.get_assignment_by_id(grade_data.assignment_id).await {
        Ok(Some(assignment)) => assignment,
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
    };

    // 只有 staff 可以评分
    match storage.get_user_by_id(grade_data.marker_id).await {
        Ok(Some(marker)) if marker.role.can_grade() => {}
        Ok(Some(marker)) => {
            warn!(
                "User {} ({}) attempted to grade without staff role",
                marker.id, marker.username
            );
            return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::MarkerNotAllowed,
                "Only staff can grade submissions",
            )));
        }
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::UserNotFound,
                "Marker not found",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to get marker: {e}"),
                )),
            );
        }
    }

    let errors = validate_grade_input(&grade_data, assignment.max_mark);
    if !errors.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::validation_failed(errors)));
    }

    let submission = match storage
        .get_submission_by_assignment_and_participant(
            grade_data.assignment_id,
            grade_data.participant_id,
        )
        .await
    {
        Ok(Some(submission)) => submission,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::SubmissionNotFound,
                "Participant has not submitted this assignment",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to get submission: {e}"),
                )),
            );
        }
    };

    let record = match grade_submission(
        grade_data.raw_mark,
        assignment.max_mark,
        grade_data.feedback,
        grade_data.marker_id,
        Utc::now(),
    ) {
        Ok(record) => record,
        Err(e) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::ValidationFailed,
                e.message(),
            )));
        }
    };

    match storage.upsert_grade(submission.id, record).await {
        Ok((grade, outcome)) => {
            info!(
                "Submission {} graded by {}: {}/{} -> {:.2}% ({:?})",
                submission.id,
                grade.marker_id,
                grade.raw_mark,
                assignment.max_mark,
                grade.final_mark,
                outcome
            );
            let (mut builder, message) = match outcome {
                GradeWriteOutcome::Created => (HttpResponse::Created(), "Grade recorded"),
                GradeWriteOutcome::Updated => (HttpResponse::Ok(), "Grade updated"),
                GradeWriteOutcome::Unchanged => (HttpResponse::Ok(), "Grade unchanged"),
            };
            Ok(builder.json(ApiResponse::success(
                GradeWriteResponse { grade, outcome },
                message,
            )))
        }
        Err(e) => {
            error!("Grade write failed for submission {}: {}", submission.id, e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Grade write failed: {e}"),
                )),
            )
        }
    }
}
