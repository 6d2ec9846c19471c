use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::AssignmentService;
use crate::models::{ApiResponse, ErrorCode, assignments::requests::CreateAssignmentRequest};
use crate::utils::validate::validate_assignment;

pub async fn create_assignment(
    service: &AssignmentService,
    course_id: i64,
    assignment_data: CreateAssignmentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_course_by_id(course_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::CourseNotFound,
                "Course not found",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to get course: {e}"),
                )),
            );
        }
    }

    // 满分为 0 会导致换算除零，在这里拒绝
    let errors = validate_assignment(&assignment_data);
    if !errors.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::validation_failed(errors)));
    }

    match storage.create_assignment(course_id, assignment_data).await {
        Ok(assignment) => {
            info!(
                "Assignment {} created in course {} (max_mark={}, weight={})",
                assignment.id, course_id, assignment.max_mark, assignment.weight
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(assignment, "Assignment created")))
        }
        Err(e) => {
            error!("Assignment creation failed: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Assignment creation failed: {e}"),
                )),
            )
        }
    }
}
