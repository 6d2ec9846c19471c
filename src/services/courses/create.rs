use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::CourseService;
use crate::models::{ApiResponse, ErrorCode, courses::requests::CreateCourseRequest};
use crate::utils::validate::validate_course;

pub async fn create_course(
    service: &CourseService,
    course_data: CreateCourseRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let errors = validate_course(&course_data);
    if !errors.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::validation_failed(errors)));
    }

    let storage = service.get_storage(request);

    // 课程名唯一
    match storage.get_course_by_name(&course_data.name).await {
        Ok(Some(_)) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::CourseAlreadyExists,
                "Course name already exists",
            )));
        }
        Ok(None) => {}
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to check course name: {e}"),
                )),
            );
        }
    }

    match storage.create_course(course_data).await {
        Ok(course) => {
            info!("Course {} ({}) created", course.id, course.name);
            Ok(HttpResponse::Created().json(ApiResponse::success(course, "Course created")))
        }
        Err(e) => {
            error!("Course creation failed: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Course creation failed: {e}"),
                )),
            )
        }
    }
}
