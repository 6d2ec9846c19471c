use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CourseService;
use crate::models::courses::requests::{CourseListQuery, CourseQueryParams};
use crate::models::{ApiResponse, ErrorCode};

pub async fn list_courses(
    service: &CourseService,
    query: CourseQueryParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage
        .list_courses_with_pagination(CourseListQuery::from(query))
        .await
    {
        Ok(courses) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            courses,
            "Courses retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to list courses: {e}"),
            )),
        ),
    }
}
