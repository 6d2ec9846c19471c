use super::entities::Course;
use crate::models::PaginatedResponse;

pub type CourseListResponse = PaginatedResponse<Course>;
