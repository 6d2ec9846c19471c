use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::models::assignments::requests::CreateAssignmentRequest;
use crate::models::courses::requests::{CourseQueryParams, CreateCourseRequest};
use crate::models::reports::requests::ReportQueryParams;
use crate::services::{AssignmentService, CourseService, ReportService};
use crate::utils::{SafeCourseIdI64, SafeParticipantIdI64};

static COURSE_SERVICE: Lazy<CourseService> = Lazy::new(CourseService::new_lazy);
static ASSIGNMENT_SERVICE: Lazy<AssignmentService> = Lazy::new(AssignmentService::new_lazy);
static REPORT_SERVICE: Lazy<ReportService> = Lazy::new(ReportService::new_lazy);

// 课程
pub async fn list_courses(
    req: HttpRequest,
    query: web::Query<CourseQueryParams>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.list_courses(query.into_inner(), &req).await
}

pub async fn create_course(
    req: HttpRequest,
    course_data: web::Json<CreateCourseRequest>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .create_course(course_data.into_inner(), &req)
        .await
}

pub async fn get_course(req: HttpRequest, course_id: SafeCourseIdI64) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.get_course(course_id.0, &req).await
}

// 课程下的作业
pub async fn list_assignments(
    req: HttpRequest,
    course_id: SafeCourseIdI64,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE.list_assignments(course_id.0, &req).await
}

pub async fn create_assignment(
    req: HttpRequest,
    course_id: SafeCourseIdI64,
    assignment_data: web::Json<CreateAssignmentRequest>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .create_assignment(course_id.0, assignment_data.into_inner(), &req)
        .await
}

// 成绩报表
pub async fn get_gradebook(
    req: HttpRequest,
    course_id: SafeCourseIdI64,
    query: web::Query<ReportQueryParams>,
) -> ActixResult<HttpResponse> {
    REPORT_SERVICE
        .get_gradebook(course_id.0, query.into_inner(), &req)
        .await
}

pub async fn export_gradebook(
    req: HttpRequest,
    course_id: SafeCourseIdI64,
    query: web::Query<ReportQueryParams>,
) -> ActixResult<HttpResponse> {
    REPORT_SERVICE
        .export_gradebook(course_id.0, query.into_inner(), &req)
        .await
}

pub async fn get_participant_report(
    req: HttpRequest,
    course_id: SafeCourseIdI64,
    participant_id: SafeParticipantIdI64,
    query: web::Query<ReportQueryParams>,
) -> ActixResult<HttpResponse> {
    REPORT_SERVICE
        .get_participant_report(course_id.0, participant_id.0, query.into_inner(), &req)
        .await
}

pub async fn export_participant_report(
    req: HttpRequest,
    course_id: SafeCourseIdI64,
    participant_id: SafeParticipantIdI64,
    query: web::Query<ReportQueryParams>,
) -> ActixResult<HttpResponse> {
    REPORT_SERVICE
        .export_participant_report(course_id.0, participant_id.0, query.into_inner(), &req)
        .await
}

// 配置路由
pub fn configure_course_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/courses")
            .route("", web::get().to(list_courses))
            .route("", web::post().to(create_course))
            .route("/{course_id}", web::get().to(get_course))
            .route("/{course_id}/assignments", web::get().to(list_assignments))
            .route("/{course_id}/assignments", web::post().to(create_assignment))
            .route("/{course_id}/gradebook", web::get().to(get_gradebook))
            .route(
                "/{course_id}/gradebook/export",
                web::get().to(export_gradebook),
            )
            .route(
                "/{course_id}/participants/{participant_id}/report",
                web::get().to(get_participant_report),
            )
            .route(
                "/{course_id}/participants/{participant_id}/report/export",
                web::get().to(export_participant_report),
            ),
    );
}
