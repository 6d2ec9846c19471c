use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{ReportService, load_source, resolve_strategy, xlsx_attachment};
use crate::config::AppConfig;
use crate::grading::build_gradebook;
use crate::models::ApiResponse;
use crate::models::reports::requests::ReportQueryParams;
use crate::models::reports::responses::GradebookResponse;
use crate::report::{render_course_report, report_filename};

pub async fn get_gradebook(
    service: &ReportService,
    course_id: i64,
    query: ReportQueryParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let strategy = match resolve_strategy(&query) {
        Ok(strategy) => strategy,
        Err(resp) => return Ok(resp),
    };

    let storage = service.get_storage(request);
    let source = match load_source(&storage, course_id, None).await {
        Ok(source) => source,
        Err(resp) => return Ok(resp),
    };

    let gradebook = build_gradebook(&source, strategy.policy());
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        GradebookResponse::new(&gradebook, strategy.to_string()),
        "Gradebook retrieved successfully",
    )))
}

pub async fn export_gradebook(
    service: &ReportService,
    course_id: i64,
    query: ReportQueryParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let strategy = match resolve_strategy(&query) {
        Ok(strategy) => strategy,
        Err(resp) => return Ok(resp),
    };

    let storage = service.get_storage(request);
    let source = match load_source(&storage, course_id, None).await {
        Ok(source) => source,
        Err(resp) => return Ok(resp),
    };

    let gradebook = build_gradebook(&source, strategy.policy());
    let document = render_course_report(
        &gradebook,
        AppConfig::get().page_setup(),
        &strategy.to_string(),
    );
    info!(
        "Exporting gradebook for course {}: {} participants, {} pages",
        course_id,
        gradebook.rows.len(),
        document.pages.len()
    );

    let filename = report_filename(&[&gradebook.course_name]);
    xlsx_attachment(document, gradebook.course_name.clone(), filename).await
}
