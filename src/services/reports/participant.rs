use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{ReportService, load_source, resolve_strategy, xlsx_attachment};
use crate::config::AppConfig;
use crate::grading::{ParticipantRecord, build_participant_record};
use crate::models::reports::requests::ReportQueryParams;
use crate::models::reports::responses::ParticipantReportResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::report::{render_participant_report, report_filename};

// 读取参与者并构建个人成绩单，失败时返回对应的错误响应
async fn load_record(
    service: &ReportService,
    course_id: i64,
    participant_id: i64,
    query: &ReportQueryParams,
    request: &HttpRequest,
) -> Result<(ParticipantRecord, String), HttpResponse> {
    let strategy = resolve_strategy(query)?;
    let storage = service.get_storage(request);

    let participant = match storage.get_user_by_id(participant_id).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::UserNotFound,
                "Participant not found",
            )));
        }
        Err(e) => {
            return Err(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to get participant: {e}"),
                )),
            );
        }
    };

    let source = load_source(&storage, course_id, Some(participant_id)).await?;
    let record = build_participant_record(&source, &participant, strategy.policy());
    Ok((record, strategy.to_string()))
}

pub async fn get_participant_report(
    service: &ReportService,
    course_id: i64,
    participant_id: i64,
    query: ReportQueryParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    match load_record(service, course_id, participant_id, &query, request).await {
        Ok((record, aggregation)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ParticipantReportResponse::new(&record, aggregation),
            "Participant report retrieved successfully",
        ))),
        Err(resp) => Ok(resp),
    }
}

pub async fn export_participant_report(
    service: &ReportService,
    course_id: i64,
    participant_id: i64,
    query: ReportQueryParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (record, aggregation) =
        match load_record(service, course_id, participant_id, &query, request).await {
            Ok(loaded) => loaded,
            Err(resp) => return Ok(resp),
        };

    let document = render_participant_report(&record, AppConfig::get().page_setup(), &aggregation);
    info!(
        "Exporting report for participant {} in course {}: {} pages",
        participant_id,
        course_id,
        document.pages.len()
    );

    let filename = report_filename(&[&record.display_name, &record.course_name]);
    xlsx_attachment(document, record.display_name.clone(), filename).await
}
