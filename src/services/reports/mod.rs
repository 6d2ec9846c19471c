//! 成绩报表服务
//!
//! 同一份成绩数据有两种输出：JSON（前端展示）与 XLSX 文档（下载）。

pub mod gradebook;
pub mod participant;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;
use tracing::error;

use crate::config::AppConfig;
use crate::grading::{AggregationStrategy, GradebookSource};
use crate::models::reports::requests::ReportQueryParams;
use crate::models::{ApiResponse, ErrorCode, FieldError};
use crate::report::{Document, XLSX_CONTENT_TYPE, write_xlsx};
use crate::storage::Storage;

pub struct ReportService {
    storage: Option<Arc<dyn Storage>>,
}

impl ReportService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        match &self.storage {
            Some(storage) => storage.clone(),
            None => super::storage_from_request(request),
        }
    }

    pub async fn get_gradebook(
        &self,
        course_id: i64,
        query: ReportQueryParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        gradebook::get_gradebook(self, course_id, query, request).await
    }

    pub async fn export_gradebook(
        &self,
        course_id: i64,
        query: ReportQueryParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        gradebook::export_gradebook(self, course_id, query, request).await
    }

    pub async fn get_participant_report(
        &self,
        course_id: i64,
        participant_id: i64,
        query: ReportQueryParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        participant::get_participant_report(self, course_id, participant_id, query, request).await
    }

    pub async fn export_participant_report(
        &self,
        course_id: i64,
        participant_id: i64,
        query: ReportQueryParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        participant::export_participant_report(self, course_id, participant_id, query, request)
            .await
    }
}

/// 请求参数优先，其次使用配置中的汇总策略
pub(crate) fn resolve_strategy(
    query: &ReportQueryParams,
) -> Result<AggregationStrategy, HttpResponse> {
    match query.aggregation.as_deref() {
        None | Some("") => Ok(AppConfig::get().aggregation_strategy()),
        Some(value) => value.parse::<AggregationStrategy>().map_err(|msg| {
            HttpResponse::BadRequest().json(ApiResponse::validation_failed(vec![FieldError::new(
                "aggregation",
                msg,
            )]))
        }),
    }
}

/// 读取成绩数据，课程不存在时返回 404
pub(crate) async fn load_source(
    storage: &Arc<dyn Storage>,
    course_id: i64,
    participant_id: Option<i64>,
) -> Result<GradebookSource, HttpResponse> {
    match storage.load_gradebook_source(course_id, participant_id).await {
        Ok(Some(source)) => Ok(source),
        Ok(None) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::CourseNotFound,
            "Course not found",
        ))),
        Err(e) => {
            error!("Failed to load gradebook for course {}: {}", course_id, e);
            Err(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to load gradebook: {e}"),
                )),
            )
        }
    }
}

/// 在阻塞线程池中生成 XLSX 并包装为下载响应
pub(crate) async fn xlsx_attachment(
    document: Document,
    sheet: String,
    filename: String,
) -> ActixResult<HttpResponse> {
    let rendered = web::block(move || write_xlsx(&document, &sheet)).await;

    match rendered {
        Ok(Ok(bytes)) => Ok(HttpResponse::Ok()
            .content_type(XLSX_CONTENT_TYPE)
            .insert_header((
                "Content-Disposition",
                format!("attachment; filename=\"{filename}\""),
            ))
            .body(bytes)),
        Ok(Err(e)) => {
            error!("Report generation failed: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::ReportGenerationFailed,
                    format!("Report generation failed: {e}"),
                )),
            )
        }
        Err(e) => {
            error!("Report worker failed: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::ReportGenerationFailed,
                    "Report generation failed",
                )),
            )
        }
    }
}
