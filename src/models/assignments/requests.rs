use chrono::{DateTime, Utc};
use serde::Deserialize;
use ts_rs::TS;

use super::entities::AssignmentType;

/// 创建作业请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct CreateAssignmentRequest {
    pub title: String,
    pub max_mark: f64,
    pub weight: f64,
    pub due_date: DateTime<Utc>, // ISO 8601 格式，如 "2026-01-24T12:00:00Z"
    pub assignment_type: AssignmentType,
}
