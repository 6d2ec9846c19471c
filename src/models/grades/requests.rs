use serde::Deserialize;
use ts_rs::TS;

/// 评分请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct GradeInputRequest {
    pub assignment_id: i64,
    pub participant_id: i64,
    pub raw_mark: f64,
    pub feedback: Option<String>,
    // 评分人，必须是 staff
    pub marker_id: i64,
}
