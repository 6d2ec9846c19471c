use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct Grade {
    pub id: i64,
    pub submission_id: i64,
    pub marker_id: i64,
    // 录入的原始分
    pub raw_mark: f64,
    // 百分制成绩
    pub final_mark: f64,
    pub has_passed: bool,
    pub feedback: Option<String>,
    pub graded_at: chrono::DateTime<chrono::Utc>,
}

/// 评分写入结果
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub enum GradeWriteOutcome {
    Created,
    Updated,
    /// 输入与已存储的评分一致，未写库
    Unchanged,
}
