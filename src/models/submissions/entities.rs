use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 作业提交，每个参与者在每个作业下只有一份
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct Submission {
    pub id: i64,
    pub assignment_id: i64,
    pub participant_id: i64,
    pub content: Option<String>,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
}
