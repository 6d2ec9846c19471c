use serde::Deserialize;
use ts_rs::TS;

/// 提交（或重新提交）作业
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SubmitWorkRequest {
    pub participant_id: i64,
    pub content: Option<String>,
}
