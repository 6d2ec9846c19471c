use serde::Serialize;
use ts_rs::TS;

use super::entities::{Grade, GradeWriteOutcome};

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct GradeWriteResponse {
    pub grade: Grade,
    pub outcome: GradeWriteOutcome,
}
