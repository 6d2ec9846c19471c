use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 作业类型
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub enum AssignmentType {
    Written,
    Project,
    Quiz,
    Exam,
}

impl std::fmt::Display for AssignmentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AssignmentType::Written => "written",
            AssignmentType::Project => "project",
            AssignmentType::Quiz => "quiz",
            AssignmentType::Exam => "exam",
        };
        write!(f, "{name}")
    }
}

impl std::str::FromStr for AssignmentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "written" => Ok(AssignmentType::Written),
            "project" => Ok(AssignmentType::Project),
            "quiz" => Ok(AssignmentType::Quiz),
            "exam" => Ok(AssignmentType::Exam),
            _ => Err(format!("Invalid assignment type: {s}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct Assignment {
    // 唯一 ID
    pub id: i64,
    // 所属课程 ID
    pub course_id: i64,
    // 作业标题
    pub title: String,
    // 满分（原始分制）
    pub max_mark: f64,
    // 在课程总评中的权重，(0, 1]
    pub weight: f64,
    // 截止时间
    pub due_date: chrono::DateTime<chrono::Utc>,
    pub assignment_type: AssignmentType,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
