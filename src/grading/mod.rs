//! 成绩计算与汇总
//!
//! 纯计算层，不依赖存储和 HTTP：
//! - `calculator`: 单次作业的百分制换算与及格判定
//! - `aggregator`: 按作业权重汇总课程总评（策略可替换）
//! - `gradebook`: 构建 参与者 × 作业 成绩矩阵与个人成绩单

pub mod aggregator;
pub mod calculator;
pub mod gradebook;

pub use aggregator::{
    AggregationPolicy, AggregationStrategy, CourseMark, FullSyllabus, GradedSubset, WeightedMark,
};
pub use calculator::{
    GradeRecord, MarkOutcome, PASS_THRESHOLD, grade_submission, is_passing, normalize_mark,
};
pub use gradebook::{
    AssignmentStats, CellStatus, Gradebook, GradebookColumn, GradebookRow, GradebookSource,
    ParticipantLine, ParticipantRecord, ReportStatus, build_gradebook, build_participant_record,
};

/// 保留两位小数
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// 分数显示，如 `80`、`72.5`
pub fn format_mark(value: f64) -> String {
    format!("{}", round2(value))
}

/// 百分比保留两位小数并向零截断
///
/// 先吸收浮点误差再截断，显示值与及格判定使用同一个数，
/// 49.999 显示为 `49.99%` 而不是 `50%`。
pub fn truncate_percent(value: f64) -> f64 {
    ((value * 100.0) + 1e-7).trunc() / 100.0
}

/// 百分比显示，如 `72%`
pub fn format_percent(value: f64) -> String {
    format!("{}%", truncate_percent(value))
}
