use serde::Serialize;
use ts_rs::TS;

use crate::grading::{
    AssignmentStats, CourseMark, Gradebook, GradebookColumn, GradebookRow, ParticipantLine,
    ParticipantRecord, ReportStatus, round2, truncate_percent,
};

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct GradebookColumnResponse {
    pub assignment_id: i64,
    pub title: String,
    pub due_date: chrono::DateTime<chrono::Utc>,
    pub max_mark: f64,
    pub weight: f64,
}

impl From<&GradebookColumn> for GradebookColumnResponse {
    fn from(column: &GradebookColumn) -> Self {
        Self {
            assignment_id: column.assignment_id,
            title: column.title.clone(),
            due_date: column.due_date,
            max_mark: column.max_mark,
            weight: column.weight,
        }
    }
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct GradebookRowResponse {
    pub participant_id: i64,
    pub display_name: String,
    // 与 columns 一一对应："16/20"、"Submitted" 或 "-"
    pub cells: Vec<String>,
    pub final_grade: String,
    pub final_mark: Option<f64>,
    pub has_passed: Option<bool>,
}

impl From<&GradebookRow> for GradebookRowResponse {
    fn from(row: &GradebookRow) -> Self {
        Self {
            participant_id: row.participant_id,
            display_name: row.display_name.clone(),
            cells: row.cells.iter().map(|c| c.display()).collect(),
            final_grade: row.final_mark.display(),
            final_mark: row.final_mark.percent.map(truncate_percent),
            has_passed: row.final_mark.has_passed,
        }
    }
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct AssignmentStatsResponse {
    pub assignment_id: i64,
    pub title: String,
    pub submitted_count: i64,
    pub graded_count: i64,
    pub average: Option<f64>,
    pub max: Option<f64>,
    pub min: Option<f64>,
}

impl From<&AssignmentStats> for AssignmentStatsResponse {
    fn from(stats: &AssignmentStats) -> Self {
        Self {
            assignment_id: stats.assignment_id,
            title: stats.title.clone(),
            submitted_count: stats.submitted_count as i64,
            graded_count: stats.graded_count as i64,
            average: stats.average.map(round2),
            max: stats.max,
            min: stats.min,
        }
    }
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct GradebookResponse {
    pub course_id: i64,
    pub course_name: String,
    pub aggregation: String,
    pub columns: Vec<GradebookColumnResponse>,
    pub rows: Vec<GradebookRowResponse>,
    pub stats: Vec<AssignmentStatsResponse>,
}

impl GradebookResponse {
    pub fn new(gradebook: &Gradebook, aggregation: impl Into<String>) -> Self {
        Self {
            course_id: gradebook.course_id,
            course_name: gradebook.course_name.clone(),
            aggregation: aggregation.into(),
            columns: gradebook.columns.iter().map(Into::into).collect(),
            rows: gradebook.rows.iter().map(Into::into).collect(),
            stats: gradebook.stats.iter().map(Into::into).collect(),
        }
    }
}

/// 个人成绩单中的作业状态
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub enum ReportLineStatus {
    NotSubmitted,
    SubmittedNotGraded,
    Pass,
    Fail,
}

impl From<ReportStatus> for ReportLineStatus {
    fn from(status: ReportStatus) -> Self {
        match status {
            ReportStatus::NotSubmitted => ReportLineStatus::NotSubmitted,
            ReportStatus::SubmittedNotGraded => ReportLineStatus::SubmittedNotGraded,
            ReportStatus::Pass => ReportLineStatus::Pass,
            ReportStatus::Fail => ReportLineStatus::Fail,
        }
    }
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct ParticipantLineResponse {
    pub assignment_id: i64,
    pub title: String,
    pub due_date: chrono::DateTime<chrono::Utc>,
    pub max_mark: f64,
    pub weight: f64,
    pub mark: String,
    pub raw_mark: Option<f64>,
    pub final_mark: Option<f64>,
    pub status: ReportLineStatus,
    pub feedback: Option<String>,
}

impl From<&ParticipantLine> for ParticipantLineResponse {
    fn from(line: &ParticipantLine) -> Self {
        Self {
            assignment_id: line.assignment_id,
            title: line.title.clone(),
            due_date: line.due_date,
            max_mark: line.max_mark,
            weight: line.weight,
            mark: line.mark_display(),
            raw_mark: line.raw_mark,
            final_mark: line.final_mark.map(truncate_percent),
            status: line.status.into(),
            feedback: line.feedback.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct FinalMarkResponse {
    pub display: String,
    pub percent: Option<f64>,
    pub has_passed: Option<bool>,
    pub graded_count: i64,
}

impl From<&CourseMark> for FinalMarkResponse {
    fn from(mark: &CourseMark) -> Self {
        Self {
            display: mark.display(),
            percent: mark.percent.map(truncate_percent),
            has_passed: mark.has_passed,
            graded_count: mark.graded_count as i64,
        }
    }
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct ParticipantReportResponse {
    pub course_id: i64,
    pub course_name: String,
    pub participant_id: i64,
    pub display_name: String,
    pub aggregation: String,
    pub submitted_count: i64,
    pub lines: Vec<ParticipantLineResponse>,
    pub final_mark: FinalMarkResponse,
}

impl ParticipantReportResponse {
    pub fn new(record: &ParticipantRecord, aggregation: impl Into<String>) -> Self {
        Self {
            course_id: record.course_id,
            course_name: record.course_name.clone(),
            participant_id: record.participant_id,
            display_name: record.display_name.clone(),
            aggregation: aggregation.into(),
            submitted_count: record.submitted_count as i64,
            lines: record.lines.iter().map(Into::into).collect(),
            final_mark: (&record.final_mark).into(),
        }
    }
}
