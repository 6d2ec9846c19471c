//! 成绩矩阵构建
//!
//! 输入是存储层一次性读出的课程数据（[`GradebookSource`]），
//! 输出 参与者 × 作业 矩阵、每个作业的统计，以及单个参与者的成绩单。

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use super::aggregator::{AggregationPolicy, CourseMark, WeightedMark};
use super::calculator::normalize_mark;
use super::format_mark;
use crate::models::assignments::entities::Assignment;
use crate::models::courses::entities::Course;
use crate::models::grades::entities::Grade;
use crate::models::submissions::entities::Submission;
use crate::models::users::entities::User;

/// 报表所需的全部行，由存储层的读模型填充
#[derive(Debug, Clone)]
pub struct GradebookSource {
    pub course: Course,
    pub assignments: Vec<Assignment>,
    pub participants: Vec<User>,
    pub submissions: Vec<Submission>,
    pub grades: Vec<Grade>,
}

/// 单元格状态
#[derive(Debug, Clone, PartialEq)]
pub enum CellStatus {
    /// 未提交
    NotSubmitted,
    /// 已提交待批改
    Submitted,
    /// 已评分
    Graded {
        raw_mark: f64,
        max_mark: f64,
        final_mark: f64,
        has_passed: bool,
    },
}

impl CellStatus {
    /// 矩阵中的显示文本
    pub fn display(&self) -> String {
        match self {
            CellStatus::NotSubmitted => "-".to_string(),
            CellStatus::Submitted => "Submitted".to_string(),
            CellStatus::Graded {
                raw_mark, max_mark, ..
            } => format!("{}/{}", format_mark(*raw_mark), format_mark(*max_mark)),
        }
    }
}

/// 矩阵列（作业）
#[derive(Debug, Clone, PartialEq)]
pub struct GradebookColumn {
    pub assignment_id: i64,
    pub title: String,
    pub due_date: DateTime<Utc>,
    pub max_mark: f64,
    pub weight: f64,
}

/// 矩阵行（参与者）
#[derive(Debug, Clone, PartialEq)]
pub struct GradebookRow {
    pub participant_id: i64,
    pub display_name: String,
    pub cells: Vec<CellStatus>,
    pub final_mark: CourseMark,
}

/// 作业统计，只统计已评分提交的原始分
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentStats {
    pub assignment_id: i64,
    pub title: String,
    pub due_date: DateTime<Utc>,
    pub submitted_count: usize,
    pub graded_count: usize,
    pub average: Option<f64>,
    pub max: Option<f64>,
    pub min: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Gradebook {
    pub course_id: i64,
    pub course_name: String,
    pub columns: Vec<GradebookColumn>,
    pub rows: Vec<GradebookRow>,
    pub stats: Vec<AssignmentStats>,
}

impl Gradebook {
    pub const FINAL_GRADE_TITLE: &'static str = "Final Grade";

    /// 有总评且及格的人数
    pub fn passing_count(&self) -> usize {
        self.rows
            .iter()
            .filter(|r| r.final_mark.has_passed == Some(true))
            .count()
    }

    /// 已有总评的参与者的平均总评
    pub fn class_average(&self) -> Option<f64> {
        let marks: Vec<f64> = self
            .rows
            .iter()
            .filter_map(|r| r.final_mark.percent)
            .collect();
        if marks.is_empty() {
            None
        } else {
            Some(marks.iter().sum::<f64>() / marks.len() as f64)
        }
    }
}

/// 个人成绩单中的作业状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportStatus {
    NotSubmitted,
    SubmittedNotGraded,
    Pass,
    Fail,
}

impl ReportStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ReportStatus::NotSubmitted => "Not Submitted",
            ReportStatus::SubmittedNotGraded => "Submitted - Not Graded",
            ReportStatus::Pass => "Pass",
            ReportStatus::Fail => "Fail",
        }
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParticipantLine {
    pub assignment_id: i64,
    pub title: String,
    pub due_date: DateTime<Utc>,
    pub max_mark: f64,
    pub weight: f64,
    pub status: ReportStatus,
    pub raw_mark: Option<f64>,
    pub final_mark: Option<f64>,
    pub feedback: Option<String>,
}

impl ParticipantLine {
    /// 成绩显示，如 `16/20`，无成绩为 `-`
    pub fn mark_display(&self) -> String {
        match self.raw_mark {
            Some(raw) => format!("{}/{}", format_mark(raw), format_mark(self.max_mark)),
            None => "-".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParticipantRecord {
    pub course_id: i64,
    pub course_name: String,
    pub participant_id: i64,
    pub display_name: String,
    pub lines: Vec<ParticipantLine>,
    pub submitted_count: usize,
    pub final_mark: CourseMark,
}

// 预先建立 (作业, 参与者) -> (提交, 评分) 索引
struct SubmissionIndex<'a> {
    by_key: HashMap<(i64, i64), (&'a Submission, Option<&'a Grade>)>,
}

impl<'a> SubmissionIndex<'a> {
    fn new(source: &'a GradebookSource) -> Self {
        let grades: HashMap<i64, &Grade> = source
            .grades
            .iter()
            .map(|g| (g.submission_id, g))
            .collect();

        let by_key = source
            .submissions
            .iter()
            .map(|s| {
                (
                    (s.assignment_id, s.participant_id),
                    (s, grades.get(&s.id).copied()),
                )
            })
            .collect();

        Self { by_key }
    }

    fn lookup(
        &self,
        assignment_id: i64,
        participant_id: i64,
    ) -> Option<(&'a Submission, Option<&'a Grade>)> {
        self.by_key.get(&(assignment_id, participant_id)).copied()
    }

    fn has_any(&self, participant_id: i64) -> bool {
        self.by_key.keys().any(|(_, p)| *p == participant_id)
    }
}

// 作业按截止时间升序，时间相同按 ID
fn ordered_assignments(source: &GradebookSource) -> Vec<&Assignment> {
    let mut assignments: Vec<&Assignment> = source.assignments.iter().collect();
    assignments.sort_by(|a, b| a.due_date.cmp(&b.due_date).then(a.id.cmp(&b.id)));
    assignments
}

// 以当前满分重新换算；满分非法时退回存储的百分制成绩
fn current_final_mark(grade: &Grade, assignment: &Assignment) -> f64 {
    normalize_mark(grade.raw_mark, assignment.max_mark)
        .map(|o| o.final_mark)
        .unwrap_or(grade.final_mark)
}

fn cell_for(assignment: &Assignment, entry: Option<(&Submission, Option<&Grade>)>) -> CellStatus {
    match entry {
        Some((_, Some(grade))) => {
            let final_mark = current_final_mark(grade, assignment);
            CellStatus::Graded {
                raw_mark: grade.raw_mark,
                max_mark: assignment.max_mark,
                final_mark,
                has_passed: super::calculator::is_passing(final_mark),
            }
        }
        Some((_, None)) => CellStatus::Submitted,
        None => CellStatus::NotSubmitted,
    }
}

fn weighted_mark(assignment: &Assignment, cell: &CellStatus) -> WeightedMark {
    match cell {
        CellStatus::Graded { final_mark, .. } => {
            WeightedMark::graded(*final_mark, assignment.weight)
        }
        _ => WeightedMark::ungraded(assignment.weight),
    }
}

fn assignment_stats(
    assignment: &Assignment,
    source: &GradebookSource,
    index: &SubmissionIndex<'_>,
) -> AssignmentStats {
    let mut submitted_count = 0usize;
    let mut marks: Vec<f64> = Vec::new();

    for participant in &source.participants {
        if let Some((_, grade)) = index.lookup(assignment.id, participant.id) {
            submitted_count += 1;
            if let Some(grade) = grade {
                marks.push(grade.raw_mark);
            }
        }
    }

    let (average, max, min) = if marks.is_empty() {
        (None, None, None)
    } else {
        let sum: f64 = marks.iter().sum();
        (
            Some(sum / marks.len() as f64),
            Some(marks.iter().cloned().fold(f64::NEG_INFINITY, f64::max)),
            Some(marks.iter().cloned().fold(f64::INFINITY, f64::min)),
        )
    };

    AssignmentStats {
        assignment_id: assignment.id,
        title: assignment.title.clone(),
        due_date: assignment.due_date,
        submitted_count,
        graded_count: marks.len(),
        average,
        max,
        min,
    }
}

/// 构建课程成绩矩阵
///
/// 行只包含至少有一份提交的参与者，按显示名升序；
/// 列为按截止时间排序的作业，最后一列为总评。
pub fn build_gradebook(source: &GradebookSource, policy: &dyn AggregationPolicy) -> Gradebook {
    let index = SubmissionIndex::new(source);
    let assignments = ordered_assignments(source);

    let columns = assignments
        .iter()
        .map(|a| GradebookColumn {
            assignment_id: a.id,
            title: a.title.clone(),
            due_date: a.due_date,
            max_mark: a.max_mark,
            weight: a.weight,
        })
        .collect();

    let mut participants: Vec<&User> = source
        .participants
        .iter()
        .filter(|p| index.has_any(p.id))
        .collect();
    participants.sort_by(|a, b| {
        a.display_name
            .cmp(&b.display_name)
            .then(a.id.cmp(&b.id))
    });

    let rows = participants
        .into_iter()
        .map(|participant| {
            let cells: Vec<CellStatus> = assignments
                .iter()
                .map(|a| cell_for(a, index.lookup(a.id, participant.id)))
                .collect();
            let entries: Vec<WeightedMark> = assignments
                .iter()
                .zip(&cells)
                .map(|(a, cell)| weighted_mark(a, cell))
                .collect();

            GradebookRow {
                participant_id: participant.id,
                display_name: participant.display_name.clone(),
                final_mark: CourseMark::compute(&entries, policy),
                cells,
            }
        })
        .collect();

    let stats = assignments
        .iter()
        .map(|a| assignment_stats(a, source, &index))
        .collect();

    Gradebook {
        course_id: source.course.id,
        course_name: source.course.name.clone(),
        columns,
        rows,
        stats,
    }
}

/// 构建单个参与者的成绩单，包含全部作业（含未提交）
pub fn build_participant_record(
    source: &GradebookSource,
    participant: &User,
    policy: &dyn AggregationPolicy,
) -> ParticipantRecord {
    let index = SubmissionIndex::new(source);
    let assignments = ordered_assignments(source);

    let mut entries = Vec::with_capacity(assignments.len());
    let mut submitted_count = 0usize;

    let lines = assignments
        .iter()
        .map(|assignment| {
            let entry = index.lookup(assignment.id, participant.id);
            let cell = cell_for(assignment, entry);
            entries.push(weighted_mark(assignment, &cell));
            if entry.is_some() {
                submitted_count += 1;
            }

            let (status, raw_mark, final_mark) = match &cell {
                CellStatus::NotSubmitted => (ReportStatus::NotSubmitted, None, None),
                CellStatus::Submitted => (ReportStatus::SubmittedNotGraded, None, None),
                CellStatus::Graded {
                    raw_mark,
                    final_mark,
                    has_passed,
                    ..
                } => {
                    let status = if *has_passed {
                        ReportStatus::Pass
                    } else {
                        ReportStatus::Fail
                    };
                    (status, Some(*raw_mark), Some(*final_mark))
                }
            };

            ParticipantLine {
                assignment_id: assignment.id,
                title: assignment.title.clone(),
                due_date: assignment.due_date,
                max_mark: assignment.max_mark,
                weight: assignment.weight,
                status,
                raw_mark,
                final_mark,
                feedback: entry.and_then(|(_, g)| g).and_then(|g| g.feedback.clone()),
            }
        })
        .collect();

    ParticipantRecord {
        course_id: source.course.id,
        course_name: source.course.name.clone(),
        participant_id: participant.id,
        display_name: participant.display_name.clone(),
        lines,
        submitted_count,
        final_mark: CourseMark::compute(&entries, policy),
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use crate::grading::aggregator::GradedSubset;

    // 三个作业（故意乱序）、三个学生：
    // Bob 两份已评分 + 一份未提交；Alice 一份待批改；Carol 无提交
    fn sample_source() -> GradebookSource {
        GradebookSource {
            course: course(1, "Rust 101"),
            assignments: vec![
                assignment(3, "Final Project", 100.0, 0.5, 20),
                assignment(1, "Essay", 10.0, 0.3, 5),
                assignment(2, "Quiz", 50.0, 0.2, 10),
            ],
            participants: vec![student(11, "Bob"), student(12, "Alice"), student(13, "Carol")],
            submissions: vec![
                submission(100, 1, 11),
                submission(101, 2, 11),
                submission(102, 2, 12),
            ],
            grades: vec![grade(100, 8.0, 80.0), grade(101, 30.0, 60.0)],
        }
    }

    #[test]
    fn test_columns_ordered_by_due_date() {
        let book = build_gradebook(&sample_source(), &GradedSubset);
        let titles: Vec<_> = book.columns.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Essay", "Quiz", "Final Project"]);
    }

    #[test]
    fn test_rows_only_participants_with_submissions_sorted_by_name() {
        let book = build_gradebook(&sample_source(), &GradedSubset);
        let names: Vec<_> = book.rows.iter().map(|r| r.display_name.as_str()).collect();
        assert_eq!(names, vec!["Alice", "Bob"]);
    }

    #[test]
    fn test_cell_precedence() {
        let book = build_gradebook(&sample_source(), &GradedSubset);
        let alice = &book.rows[0];
        let bob = &book.rows[1];

        let alice_cells: Vec<_> = alice.cells.iter().map(CellStatus::display).collect();
        assert_eq!(alice_cells, vec!["-", "Submitted", "-"]);

        let bob_cells: Vec<_> = bob.cells.iter().map(CellStatus::display).collect();
        assert_eq!(bob_cells, vec!["8/10", "30/50", "-"]);
    }

    #[test]
    fn test_final_grade_column() {
        let book = build_gradebook(&sample_source(), &GradedSubset);
        let bob = &book.rows[1];
        let percent = bob.final_mark.percent.unwrap();
        assert!((percent - 72.0).abs() < 1e-9, "got {percent}");
        assert_eq!(bob.final_mark.display(), "72%");
        assert_eq!(bob.final_mark.has_passed, Some(true));

        // 只有待批改提交时总评为 "-"
        let alice = &book.rows[0];
        assert_eq!(alice.final_mark.percent, None);
        assert_eq!(alice.final_mark.display(), "-");
    }

    #[test]
    fn test_assignment_stats() {
        let book = build_gradebook(&sample_source(), &GradedSubset);

        let quiz = book.stats.iter().find(|s| s.assignment_id == 2).unwrap();
        assert_eq!(quiz.submitted_count, 2);
        assert_eq!(quiz.graded_count, 1);
        assert_eq!(quiz.average, Some(30.0));
        assert_eq!(quiz.max, Some(30.0));
        assert_eq!(quiz.min, Some(30.0));

        let project = book.stats.iter().find(|s| s.assignment_id == 3).unwrap();
        assert_eq!(project.submitted_count, 0);
        assert_eq!(project.average, None);
    }

    #[test]
    fn test_stats_over_multiple_grades() {
        let mut source = sample_source();
        source.submissions.push(submission(103, 1, 12));
        source.grades.push(grade(103, 4.0, 40.0));

        let book = build_gradebook(&source, &GradedSubset);
        let essay = book.stats.iter().find(|s| s.assignment_id == 1).unwrap();
        assert_eq!(essay.graded_count, 2);
        assert_eq!(essay.average, Some(6.0));
        assert_eq!(essay.max, Some(8.0));
        assert_eq!(essay.min, Some(4.0));
        assert_eq!(book.passing_count(), 1);
    }

    #[test]
    fn test_final_mark_uses_current_max_mark() {
        let mut source = sample_source();
        // 作业满分被改为 16，已存储的 80% 不再准确
        source.assignments[1].max_mark = 16.0;
        let book = build_gradebook(&source, &GradedSubset);
        let bob = &book.rows[1];
        assert_eq!(bob.cells[0].display(), "8/16");
        match bob.cells[0] {
            CellStatus::Graded { final_mark, .. } => assert!((final_mark - 50.0).abs() < 1e-9),
            _ => panic!("expected graded cell"),
        }
    }

    #[test]
    fn test_empty_course() {
        let source = GradebookSource {
            course: course(1, "Empty"),
            assignments: vec![],
            participants: vec![],
            submissions: vec![],
            grades: vec![],
        };
        let book = build_gradebook(&source, &GradedSubset);
        assert!(book.columns.is_empty());
        assert!(book.rows.is_empty());
        assert_eq!(book.class_average(), None);
    }

    #[test]
    fn test_participant_record() {
        let source = sample_source();
        let bob = student(11, "Bob");
        let record = build_participant_record(&source, &bob, &GradedSubset);

        assert_eq!(record.submitted_count, 2);
        let statuses: Vec<_> = record.lines.iter().map(|l| l.status).collect();
        assert_eq!(
            statuses,
            vec![ReportStatus::Pass, ReportStatus::Pass, ReportStatus::NotSubmitted]
        );
        assert_eq!(record.lines[0].mark_display(), "8/10");
        assert_eq!(record.lines[2].mark_display(), "-");
        assert!((record.final_mark.percent.unwrap() - 72.0).abs() < 1e-9);
    }

    #[test]
    fn test_participant_record_statuses() {
        let mut source = sample_source();
        source.grades.push(Grade {
            feedback: Some("Needs more detail".to_string()),
            ..grade(102, 10.0, 20.0)
        });
        let alice = student(12, "Alice");
        let record = build_participant_record(&source, &alice, &GradedSubset);

        assert_eq!(record.lines[0].status, ReportStatus::NotSubmitted);
        assert_eq!(record.lines[1].status, ReportStatus::Fail);
        assert_eq!(record.lines[1].feedback.as_deref(), Some("Needs more detail"));
        assert_eq!(record.final_mark.has_passed, Some(false));
        assert_eq!(ReportStatus::SubmittedNotGraded.label(), "Submitted - Not Graded");
    }

    #[test]
    fn test_participant_without_submissions() {
        let source = sample_source();
        let carol = student(13, "Carol");
        let record = build_participant_record(&source, &carol, &GradedSubset);
        assert_eq!(record.submitted_count, 0);
        assert_eq!(record.lines.len(), 3);
        assert_eq!(record.final_mark.percent, None);
    }
}
