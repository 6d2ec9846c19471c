//! 课程成绩册报表

use super::layout::{ColumnSpec, Document, DocumentBuilder, PageSetup};
use super::{DATE_FORMAT, NO_ASSIGNMENTS, NO_DATA};
use crate::grading::{Gradebook, format_mark, format_percent};

const NAME_FRACTION: f64 = 0.22;
const FINAL_FRACTION: f64 = 0.12;

fn matrix_columns(gradebook: &Gradebook) -> Vec<ColumnSpec> {
    let per_assignment = (1.0 - NAME_FRACTION - FINAL_FRACTION) / gradebook.columns.len() as f64;

    let mut columns = Vec::with_capacity(gradebook.columns.len() + 2);
    columns.push(ColumnSpec::new("Participant", NAME_FRACTION));
    columns.extend(
        gradebook
            .columns
            .iter()
            .map(|c| ColumnSpec::new(c.title.clone(), per_assignment)),
    );
    columns.push(ColumnSpec::new(Gradebook::FINAL_GRADE_TITLE, FINAL_FRACTION));
    columns
}

fn stats_columns() -> Vec<ColumnSpec> {
    vec![
        ColumnSpec::new("Assignment", 0.30),
        ColumnSpec::new("Due Date", 0.16),
        ColumnSpec::new("Submitted", 0.12),
        ColumnSpec::new("Graded", 0.12),
        ColumnSpec::new("Average", 0.10),
        ColumnSpec::new("Max", 0.10),
        ColumnSpec::new("Min", 0.10),
    ]
}

fn optional_mark(value: Option<f64>) -> String {
    value.map(format_mark).unwrap_or_else(|| "-".to_string())
}

/// 排版整门课程的成绩矩阵与作业统计
pub fn render_course_report(
    gradebook: &Gradebook,
    setup: PageSetup,
    aggregation: &str,
) -> Document {
    let mut builder = DocumentBuilder::new(setup);
    builder
        .title(&format!("Gradebook: {}", gradebook.course_name))
        .text(&format!("Aggregation: {aggregation}"))
        .blank();

    if gradebook.columns.is_empty() {
        builder.text(NO_ASSIGNMENTS);
        return builder.finish();
    }
    if gradebook.rows.is_empty() {
        builder.text(NO_DATA);
        return builder.finish();
    }

    builder.begin_table(matrix_columns(gradebook));
    for row in &gradebook.rows {
        let mut values = Vec::with_capacity(row.cells.len() + 2);
        values.push(row.display_name.clone());
        values.extend(row.cells.iter().map(|c| c.display()));
        values.push(row.final_mark.display());
        builder.row(&values);
    }
    builder.end_table().blank();

    let average = gradebook
        .class_average()
        .map(format_percent)
        .unwrap_or_else(|| "-".to_string());
    builder
        .text(&format!(
            "Participants: {}, Passing: {}, Class average: {}",
            gradebook.rows.len(),
            gradebook.passing_count(),
            average
        ))
        .blank();

    builder.begin_table(stats_columns());
    for stats in &gradebook.stats {
        builder.row(&[
            stats.title.clone(),
            stats.due_date.format(DATE_FORMAT).to_string(),
            stats.submitted_count.to_string(),
            stats.graded_count.to_string(),
            optional_mark(stats.average),
            optional_mark(stats.max),
            optional_mark(stats.min),
        ]);
    }
    builder.end_table();

    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading::gradebook::fixtures::*;
    use crate::grading::{GradebookSource, GradedSubset, build_gradebook};
    use crate::report::layout::LineKind;

    fn source() -> GradebookSource {
        GradebookSource {
            course: course(1, "Rust 101"),
            assignments: vec![
                assignment(1, "Essay", 10.0, 0.3, 5),
                assignment(2, "Quiz", 50.0, 0.2, 10),
                assignment(3, "Final Project", 100.0, 0.5, 20),
            ],
            participants: vec![student(11, "Bob"), student(12, "Alice")],
            submissions: vec![
                submission(100, 1, 11),
                submission(101, 2, 11),
                submission(102, 2, 12),
            ],
            grades: vec![grade(100, 8.0, 80.0), grade(101, 30.0, 60.0)],
        }
    }

    #[test]
    fn test_no_assignments_has_no_header() {
        let mut src = source();
        src.assignments.clear();
        src.submissions.clear();
        src.grades.clear();
        let book = build_gradebook(&src, &GradedSubset);
        let doc = render_course_report(&book, PageSetup::default(), "graded_subset");

        let text = doc.plain_text();
        assert!(text.iter().any(|l| l == NO_ASSIGNMENTS));
        assert!(!doc.lines().any(|l| l.kind == LineKind::Header));
    }

    #[test]
    fn test_no_submissions_renders_no_data() {
        let mut src = source();
        src.submissions.clear();
        src.grades.clear();
        let book = build_gradebook(&src, &GradedSubset);
        let doc = render_course_report(&book, PageSetup::default(), "graded_subset");

        let text = doc.plain_text();
        assert_eq!(text.iter().filter(|l| *l == NO_DATA).count(), 1);
        assert!(!doc.lines().any(|l| l.kind == LineKind::Header));
    }

    #[test]
    fn test_matrix_and_stats_tables() {
        let book = build_gradebook(&source(), &GradedSubset);
        let doc = render_course_report(&book, PageSetup::default(), "graded_subset");

        let headers: Vec<_> = doc.lines().filter(|l| l.kind == LineKind::Header).collect();
        assert_eq!(headers.len(), 2);
        assert_eq!(headers[0].cells.len(), 5);
        assert_eq!(headers[0].cells[4].text(), "Final Grade");

        let text = doc.plain_text();
        assert!(text.contains(&"Alice | - | Submitted | - | -".to_string()));
        assert!(text.contains(&"Bob | 8/10 | 30/50 | - | 72%".to_string()));
        assert!(text.iter().any(|l| l == "Participants: 2, Passing: 1, Class average: 72%"));
        assert!(text.iter().any(|l| l.starts_with("Quiz | 2025-03-10 | 2 | 1 | 30")));
    }

    #[test]
    fn test_matrix_fills_usable_width() {
        let book = build_gradebook(&source(), &GradedSubset);
        let setup = PageSetup::default();
        let doc = render_course_report(&book, setup, "graded_subset");

        let header = doc.lines().find(|l| l.kind == LineKind::Header).unwrap();
        let total: f64 = header.cells.iter().map(|c| c.width).sum();
        assert!((total - setup.usable_width()).abs() < 1e-6);
        let last = header.cells.last().unwrap();
        assert!((last.x + last.width - (setup.width - setup.margin_right)).abs() < 1e-6);
    }
}
