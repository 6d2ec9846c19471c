//! 个人成绩单报表

use super::layout::{ColumnSpec, Document, DocumentBuilder, PageSetup};
use super::{DATE_FORMAT, NO_ASSIGNMENTS, NO_DATA};
use crate::grading::ParticipantRecord;

fn columns() -> Vec<ColumnSpec> {
    vec![
        ColumnSpec::new("Assignment", 0.24),
        ColumnSpec::new("Due Date", 0.14),
        ColumnSpec::new("Mark", 0.12),
        ColumnSpec::new("Status", 0.24),
        ColumnSpec::new("Feedback", 0.26).wrapping(4),
    ]
}

/// 总评行，如 `Final Mark: 72% (Pass)`
pub fn final_mark_line(record: &ParticipantRecord) -> String {
    match record.final_mark.has_passed {
        Some(passed) => format!(
            "Final Mark: {} ({})",
            record.final_mark.display(),
            if passed { "Pass" } else { "Fail" }
        ),
        None => format!("Final Mark: {}", record.final_mark.display()),
    }
}

pub fn render_participant_report(
    record: &ParticipantRecord,
    setup: PageSetup,
    aggregation: &str,
) -> Document {
    let mut builder = DocumentBuilder::new(setup);
    builder
        .title(&format!("Grade Report: {}", record.display_name))
        .text(&format!("Course: {}", record.course_name))
        .text(&format!("Aggregation: {aggregation}"))
        .blank();

    if record.lines.is_empty() {
        builder.text(NO_ASSIGNMENTS);
        return builder.finish();
    }
    if record.submitted_count == 0 {
        builder.text(NO_DATA);
        return builder.finish();
    }

    builder.begin_table(columns());
    for line in &record.lines {
        builder.row(&[
            line.title.clone(),
            line.due_date.format(DATE_FORMAT).to_string(),
            line.mark_display(),
            line.status.label().to_string(),
            line.feedback.clone().unwrap_or_default(),
        ]);
    }
    builder.end_table().blank();
    builder.text(&final_mark_line(record));

    builder.finish()
}
