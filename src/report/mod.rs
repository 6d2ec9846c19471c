//! 报表渲染
//!
//! `layout` 负责分页排版，`course` / `participant` 把成绩数据排成文档，
//! `xlsx` 将排版结果输出为二进制文件。

pub mod course;
pub mod layout;
pub mod participant;
pub mod xlsx;

pub use course::render_course_report;
pub use layout::{ColumnSpec, Document, DocumentBuilder, Overflow, PageSetup};
pub use participant::render_participant_report;
pub use xlsx::write_xlsx;

use crate::utils::sanitize_filename;

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const NO_ASSIGNMENTS: &str = "No assignments";
pub const NO_DATA: &str = "No data";

/// 由名称拼接报表文件名，如 `Alice_Rust_101_report.xlsx`
pub fn report_filename(parts: &[&str]) -> String {
    let stem = parts
        .iter()
        .map(|p| sanitize_filename(p))
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("_");

    if stem.is_empty() {
        "report.xlsx".to_string()
    } else {
        format!("{stem}_report.xlsx")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_filename() {
        assert_eq!(report_filename(&["Alice", "Rust 101"]), "Alice_Rust_101_report.xlsx");
        assert_eq!(report_filename(&["../etc", "a/b"]), "etc_a_b_report.xlsx");
        assert_eq!(report_filename(&["", "///"]), "report.xlsx");
    }
}
