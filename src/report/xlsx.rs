//! 将排版结果写入 XLSX
//!
//! 每个排版行对应工作表的一行。所有单元格的左右边界合并成一套全局列网格，
//! 跨多列的单元格用合并区域表示；页与页之间插入手动分页符。

use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet};

use super::layout::{Document, Line, LineKind};
use crate::errors::Result;

const POINTS_PER_INCH: f64 = 72.0;
// Excel 的 A4 纸张编号
const PAPER_A4: u8 = 9;
const MAX_SHEET_NAME: usize = 31;

// 以 0.01pt 为精度的坐标，避免浮点比较
fn grid_key(value: f64) -> i64 {
    (value * 100.0).round() as i64
}

/// 由全部单元格边界构成的列网格（升序、去重）
pub fn column_grid(document: &Document) -> Vec<i64> {
    let mut bounds: Vec<i64> = document
        .lines()
        .flat_map(|line| line.cells.iter())
        .flat_map(|cell| [grid_key(cell.x), grid_key(cell.x + cell.width)])
        .collect();
    bounds.sort_unstable();
    bounds.dedup();
    bounds
}

/// 工作表名称不能包含 `[]:*?/\`，且最多 31 个字符
pub fn sheet_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\'))
        .take(MAX_SHEET_NAME)
        .collect();
    let cleaned = cleaned.trim().trim_matches('\'').to_string();
    if cleaned.is_empty() {
        "Report".to_string()
    } else {
        cleaned
    }
}

struct Formats {
    title: Format,
    header: Format,
    body: Format,
}

impl Formats {
    fn new() -> Self {
        Self {
            title: Format::new().set_bold().set_font_size(14),
            header: Format::new()
                .set_bold()
                .set_border_bottom(FormatBorder::Thin)
                .set_align(FormatAlign::VerticalCenter),
            body: Format::new().set_text_wrap().set_align(FormatAlign::Top),
        }
    }

    fn for_kind(&self, kind: LineKind) -> &Format {
        match kind {
            LineKind::Title => &self.title,
            LineKind::Header => &self.header,
            _ => &self.body,
        }
    }
}

fn write_line(
    sheet: &mut Worksheet,
    row: u32,
    line: &Line,
    grid: &[i64],
    formats: &Formats,
) -> Result<()> {
    sheet.set_row_height(row, line.height)?;
    let format = formats.for_kind(line.kind);

    for cell in &line.cells {
        let (Ok(first), Ok(end)) = (
            grid.binary_search(&grid_key(cell.x)),
            grid.binary_search(&grid_key(cell.x + cell.width)),
        ) else {
            continue;
        };
        if end <= first {
            continue;
        }
        let last = end - 1;
        let text = cell.text();

        if first == last {
            sheet.write_string_with_format(row, first as u16, &text, format)?;
        } else {
            sheet.merge_range(row, first as u16, row, last as u16, &text, format)?;
        }
    }

    Ok(())
}

/// 生成单工作表的 XLSX 文件
pub fn write_xlsx(document: &Document, name: &str) -> Result<Vec<u8>> {
    let setup = document.setup;
    let grid = column_grid(document);
    let formats = Formats::new();

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(sheet_name(name))?;

    sheet
        .set_paper_size(PAPER_A4)
        .set_portrait()
        .set_margins(
            setup.margin_left / POINTS_PER_INCH,
            setup.margin_right / POINTS_PER_INCH,
            setup.margin_top / POINTS_PER_INCH,
            setup.margin_bottom / POINTS_PER_INCH,
            0.3,
            0.3,
        );

    // 网格相邻边界之间为一列，宽度按字符数换算
    for (col, pair) in grid.windows(2).enumerate() {
        let width_pt = (pair[1] - pair[0]) as f64 / 100.0;
        let chars = if setup.char_width > 0.0 {
            width_pt / setup.char_width
        } else {
            width_pt
        };
        sheet.set_column_width(col as u16, chars)?;
    }

    let mut row = 0u32;
    let mut breaks = Vec::new();
    for page in &document.pages {
        if page.number > 1 {
            breaks.push(row);
        }
        for line in &page.lines {
            write_line(sheet, row, line, &grid, &formats)?;
            row += 1;
        }
    }
    if !breaks.is_empty() {
        sheet.set_page_breaks(&breaks)?;
    }

    Ok(workbook.save_to_buffer()?)
}
