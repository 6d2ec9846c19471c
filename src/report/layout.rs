//! 分页表格排版
//!
//! 以磅（pt）为单位计算每一行的位置。列宽按页面可用宽度的比例分配，
//! 超出列宽的文本按列配置截断或换行；下一行越过 `height - margin_bottom`
//! 时换页，表格在续页顶部重绘表头。

/// 页面几何参数，单位为磅
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSetup {
    pub width: f64,
    pub height: f64,
    pub margin_top: f64,
    pub margin_bottom: f64,
    pub margin_left: f64,
    pub margin_right: f64,
    pub line_height: f64,
    // 平均字符宽度，用于估算一行能放下多少字符
    pub char_width: f64,
}

impl Default for PageSetup {
    /// A4 纵向
    fn default() -> Self {
        Self {
            width: 595.0,
            height: 842.0,
            margin_top: 36.0,
            margin_bottom: 48.0,
            margin_left: 36.0,
            margin_right: 36.0,
            line_height: 14.0,
            char_width: 5.5,
        }
    }
}

impl PageSetup {
    pub fn usable_width(&self) -> f64 {
        (self.width - self.margin_left - self.margin_right).max(0.0)
    }

    /// 内容区下边界
    pub fn content_bottom(&self) -> f64 {
        self.height - self.margin_bottom
    }

    /// 给定宽度内能放下的字符数，至少为 1
    pub fn chars_for(&self, width: f64) -> usize {
        if self.char_width <= 0.0 || !width.is_finite() {
            return 1;
        }
        ((width / self.char_width).floor() as usize).max(1)
    }
}

/// 列文本溢出处理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overflow {
    /// 截断并以 `...` 结尾
    Truncate,
    /// 按词换行，最多 `max_lines` 行，超出部分截断
    Wrap { max_lines: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSpec {
    pub title: String,
    // 占可用宽度的比例，最终会归一化
    pub fraction: f64,
    pub overflow: Overflow,
}

impl ColumnSpec {
    pub fn new(title: impl Into<String>, fraction: f64) -> Self {
        Self {
            title: title.into(),
            fraction,
            overflow: Overflow::Truncate,
        }
    }

    pub fn wrapping(mut self, max_lines: usize) -> Self {
        self.overflow = Overflow::Wrap {
            max_lines: max_lines.max(1),
        };
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Title,
    Text,
    Header,
    Row,
    Blank,
}

/// 已排版的单元格，`lines` 为换行/截断后的文本
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub x: f64,
    pub width: f64,
    pub lines: Vec<String>,
}

impl Cell {
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub kind: LineKind,
    // 行顶部距页面顶端的距离
    pub y: f64,
    pub height: f64,
    pub cells: Vec<Cell>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub number: usize,
    pub lines: Vec<Line>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub setup: PageSetup,
    pub pages: Vec<Page>,
}

impl Document {
    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.pages.iter().flat_map(|p| p.lines.iter())
    }

    /// 所有行的纯文本，便于检查与调试
    pub fn plain_text(&self) -> Vec<String> {
        self.lines()
            .map(|l| {
                l.cells
                    .iter()
                    .map(Cell::text)
                    .collect::<Vec<_>>()
                    .join(" | ")
            })
            .collect()
    }
}

/// 按比例计算列宽；非法比例按 0 处理，全部非法时均分
pub fn column_widths(columns: &[ColumnSpec], usable_width: f64) -> Vec<f64> {
    if columns.is_empty() {
        return Vec::new();
    }

    let fractions: Vec<f64> = columns
        .iter()
        .map(|c| {
            if c.fraction.is_finite() && c.fraction > 0.0 {
                c.fraction
            } else {
                0.0
            }
        })
        .collect();
    let total: f64 = fractions.iter().sum();

    if total <= 0.0 {
        let each = usable_width / columns.len() as f64;
        return vec![each; columns.len()];
    }

    fractions
        .iter()
        .map(|f| f / total * usable_width)
        .collect()
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    if max_chars <= 3 {
        return text.chars().take(max_chars).collect();
    }
    let mut out: String = text.chars().take(max_chars - 3).collect();
    out.push_str("...");
    out
}

fn wrap_words(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();

            // 单词本身超长时硬切
            while word.len() > max_chars {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                let rest = word.split_off(max_chars);
                lines.push(word.into_iter().collect());
                word = rest;
            }
            if word.is_empty() {
                continue;
            }

            let current_len = current.chars().count();
            let needed = if current.is_empty() {
                word.len()
            } else {
                current_len + 1 + word.len()
            };
            if needed > max_chars {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.extend(word);
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }

    lines
}

/// 将文本放入 `max_chars` 宽的单元格，至少返回一行
pub fn fit_text(text: &str, max_chars: usize, overflow: Overflow) -> Vec<String> {
    let max_chars = max_chars.max(1);

    match overflow {
        Overflow::Truncate => {
            let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
            vec![truncate_chars(&flat, max_chars)]
        }
        Overflow::Wrap { max_lines } => {
            let max_lines = max_lines.max(1);
            let mut lines = wrap_words(text, max_chars);
            if lines.is_empty() {
                return vec![String::new()];
            }
            if lines.len() > max_lines {
                lines.truncate(max_lines);
                if let Some(last) = lines.last_mut() {
                    // 标记被截掉的内容
                    let kept: String = last.chars().take(max_chars.saturating_sub(3)).collect();
                    *last = if max_chars > 3 {
                        format!("{kept}...")
                    } else {
                        kept
                    };
                }
            }
            lines
        }
    }
}

struct TableState {
    columns: Vec<ColumnSpec>,
    // 每列 (x, width)
    geometry: Vec<(f64, f64)>,
}

/// 逐行构建分页文档
pub struct DocumentBuilder {
    setup: PageSetup,
    pages: Vec<Page>,
    current: Vec<Line>,
    y: f64,
    table: Option<TableState>,
}

impl DocumentBuilder {
    pub fn new(setup: PageSetup) -> Self {
        Self {
            setup,
            pages: Vec::new(),
            current: Vec::new(),
            y: setup.margin_top,
            table: None,
        }
    }

    pub fn setup(&self) -> &PageSetup {
        &self.setup
    }

    fn full_width_cell(&self, lines: Vec<String>) -> Cell {
        Cell {
            x: self.setup.margin_left,
            width: self.setup.usable_width(),
            lines,
        }
    }

    fn break_page(&mut self) {
        let lines = std::mem::take(&mut self.current);
        self.pages.push(Page {
            number: self.pages.len() + 1,
            lines,
        });
        self.y = self.setup.margin_top;
    }

    fn fits(&self, height: f64) -> bool {
        self.y + height <= self.setup.content_bottom()
    }

    fn push_line(&mut self, kind: LineKind, height: f64, cells: Vec<Cell>) {
        self.current.push(Line {
            kind,
            y: self.y,
            height,
            cells,
        });
        self.y += height;
    }

    // 放置一行，必要时先换页；空白页上的超高行直接放置，避免死循环
    fn place(&mut self, kind: LineKind, height: f64, cells: Vec<Cell>) {
        if !self.fits(height) && !self.current.is_empty() {
            self.break_page();
        }
        self.push_line(kind, height, cells);
    }

    /// 标题行，单行截断
    pub fn title(&mut self, text: &str) -> &mut Self {
        let max_chars = self.setup.chars_for(self.setup.usable_width());
        let cell = self.full_width_cell(fit_text(text, max_chars, Overflow::Truncate));
        let height = self.setup.line_height * 1.5;
        self.place(LineKind::Title, height, vec![cell]);
        self
    }

    /// 普通文本，按页面宽度换行，每一物理行单独放置
    pub fn text(&mut self, text: &str) -> &mut Self {
        let max_chars = self.setup.chars_for(self.setup.usable_width());
        let lines = fit_text(text, max_chars, Overflow::Wrap { max_lines: usize::MAX });
        for line in lines {
            let cell = self.full_width_cell(vec![line]);
            self.place(LineKind::Text, self.setup.line_height, vec![cell]);
        }
        self
    }

    pub fn blank(&mut self) -> &mut Self {
        // 页首不需要空行
        if self.current.is_empty() {
            return self;
        }
        let height = self.setup.line_height;
        if self.fits(height) {
            self.push_line(LineKind::Blank, height, Vec::new());
        } else {
            self.break_page();
        }
        self
    }

    fn header_cells(&self, state: &TableState) -> Vec<Cell> {
        state
            .columns
            .iter()
            .zip(&state.geometry)
            .map(|(col, (x, width))| Cell {
                x: *x,
                width: *width,
                lines: fit_text(&col.title, self.setup.chars_for(*width), Overflow::Truncate),
            })
            .collect()
    }

    fn push_header(&mut self) {
        if let Some(state) = &self.table {
            let cells = self.header_cells(state);
            self.push_line(LineKind::Header, self.setup.line_height, cells);
        }
    }

    /// 开始表格并绘制表头
    pub fn begin_table(&mut self, columns: Vec<ColumnSpec>) -> &mut Self {
        let widths = column_widths(&columns, self.setup.usable_width());
        let mut x = self.setup.margin_left;
        let geometry = widths
            .into_iter()
            .map(|w| {
                let cell = (x, w);
                x += w;
                cell
            })
            .collect();
        self.table = Some(TableState { columns, geometry });

        // 表头至少要和一行数据在同一页
        if !self.fits(self.setup.line_height * 2.0) && !self.current.is_empty() {
            self.break_page();
        }
        self.push_header();
        self
    }

    /// 追加一行数据；缺少的单元格补空，多余的忽略
    pub fn row<S: AsRef<str>>(&mut self, values: &[S]) -> &mut Self {
        let Some(state) = &self.table else {
            // 表格外的行按普通文本处理
            let joined = values.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(" ");
            return self.text(&joined);
        };

        let cells: Vec<Cell> = state
            .columns
            .iter()
            .zip(&state.geometry)
            .enumerate()
            .map(|(i, (col, (x, width)))| {
                let value = values.get(i).map(AsRef::as_ref).unwrap_or("");
                Cell {
                    x: *x,
                    width: *width,
                    lines: fit_text(value, self.setup.chars_for(*width), col.overflow),
                }
            })
            .collect();

        let line_count = cells.iter().map(|c| c.lines.len()).max().unwrap_or(1);
        let height = line_count as f64 * self.setup.line_height;

        if !self.fits(height) && !self.current.is_empty() {
            // 表头不单独留在页底，随第一行一起移到下一页
            if self.current.last().is_some_and(|l| l.kind == LineKind::Header)
                && let Some(header) = self.current.pop()
            {
                self.y -= header.height;
            }
            if !self.current.is_empty() {
                self.break_page();
            }
            self.push_header();
        }
        self.push_line(LineKind::Row, height, cells);
        self
    }

    pub fn end_table(&mut self) -> &mut Self {
        self.table = None;
        self
    }

    pub fn finish(mut self) -> Document {
        if !self.current.is_empty() || self.pages.is_empty() {
            self.break_page();
        }
        Document {
            setup: self.setup,
            pages: self.pages,
        }
    }
}
