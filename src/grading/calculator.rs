//! 单次作业评分计算

use chrono::{DateTime, Utc};

use crate::errors::{LmsError, Result};

/// 及格线（百分制）
pub const PASS_THRESHOLD: f64 = 50.0;

/// 换算结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkOutcome {
    pub final_mark: f64,
    pub has_passed: bool,
}

/// 是否达到及格线，按显示精度判定
pub fn is_passing(percent: f64) -> bool {
    super::truncate_percent(percent) >= PASS_THRESHOLD
}

/// 原始分换算为百分制：`raw / max * 100`
///
/// `max_mark` 必须为正数。作业创建时已拒绝 0 满分，这里再校验一次，
/// 防止历史数据触发除零。
pub fn normalize_mark(raw_mark: f64, max_mark: f64) -> Result<MarkOutcome> {
    if !max_mark.is_finite() || max_mark <= 0.0 {
        return Err(LmsError::validation(format!(
            "max_mark must be greater than zero, got {max_mark}"
        )));
    }
    if !raw_mark.is_finite() {
        return Err(LmsError::validation("raw_mark must be a finite number"));
    }

    let final_mark = raw_mark / max_mark * 100.0;
    Ok(MarkOutcome {
        final_mark,
        has_passed: is_passing(final_mark),
    })
}

/// 一次评分操作产生的完整记录
#[derive(Debug, Clone, PartialEq)]
pub struct GradeRecord {
    pub raw_mark: f64,
    pub final_mark: f64,
    pub has_passed: bool,
    pub feedback: Option<String>,
    pub marker_id: i64,
    pub graded_at: DateTime<Utc>,
}

impl GradeRecord {
    /// 除评分时间外，两次评分结果是否一致
    pub fn same_result(&self, other: &GradeRecord) -> bool {
        self.raw_mark == other.raw_mark
            && self.final_mark == other.final_mark
            && self.has_passed == other.has_passed
            && self.feedback == other.feedback
            && self.marker_id == other.marker_id
    }
}

/// 为一份提交评分
///
/// 评分时间由调用方传入，相同输入与时间总是得到相同记录。
pub fn grade_submission(
    raw_mark: f64,
    max_mark: f64,
    feedback: Option<String>,
    marker_id: i64,
    graded_at: DateTime<Utc>,
) -> Result<GradeRecord> {
    let outcome = normalize_mark(raw_mark, max_mark)?;

    // 空白评语视为未填写
    let feedback = feedback
        .map(|f| f.trim().to_string())
        .filter(|f| !f.is_empty());

    Ok(GradeRecord {
        raw_mark,
        final_mark: outcome.final_mark,
        has_passed: outcome.has_passed,
        feedback,
        marker_id,
        graded_at,
    })
}
