//! 课程总评汇总
//!
//! 汇总策略通过 [`AggregationPolicy`] 显式命名，默认的 [`GradedSubset`]
//! 只对已评分作业做加权平均：随着批改推进，分母会变化，
//! 同一个学生的总评在学期中可能上下波动。

use std::fmt;
use std::str::FromStr;

use super::calculator::is_passing;

/// 参与汇总的一项作业成绩
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedMark {
    /// 百分制成绩，未评分时忽略
    pub mark: f64,
    pub weight: f64,
    pub graded: bool,
}

impl WeightedMark {
    pub fn graded(mark: f64, weight: f64) -> Self {
        Self {
            mark,
            weight,
            graded: true,
        }
    }

    pub fn ungraded(weight: f64) -> Self {
        Self {
            mark: 0.0,
            weight,
            graded: false,
        }
    }

    // 非法权重不参与任何策略
    fn usable(&self) -> bool {
        self.weight.is_finite() && self.weight > 0.0
    }
}

/// 汇总策略
pub trait AggregationPolicy: Send + Sync {
    /// 策略名称（与配置值一致）
    fn name(&self) -> &'static str;

    /// 返回百分制总评；没有任何已评分作业时返回 `None`
    fn aggregate(&self, entries: &[WeightedMark]) -> Option<f64>;
}

/// `Σ(mark·w) / Σ(w)`，只统计已评分作业
#[derive(Debug, Clone, Copy, Default)]
pub struct GradedSubset;

impl AggregationPolicy for GradedSubset {
    fn name(&self) -> &'static str {
        "graded_subset"
    }

    fn aggregate(&self, entries: &[WeightedMark]) -> Option<f64> {
        let (weighted_sum, weight_sum) = entries
            .iter()
            .filter(|e| e.graded && e.usable() && e.mark.is_finite())
            .fold((0.0, 0.0), |(sum, weights), e| {
                (sum + e.mark * e.weight, weights + e.weight)
            });

        if weight_sum > 0.0 {
            Some(weighted_sum / weight_sum)
        } else {
            None
        }
    }
}

/// 未评分作业按 0 分计入，分母为全部作业权重
#[derive(Debug, Clone, Copy, Default)]
pub struct FullSyllabus;

impl AggregationPolicy for FullSyllabus {
    fn name(&self) -> &'static str {
        "full_syllabus"
    }

    fn aggregate(&self, entries: &[WeightedMark]) -> Option<f64> {
        if !entries.iter().any(|e| e.graded && e.usable()) {
            return None;
        }

        let (weighted_sum, weight_sum) = entries
            .iter()
            .filter(|e| e.usable())
            .fold((0.0, 0.0), |(sum, weights), e| {
                let mark = if e.graded && e.mark.is_finite() {
                    e.mark
                } else {
                    0.0
                };
                (sum + mark * e.weight, weights + e.weight)
            });

        if weight_sum > 0.0 {
            Some(weighted_sum / weight_sum)
        } else {
            None
        }
    }
}

/// 可配置的策略选择
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AggregationStrategy {
    #[default]
    GradedSubset,
    FullSyllabus,
}

impl AggregationStrategy {
    pub const GRADED_SUBSET: &'static str = "graded_subset";
    pub const FULL_SYLLABUS: &'static str = "full_syllabus";

    pub fn policy(&self) -> &'static dyn AggregationPolicy {
        match self {
            AggregationStrategy::GradedSubset => &GradedSubset,
            AggregationStrategy::FullSyllabus => &FullSyllabus,
        }
    }
}

impl fmt::Display for AggregationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.policy().name())
    }
}

impl FromStr for AggregationStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Self::GRADED_SUBSET => Ok(AggregationStrategy::GradedSubset),
            Self::FULL_SYLLABUS => Ok(AggregationStrategy::FullSyllabus),
            _ => Err(format!(
                "Invalid aggregation strategy: '{s}'. Supported: graded_subset, full_syllabus"
            )),
        }
    }
}

/// 课程总评
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CourseMark {
    pub percent: Option<f64>,
    pub has_passed: Option<bool>,
    pub graded_count: usize,
    pub graded_weight: f64,
}

impl CourseMark {
    pub fn compute(entries: &[WeightedMark], policy: &dyn AggregationPolicy) -> Self {
        let percent = policy.aggregate(entries);
        let graded: Vec<_> = entries.iter().filter(|e| e.graded && e.usable()).collect();

        CourseMark {
            percent,
            has_passed: percent.map(is_passing),
            graded_count: graded.len(),
            graded_weight: graded.iter().map(|e| e.weight).sum(),
        }
    }

    /// 总评显示，无成绩时为 `-`
    pub fn display(&self) -> String {
        match self.percent {
            Some(p) => super::format_percent(p),
            None => "-".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_graded_subset_ignores_ungraded_weight() {
        let entries = [
            WeightedMark::graded(80.0, 0.3),
            WeightedMark::graded(60.0, 0.2),
            WeightedMark::ungraded(0.5),
        ];
        let mark = GradedSubset.aggregate(&entries).unwrap();
        assert!(approx(mark, 72.0), "got {mark}");
    }

    #[test]
    fn test_graded_subset_nothing_graded() {
        let entries = [WeightedMark::ungraded(0.5), WeightedMark::ungraded(0.5)];
        assert_eq!(GradedSubset.aggregate(&entries), None);
        assert_eq!(GradedSubset.aggregate(&[]), None);
    }

    #[test]
    fn test_graded_zero_is_not_undefined() {
        let entries = [WeightedMark::graded(0.0, 0.4)];
        assert_eq!(GradedSubset.aggregate(&entries), Some(0.0));
    }

    #[test]
    fn test_full_syllabus_counts_ungraded_as_zero() {
        let entries = [
            WeightedMark::graded(80.0, 0.3),
            WeightedMark::graded(60.0, 0.2),
            WeightedMark::ungraded(0.5),
        ];
        let mark = FullSyllabus.aggregate(&entries).unwrap();
        assert!(approx(mark, 36.0), "got {mark}");

        assert_eq!(FullSyllabus.aggregate(&[WeightedMark::ungraded(1.0)]), None);
    }

    #[test]
    fn test_invalid_weights_skipped() {
        let entries = [
            WeightedMark::graded(90.0, 0.0),
            WeightedMark::graded(70.0, f64::NAN),
            WeightedMark::graded(40.0, 0.5),
        ];
        assert_eq!(GradedSubset.aggregate(&entries), Some(40.0));
    }

    #[test]
    fn test_course_mark_pass_fail() {
        let passing = CourseMark::compute(
            &[WeightedMark::graded(50.0, 0.5), WeightedMark::ungraded(0.5)],
            &GradedSubset,
        );
        assert_eq!(passing.has_passed, Some(true));
        assert_eq!(passing.graded_count, 1);
        assert!(approx(passing.graded_weight, 0.5));
        assert_eq!(passing.display(), "50%");

        let failing = CourseMark::compute(&[WeightedMark::graded(49.0, 1.0)], &GradedSubset);
        assert_eq!(failing.has_passed, Some(false));

        let empty = CourseMark::compute(&[WeightedMark::ungraded(1.0)], &GradedSubset);
        assert_eq!(empty.percent, None);
        assert_eq!(empty.has_passed, None);
        assert_eq!(empty.display(), "-");
    }

    #[test]
    fn test_display_agrees_with_pass_flag() {
        let just_below = CourseMark::compute(&[WeightedMark::graded(49.999, 1.0)], &GradedSubset);
        assert_eq!(just_below.display(), "49.99%");
        assert_eq!(just_below.has_passed, Some(false));

        // 浮点误差不应让刚好及格的总评显示为 50% 却判为不及格
        let noisy = 50.0 - 1e-12;
        let at_line = CourseMark::compute(&[WeightedMark::graded(noisy, 1.0)], &GradedSubset);
        assert_eq!(at_line.display(), "50%");
        assert_eq!(at_line.has_passed, Some(true));
    }

    #[test]
    fn test_strategy_parse() {
        assert_eq!(
            "graded_subset".parse::<AggregationStrategy>(),
            Ok(AggregationStrategy::GradedSubset)
        );
        assert_eq!(
            "full_syllabus".parse::<AggregationStrategy>(),
            Ok(AggregationStrategy::FullSyllabus)
        );
        assert!("average".parse::<AggregationStrategy>().is_err());
        assert_eq!(AggregationStrategy::default().to_string(), "graded_subset");
    }
}
