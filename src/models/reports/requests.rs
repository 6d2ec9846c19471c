use serde::Deserialize;
use ts_rs::TS;

/// 成绩册查询参数
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct ReportQueryParams {
    // 临时覆盖配置的汇总策略：graded_subset / full_syllabus
    pub aggregation: Option<String>,
}
