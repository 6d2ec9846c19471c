use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

// 创建课程请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct CreateCourseRequest {
    pub name: String,
    pub description: Option<String>,
}

// 课程列表查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct CourseQueryParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub search: Option<String>,
}

// 课程列表查询参数（用于存储层）
#[derive(Debug, Clone)]
pub struct CourseListQuery {
    pub page: u64,
    pub size: u64,
    pub search: Option<String>,
}

impl From<CourseQueryParams> for CourseListQuery {
    fn from(params: CourseQueryParams) -> Self {
        let (page, size) = params.pagination.normalized();
        Self {
            page,
            size,
            search: params
                .search
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        }
    }
}
