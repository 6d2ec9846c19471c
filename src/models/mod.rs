//! 数据模型定义
//!
//! 业务实体、请求体与响应体，与 `entity` 中的数据库实体分离。

pub mod assignments;
pub mod common;
pub mod courses;
pub mod grades;
pub mod reports;
pub mod submissions;
pub mod users;

pub use common::{
    ApiResponse, ErrorCode, FieldError, PaginatedResponse, PaginationInfo, PaginationQuery,
};

/// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}
