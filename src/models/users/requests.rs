use serde::Deserialize;
use ts_rs::TS;

use super::entities::UserRole;

/// 创建用户请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct CreateUserRequest {
    pub username: String,
    /// 不填写时使用用户名
    pub display_name: Option<String>,
    pub role: UserRole,
}
