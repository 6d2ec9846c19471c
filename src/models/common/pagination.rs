use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use ts_rs::TS;

const MAX_PAGE_SIZE: i64 = 100;

// 分页查询参数
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/pagination.ts")]
pub struct PaginationQuery {
    #[serde(default = "default_page", deserialize_with = "number_or_string")]
    pub page: i64,
    #[serde(default = "default_size", deserialize_with = "number_or_string")]
    pub size: i64,
}

impl PaginationQuery {
    /// 归一化后的 (page, size)，page 从 1 开始
    pub fn normalized(&self) -> (u64, u64) {
        let page = self.page.max(1) as u64;
        let size = self.size.clamp(1, MAX_PAGE_SIZE) as u64;
        (page, size)
    }
}

impl Default for PaginationQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            size: default_size(),
        }
    }
}

// 分页响应信息
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/pagination.ts")]
pub struct PaginationInfo {
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub total_pages: i64,
}

// 分页列表响应
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/pagination.ts")]
pub struct PaginatedResponse<T: TS> {
    pub items: Vec<T>,
    pub pagination: PaginationInfo,
}

// 查询字符串里的数字都是字符串，JSON 里可能是数字，两者都接受
fn number_or_string<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + Deserialize<'de>,
    T::Err: Display,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw<T> {
        Number(T),
        Text(String),
    }

    match Raw::<T>::deserialize(deserializer)? {
        Raw::Number(value) => Ok(value),
        Raw::Text(text) => text.trim().parse().map_err(serde::de::Error::custom),
    }
}

fn default_page() -> i64 {
    1
}

fn default_size() -> i64 {
    20
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_numbers_and_strings() {
        let q: PaginationQuery = serde_json::from_str(r#"{"page": 3, "size": "15"}"#).unwrap();
        assert_eq!((q.page, q.size), (3, 15));
    }

    #[test]
    fn test_defaults_and_clamp() {
        let q: PaginationQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(q.normalized(), (1, 20));

        let q = PaginationQuery { page: -2, size: 500 };
        assert_eq!(q.normalized(), (1, 100));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(serde_json::from_str::<PaginationQuery>(r#"{"page": "abc"}"#).is_err());
    }
}
