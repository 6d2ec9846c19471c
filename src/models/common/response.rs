use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::{ErrorCode, FieldError};

// 统一的API响应结构
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/api.ts")]
pub struct ApiResponse<T: TS> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl<T: TS> ApiResponse<T> {
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success as i32,
            message: message.into(),
            data: Some(data),
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn error(code: ErrorCode, data: T, message: impl Into<String>) -> Self {
        Self {
            code: code as i32,
            message: message.into(),
            data: Some(data),
            timestamp: chrono::Utc::now(),
        }
    }
}

impl ApiResponse<()> {
    pub fn success_empty(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success as i32,
            message: message.into(),
            data: None,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn error_empty(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code as i32,
            message: message.into(),
            data: None,
            timestamp: chrono::Utc::now(),
        }
    }
}

impl ApiResponse<Vec<FieldError>> {
    /// 表单校验失败，逐字段返回错误
    pub fn validation_failed(errors: Vec<FieldError>) -> Self {
        let message = errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect::<Vec<_>>()
            .join("; ");
        Self::error(ErrorCode::ValidationFailed, errors, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_failed_envelope() {
        let resp = ApiResponse::validation_failed(vec![
            FieldError::new("raw_mark", "must not be negative"),
            FieldError::new("feedback", "too long"),
        ]);
        assert_eq!(resp.code, ErrorCode::ValidationFailed as i32);
        assert_eq!(
            resp.message,
            "raw_mark: must not be negative; feedback: too long"
        );
        assert_eq!(resp.data.as_ref().map(Vec::len), Some(2));
    }

    #[test]
    fn test_empty_response_skips_data() {
        let json = serde_json::to_value(ApiResponse::error_empty(
            ErrorCode::CourseNotFound,
            "Course not found",
        ))
        .unwrap();
        assert_eq!(json["code"], 2002);
        assert!(json.get("data").is_none());
    }
}
