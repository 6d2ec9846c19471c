//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_lms_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum LmsError {
            $($variant(String),)*
        }

        impl LmsError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(LmsError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(LmsError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(LmsError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl LmsError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        LmsError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_lms_errors! {
    DatabaseConfig("E001", "Database Configuration Error"),
    DatabaseConnection("E002", "Database Connection Error"),
    DatabaseOperation("E003", "Database Operation Error"),
    FileOperation("E004", "File Operation Error"),
    Validation("E005", "Validation Error"),
    NotFound("E006", "Resource Not Found"),
    Serialization("E007", "Serialization Error"),
    DateParse("E008", "Date Parse Error"),
    Authorization("E009", "Authorization Error"),
    ReportRender("E010", "Report Render Error"),
}

impl LmsError {
    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for LmsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for LmsError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for LmsError {
    fn from(err: sea_orm::DbErr) -> Self {
        LmsError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for LmsError {
    fn from(err: std::io::Error) -> Self {
        LmsError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for LmsError {
    fn from(err: serde_json::Error) -> Self {
        LmsError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for LmsError {
    fn from(err: chrono::ParseError) -> Self {
        LmsError::DateParse(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for LmsError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        LmsError::ReportRender(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LmsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(LmsError::database_config("test").code(), "E001");
        assert_eq!(LmsError::validation("test").code(), "E005");
        assert_eq!(LmsError::not_found("test").code(), "E006");
        assert_eq!(LmsError::report_render("test").code(), "E010");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            LmsError::validation("test").error_type(),
            "Validation Error"
        );
        assert_eq!(
            LmsError::authorization("test").error_type(),
            "Authorization Error"
        );
    }

    #[test]
    fn test_error_message() {
        let err = LmsError::validation("max_mark must be greater than zero");
        assert_eq!(err.message(), "max_mark must be greater than zero");
    }

    #[test]
    fn test_format_simple() {
        let err = LmsError::not_found("Course 42");
        let formatted = err.format_simple();
        assert!(formatted.contains("Resource Not Found"));
        assert!(formatted.contains("Course 42"));
    }

    #[test]
    fn test_db_err_conversion() {
        let err: LmsError = sea_orm::DbErr::Custom("boom".to_string()).into();
        assert_eq!(err.code(), "E003");
        assert!(err.message().contains("boom"));
    }
}
