use serde::Serialize;
use ts_rs::TS;

/// 业务错误码
///
/// 0 为成功；1xxx 请求错误；2xxx 资源不存在；3xxx 权限；5xxx 服务端错误。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/api.ts")]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    BadRequest = 1000,
    ValidationFailed = 1001,
    UserAlreadyExists = 1002,
    CourseAlreadyExists = 1003,

    NotFound = 2000,
    UserNotFound = 2001,
    CourseNotFound = 2002,
    AssignmentNotFound = 2003,
    SubmissionNotFound = 2004,
    GradeNotFound = 2005,

    Forbidden = 3000,
    MarkerNotAllowed = 3001,

    InternalServerError = 5000,
    ReportGenerationFailed = 5001,
}
