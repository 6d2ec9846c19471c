//! 安全的路径参数提取器
//!
//! 路径参数解析失败时返回统一的 `ApiResponse`，而不是 actix 默认的纯文本 404。

use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, error::InternalError};
use std::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};

macro_rules! define_safe_i64_extractor {
    ($name:ident, $param:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name(pub i64);

        impl FromRequest for $name {
            type Error = actix_web::Error;
            type Future = Ready<Result<Self, Self::Error>>;

            fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
                ready(parse_i64_param(req, $param).map($name))
            }
        }
    };
}

fn parse_i64_param(req: &HttpRequest, name: &str) -> Result<i64, actix_web::Error> {
    let raw = req.match_info().get(name).unwrap_or_default();
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => {
            let response = HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::BadRequest,
                format!("Invalid path parameter '{name}': '{raw}'"),
            ));
            Err(InternalError::from_response(
                format!("invalid path parameter {name}"),
                response,
            )
            .into())
        }
    }
}

define_safe_i64_extractor!(SafeIDI64, "id");
define_safe_i64_extractor!(SafeCourseIdI64, "course_id");
define_safe_i64_extractor!(SafeParticipantIdI64, "participant_id");

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn test_valid_id() {
        let req = TestRequest::default()
            .param("course_id", "42")
            .to_http_request();
        let id = SafeCourseIdI64::extract(&req).await.unwrap();
        assert_eq!(id, SafeCourseIdI64(42));
    }

    #[actix_web::test]
    async fn test_invalid_id_rejected() {
        for raw in ["abc", "0", "-3", ""] {
            let req = TestRequest::default().param("id", raw).to_http_request();
            assert!(SafeIDI64::extract(&req).await.is_err(), "{raw} accepted");
        }
    }
}
