//! 路径参数提取器
//!
//! 路径中的 ID 必须是正整数，否则直接返回 400，避免每个处理函数重复校验。

use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, error::InternalError};
use futures_util::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};

fn bad_path_parameter(name: &str, raw: Option<&str>) -> actix_web::Error {
    let message = match raw {
        Some(value) => format!("Invalid path parameter '{name}': {value}"),
        None => format!("Missing path parameter '{name}'"),
    };
    let response =
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, &message));
    InternalError::from_response(message, response).into()
}

/// 解析正整数路径参数
pub fn parse_positive_id(req: &HttpRequest, name: &str) -> Result<i64, actix_web::Error> {
    let raw = req.match_info().get(name);
    raw.and_then(|v| v.parse::<i64>().ok())
        .filter(|id| *id > 0)
        .ok_or_else(|| bad_path_parameter(name, raw))
}

macro_rules! define_safe_i64_extractor {
    ($($name:ident => $param:literal),* $(,)?) => {
        $(
            #[derive(Debug, Clone, Copy)]
            pub struct $name(pub i64);

            impl FromRequest for $name {
                type Error = actix_web::Error;
                type Future = Ready<Result<Self, Self::Error>>;

                fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
                    ready(parse_positive_id(req, $param).map($name))
                }
            }
        )*
    };
}

define_safe_i64_extractor! {
    SafeCourseId => "course_id",
    SafeVideoId => "video_id",
    SafeTrainerId => "trainer_id",
    SafePaymentId => "payment_id",
    SafeAssignmentId => "assignment_id",
    SafeCountryId => "country_id",
    SafeStateId => "state_id",
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_parse_positive_id() {
        let req = TestRequest::default()
            .param("course_id", "15")
            .to_http_request();
        assert_eq!(parse_positive_id(&req, "course_id").ok(), Some(15));

        let req = TestRequest::default()
            .param("course_id", "-3")
            .to_http_request();
        assert!(parse_positive_id(&req, "course_id").is_err());

        let req = TestRequest::default()
            .param("course_id", "abc")
            .to_http_request();
        assert!(parse_positive_id(&req, "course_id").is_err());

        let req = TestRequest::default().to_http_request();
        assert!(parse_positive_id(&req, "course_id").is_err());
    }
}
