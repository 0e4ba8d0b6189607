//! 一次性页面提示（flash）与重定向响应

use actix_web::{
    HttpRequest, HttpResponse,
    cookie::{Cookie, SameSite, time::Duration},
    http::{StatusCode, header},
};
use serde::Serialize;
use ts_rs::TS;

use crate::models::{ApiResponse, ErrorCode, Notice, Page, RedirectPayload};

pub const FLASH_COOKIE: &str = "flash";

fn flash_cookie(notice: &Notice) -> Option<Cookie<'static>> {
    let encoded = serde_json::to_string(notice).ok()?;
    Some(
        Cookie::build(FLASH_COOKIE, urlencoding::encode(&encoded).into_owned())
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .finish(),
    )
}

fn expired_flash_cookie() -> Cookie<'static> {
    Cookie::build(FLASH_COOKIE, "")
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(Duration::ZERO)
        .finish()
}

/// 读取请求中待展示的提示
pub fn peek_notice(req: &HttpRequest) -> Option<Notice> {
    let cookie = req.cookie(FLASH_COOKIE)?;
    let decoded = urlencoding::decode(cookie.value()).ok()?;
    serde_json::from_str(&decoded).ok()
}

fn redirect_response(location: &str, code: ErrorCode, notice: Notice) -> HttpResponse {
    let mut builder = HttpResponse::SeeOther();
    builder.insert_header((header::LOCATION, location.to_string()));
    if let Some(cookie) = flash_cookie(&notice) {
        builder.cookie(cookie);
    }
    builder.json(ApiResponse::error(
        code,
        RedirectPayload {
            redirect_to: location.to_string(),
            level: notice.level,
        },
        notice.message,
    ))
}

/// 303 重定向并附带提示
pub fn redirect_with_notice(location: &str, notice: Notice) -> HttpResponse {
    redirect_response(location, ErrorCode::Success, notice)
}

/// 303 重定向并附带错误提示，响应体中带上业务错误码
pub fn redirect_with_error(location: &str, code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    redirect_response(location, code, Notice::error(message))
}

/// 不带提示的 303 重定向
pub fn redirect_to(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location.to_string()))
        .json(ApiResponse::success_empty(format!("Redirecting to {location}")))
}

/// 页面视图响应，取出并清除 flash 提示
pub fn render_page<T>(req: &HttpRequest, view: T) -> HttpResponse
where
    T: Serialize + TS,
{
    let notice = peek_notice(req);
    let mut builder = HttpResponse::Ok();
    if notice.is_some() {
        builder.cookie(expired_flash_cookie());
    }
    builder.json(ApiResponse::success(Page { notice, view }, "OK"))
}

/// 带错误提示的表单响应，不做任何写入
pub fn form_error_with(status: StatusCode, code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    let message = message.into();
    HttpResponse::build(status).json(ApiResponse::error(
        code,
        Notice::error(message.clone()),
        message,
    ))
}

/// 表单校验失败：400
pub fn form_error(message: impl Into<String>) -> HttpResponse {
    form_error_with(StatusCode::BAD_REQUEST, ErrorCode::ValidationFailed, message)
}

/// 存储层等意外错误：500
pub fn server_error(context: &str, err: impl std::fmt::Display) -> HttpResponse {
    tracing::error!("{}: {}", context, err);
    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
        ErrorCode::InternalServerError,
        format!("{context}: {err}"),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NoticeLevel;
    use actix_web::test::TestRequest;

    #[test]
    fn test_redirect_with_notice_sets_location_and_cookie() {
        let resp = redirect_with_notice("/student/dashboard/", Notice::success("Saved"));
        assert_eq!(resp.status(), actix_web::http::StatusCode::SEE_OTHER);
        assert_eq!(
            resp.headers().get(header::LOCATION).and_then(|v| v.to_str().ok()),
            Some("/student/dashboard/")
        );
        let cookie = resp
            .cookies()
            .find(|c| c.name() == FLASH_COOKIE)
            .expect("flash cookie");
        let decoded = urlencoding::decode(cookie.value()).expect("decode");
        let notice: Notice = serde_json::from_str(&decoded).expect("notice json");
        assert_eq!(notice.level, NoticeLevel::Success);
        assert_eq!(notice.message, "Saved");
    }

    #[test]
    fn test_redirect_with_error_carries_code() {
        let resp = redirect_with_error("/manager/dashboard/", ErrorCode::UserNotFound, "Gone");
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert!(resp.cookies().any(|c| c.name() == FLASH_COOKIE));
    }

    #[test]
    fn test_form_error_is_bad_request() {
        assert_eq!(form_error("Missing title").status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            form_error_with(StatusCode::CONFLICT, ErrorCode::Conflict, "Dup").status(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_peek_notice_reads_cookie() {
        let encoded = urlencoding::encode(r#"{"level":"info","message":"Hi"}"#).into_owned();
        let req = TestRequest::default()
            .cookie(Cookie::new(FLASH_COOKIE, encoded))
            .to_http_request();
        assert_eq!(peek_notice(&req), Some(Notice::info("Hi")));

        let req = TestRequest::default()
            .cookie(Cookie::new(FLASH_COOKIE, "garbage"))
            .to_http_request();
        assert_eq!(peek_notice(&req), None);
    }

    #[test]
    fn test_render_page_clears_flash() {
        let encoded = urlencoding::encode(r#"{"level":"error","message":"Oops"}"#).into_owned();
        let req = TestRequest::default()
            .cookie(Cookie::new(FLASH_COOKIE, encoded))
            .to_http_request();
        let resp = render_page(&req, "view".to_string());
        assert_eq!(resp.status(), actix_web::http::StatusCode::OK);
        let cleared = resp
            .cookies()
            .find(|c| c.name() == FLASH_COOKIE)
            .expect("cleared cookie");
        assert_eq!(cleared.value(), "");
    }
}
