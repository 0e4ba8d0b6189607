use actix_web::{
    HttpRequest, HttpResponse,
    error::{InternalError, JsonPayloadError, QueryPayloadError, UrlencodedError},
};
use tracing::debug;

use crate::models::{ApiResponse, ErrorCode};

fn bad_request(message: String) -> actix_web::Error {
    let response = HttpResponse::BadRequest().json(ApiResponse::error_empty(
        ErrorCode::BadRequest,
        message.clone(),
    ));
    InternalError::from_response(message, response).into()
}

/// 查询参数解析失败
pub fn query_error_handler(err: QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!("Query parameter error on {}: {}", req.path(), err);
    bad_request(format!("Invalid query parameters: {err}"))
}

/// JSON 请求体解析失败
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!("JSON payload error on {}: {}", req.path(), err);
    bad_request(format!("Invalid JSON payload: {err}"))
}

/// 表单请求体解析失败
pub fn form_error_handler(err: UrlencodedError, req: &HttpRequest) -> actix_web::Error {
    debug!("Form payload error on {}: {}", req.path(), err);
    bad_request(format!("Invalid form data: {err}"))
}
