use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::Notice;
use crate::services::common::forget_cached_account;
use crate::utils::jwt::JwtUtils;
use crate::utils::redirect_with_notice;

/// 清除 access_token cookie 和账号缓存
pub async fn handle_logout(request: &HttpRequest) -> ActixResult<HttpResponse> {
    forget_cached_account(request).await;

    let mut response = redirect_with_notice("/", Notice::info("You have been logged out."));
    if let Err(e) = response.add_cookie(&JwtUtils::create_empty_access_token_cookie()) {
        tracing::warn!("Failed to clear session cookie: {}", e);
    }
    Ok(response)
}
