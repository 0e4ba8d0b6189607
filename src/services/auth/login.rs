use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use serde::Serialize;
use tracing::info;
use ts_rs::TS;

use crate::middlewares::RequireAuth;
use crate::models::accounts::{LoginForm, LoginResponse};
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::jwt::JwtUtils;
use crate::utils::password::verify_password;
use crate::utils::{redirect_to, render_page, server_error};

use super::AuthService;

const LOGIN_FAILED_MESSAGE: &str = "Username or password is incorrect.";

// 登录页
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "account.ts")]
pub struct LoginPageView {
    pub system_name: String,
}

pub async fn handle_login_page(
    service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    // 已登录直接去各自首页
    if let Some(member) = RequireAuth::try_authenticate(request).await {
        return Ok(redirect_to(member.role().dashboard_path()));
    }
    Ok(render_page(
        request,
        LoginPageView {
            system_name: service.get_config().app.system_name.clone(),
        },
    ))
}

pub async fn handle_login(
    service: &AuthService,
    form: LoginForm,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let config = service.get_config();

    // 1. 根据用户名或邮箱获取账号
    let account = match storage.get_account_by_login(form.username.trim()).await {
        Ok(Some(account)) => account,
        Ok(None) => return Ok(login_failed()),
        Err(e) => return Ok(server_error("Login failed", e)),
    };

    // 2. 验证密码
    if !verify_password(&form.password, &account.password_hash) {
        return Ok(login_failed());
    }

    // 3. 账号 + 资料，资料缺失时补建
    let member = match storage.get_member(account.id).await {
        Ok(Some(member)) => member,
        Ok(None) => return Ok(login_failed()),
        Err(e) => return Ok(server_error("Login failed", e)),
    };

    if let Err(e) = storage.update_last_login(account.id).await {
        tracing::warn!("Failed to update last login for {}: {}", account.id, e);
    }

    // 4. 生成令牌
    let token = match JwtUtils::generate_access_token(member.id(), &member.role().to_string()) {
        Ok(token) => token,
        Err(e) => return Ok(server_error("Login failed, unable to generate token", e)),
    };

    info!(
        "Account {} logged in as {}",
        member.account.username,
        member.role()
    );

    let redirect = member.role().dashboard_path().to_string();
    let response = LoginResponse {
        access_token: token.clone(),
        expires_in: config.jwt.access_token_expiry * 60,
        redirect_to: redirect.clone(),
        member,
    };

    Ok(HttpResponse::SeeOther()
        .insert_header((header::LOCATION, redirect))
        .cookie(JwtUtils::create_access_token_cookie(&token))
        .json(ApiResponse::success(response, "Login successful")))
}

fn login_failed() -> HttpResponse {
    HttpResponse::Unauthorized().json(ApiResponse::error_empty(
        ErrorCode::AuthFailed,
        LOGIN_FAILED_MESSAGE,
    ))
}
