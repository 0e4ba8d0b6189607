use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use crate::errors::LmsError;
use crate::models::accounts::{Location, NewAccount, Role, SignupForm};
use crate::models::{ErrorCode, Notice};
use crate::services::common::{account_conflict, check_new_account};
use crate::utils::jwt::JwtUtils;
use crate::utils::password::hash_password;
use crate::utils::{form_error_with, redirect_with_notice, server_error};

use super::AuthService;

const COMPLETE_PROFILE_PATH: &str = "/complete-profile/";

pub async fn handle_signup(
    service: &AuthService,
    form: SignupForm,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let username = form.username.trim().to_string();
    let email = form.email.trim().to_string();

    // 1. 格式校验和重复检查
    if let Some(confirm) = &form.password_confirm
        && confirm != &form.password
    {
        return Ok(form_error_with(
            StatusCode::BAD_REQUEST,
            ErrorCode::UserPasswordInvalid,
            "Passwords do not match.",
        ));
    }
    if let Err(response) = check_new_account(&storage, &username, &email, &form.password).await {
        return Ok(response);
    }

    // 2. 创建账号，资料以学生角色同时创建
    let password_hash = match hash_password(&form.password) {
        Ok(hash) => hash,
        Err(e) => return Ok(server_error("Register failed", e)),
    };

    let member = match storage
        .create_account(NewAccount {
            username,
            email,
            password_hash,
            first_name: form.first_name.trim().to_string(),
            last_name: form.last_name.trim().to_string(),
            role: Role::Student,
            location: Location::default(),
        })
        .await
    {
        Ok(member) => member,
        Err(LmsError::Conflict(_)) => return Ok(account_conflict()),
        Err(e) => return Ok(server_error("Register failed", e)),
    };

    info!("Account {} signed up", member.account.username);

    // 3. 注册后直接登录，先去完善资料
    let token = match JwtUtils::generate_access_token(member.id(), &member.role().to_string()) {
        Ok(token) => token,
        Err(e) => return Ok(server_error("Failed to generate access token", e)),
    };

    let mut response = redirect_with_notice(
        COMPLETE_PROFILE_PATH,
        Notice::success("Account created successfully! Please complete your profile."),
    );
    if let Err(e) = response.add_cookie(&JwtUtils::create_access_token_cookie(&token)) {
        return Ok(server_error("Failed to set session cookie", e));
    }
    Ok(response)
}
