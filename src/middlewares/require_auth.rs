/*!
 * 登录认证中间件
 *
 * 受保护页面都挂在该中间件之后，通过认证的请求会在扩展中带上当前用户 [`Member`]。
 *
 * ## 使用方法
 *
 * ```rust,ignore
 * use actix_web::web;
 * use crate::middlewares::{RequireAuth, RequireRole};
 * use crate::models::accounts::Role;
 *
 * web::scope("/student")
 *     .wrap(RequireRole::new_any(Role::student_roles()))
 *     .wrap(RequireAuth)
 *     .route("/dashboard/", web::get().to(dashboard));
 * ```
 *
 * 注意 actix 中后注册的 wrap 先执行，因此 `RequireAuth` 要写在 `RequireRole` 之后。
 *
 * ## 认证流程
 *
 * 1. 从 `Authorization: Bearer <token>` 或 `access_token` cookie 中取出令牌
 * 2. 校验 JWT，按令牌查缓存，未命中时读取账号
 * 3. 确保账号存在资料（缺失时以学生角色补建，可重复执行）
 * 4. 失败时 303 跳转到登录页并附带提示
 */

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::models::Notice;
use crate::models::accounts::Member;
use crate::storage::Storage;
use crate::utils::flash::redirect_with_notice;
use crate::utils::jwt::JwtUtils;
use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpRequest,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, info};

use super::create_error_response;
use crate::models::ErrorCode;

pub const LOGIN_REQUIRED_MESSAGE: &str = "Please login to access this page.";

#[derive(Clone)]
pub struct RequireAuth;

/// 账号缓存键
pub fn account_cache_key(token: &str) -> String {
    format!("account:{token}")
}

// 辅助函数：校验令牌并取出当前用户
async fn authenticate(req: &HttpRequest) -> Result<Member, String> {
    let token = JwtUtils::extract_access_token(req)
        .ok_or_else(|| "Missing access token".to_string())?;

    let claims = JwtUtils::verify_access_token(&token).map_err(|err| {
        info!("JWT token validation failed: {}", err);
        "Invalid JWT token".to_string()
    })?;

    let cache = req
        .app_data::<web::Data<Arc<dyn ObjectCache>>>()
        .map(|data| data.get_ref().clone());
    let cache_key = account_cache_key(&token);

    // 先查缓存
    if let Some(cache) = &cache {
        match cache.get_raw(&cache_key).await {
            CacheResult::Found(json) => match serde_json::from_str::<Member>(&json) {
                Ok(member) => return Ok(member),
                Err(_) => {
                    cache.remove(&cache_key).await;
                    info!("Failed to deserialize cached account, entry dropped");
                }
            },
            _ => debug!("Account not found in cache"),
        }
    }

    let storage = req
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .ok_or_else(|| "Storage not configured".to_string())?
        .get_ref()
        .clone();

    let account_id = claims
        .account_id()
        .ok_or_else(|| "Invalid account ID in JWT".to_string())?;

    // get_member 会在资料缺失时补建
    let member = storage
        .get_member(account_id)
        .await
        .map_err(|err| format!("Failed to load account: {err}"))?
        .ok_or_else(|| "Account not found".to_string())?;

    if let Some(cache) = &cache
        && let Ok(json) = serde_json::to_string(&member)
    {
        cache
            .insert_raw(cache_key, json, AppConfig::get().cache.default_ttl)
            .await;
    }

    Ok(member)
}

impl<S, B> Transform<S, ServiceRequest> for RequireAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireAuthMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireAuthMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        Box::pin(async move {
            // 处理 OPTIONS 请求
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(req.into_response(
                    create_error_response(StatusCode::NO_CONTENT, ErrorCode::Success, "")
                        .map_into_right_body(),
                ));
            }

            match authenticate(req.request()).await {
                Ok(member) => {
                    debug!("Authentication successful for account {}", member.id());
                    req.extensions_mut().insert(member);
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Err(err) => {
                    info!("Authentication failed for request to {}: {}", req.path(), err);
                    let login_path = &AppConfig::get().app.login_path;
                    Ok(req.into_response(
                        redirect_with_notice(login_path, Notice::error(LOGIN_REQUIRED_MESSAGE))
                            .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

// 辅助函数：从请求中提取用户信息
impl RequireAuth {
    /// 从请求扩展中取出当前用户
    /// 此函数应该在应用了 RequireAuth 中间件的路由处理程序中使用
    pub fn extract_member(req: &HttpRequest) -> Option<Member> {
        req.extensions().get::<Member>().cloned()
    }

    /// 公开页面上可选的登录状态，令牌缺失或无效时返回 None
    pub async fn try_authenticate(req: &HttpRequest) -> Option<Member> {
        if let Some(member) = Self::extract_member(req) {
            return Some(member);
        }
        authenticate(req).await.ok()
    }
}
