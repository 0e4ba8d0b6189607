/*!
 * 基于角色的访问控制中间件
 *
 * 此中间件必须在 RequireAuth 之后执行。角色不符时不返回 403，
 * 而是带着提示跳转回调用者自己的角色首页。
 *
 * ```rust,ignore
 * web::scope("/dashboard")
 *     .wrap(RequireRole::new_any(Role::staff_roles()))  // 任一角色即可
 *     .wrap(RequireAuth)
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::info;

use crate::config::AppConfig;
use crate::middlewares::require_auth::LOGIN_REQUIRED_MESSAGE;
use crate::models::Notice;
use crate::models::accounts::{Member, Role};
use crate::utils::flash::redirect_with_notice;

#[derive(Clone)]
pub struct RequireRole {
    allowed_roles: Vec<Role>,
}

impl RequireRole {
    /// 创建需要特定角色的中间件
    pub fn new(role: Role) -> Self {
        Self {
            allowed_roles: vec![role],
        }
    }

    /// 创建需要任一角色的中间件
    pub fn new_any(roles: &[Role]) -> Self {
        Self {
            allowed_roles: roles.to_vec(),
        }
    }
}

/// 拒绝访问时的提示，例如 "Access denied. This page is only for Manager, Trainer."
pub fn access_denied_message(roles: &[Role]) -> String {
    let labels: Vec<&str> = roles.iter().map(|r| r.label()).collect();
    format!("Access denied. This page is only for {}.", labels.join(", "))
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleMiddleware {
            service: Rc::new(service),
            allowed_roles: self.allowed_roles.clone(),
        }))
    }
}

pub struct RequireRoleMiddleware<S> {
    service: Rc<S>,
    allowed_roles: Vec<Role>,
}

impl<S, B> Service<ServiceRequest> for RequireRoleMiddleware<S>
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
        let allowed_roles = self.allowed_roles.clone();

        Box::pin(async move {
            let member = req.extensions().get::<Member>().cloned();

            match member {
                Some(member) if allowed_roles.contains(&member.role()) => {
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Some(member) => {
                    info!(
                        "Access denied for account {} (role: {}) on {}. Allowed roles: {:?}",
                        member.id(),
                        member.role(),
                        req.path(),
                        allowed_roles
                    );
                    Ok(req.into_response(
                        redirect_with_notice(
                            member.role().dashboard_path(),
                            Notice::error(access_denied_message(&allowed_roles)),
                        )
                        .map_into_right_body(),
                    ))
                }
                None => {
                    info!(
                        "Role check failed: no account in request. Make sure RequireAuth runs first."
                    );
                    Ok(req.into_response(
                        redirect_with_notice(
                            &AppConfig::get().app.login_path,
                            Notice::error(LOGIN_REQUIRED_MESSAGE),
                        )
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_denied_message() {
        assert_eq!(
            access_denied_message(Role::student_roles()),
            "Access denied. This page is only for Student."
        );
        assert_eq!(
            access_denied_message(Role::staff_roles()),
            "Access denied. This page is only for Manager, Trainer."
        );
    }
}
