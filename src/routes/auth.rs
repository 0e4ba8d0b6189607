use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::accounts::{LoginForm, SignupForm};
use crate::services::AuthService;
use crate::utils::redirect_to;

// 懒加载的全局 AuthService 实例
static AUTH_SERVICE: Lazy<AuthService> = Lazy::new(AuthService::new_lazy);

pub async fn login_page(request: HttpRequest) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.login_page(&request).await
}

pub async fn login(req: HttpRequest, form: web::Form<LoginForm>) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.login(form.into_inner(), &req).await
}

pub async fn signup(req: HttpRequest, form: web::Form<SignupForm>) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.signup(form.into_inner(), &req).await
}

pub async fn logout(request: HttpRequest) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.logout(&request).await
}

pub async fn me(request: HttpRequest) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.me(&request).await
}

// 旧地址
pub async fn legacy_signup() -> HttpResponse {
    redirect_to("/accounts/signup/")
}

// 配置路由
pub fn configure_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/accounts")
            .service(
                web::resource("/login/")
                    .route(web::get().to(login_page))
                    .route(web::post().to(login).wrap(middlewares::RateLimit::login())),
            )
            .service(
                web::resource("/signup/")
                    .route(web::post().to(signup).wrap(middlewares::RateLimit::signup())),
            )
            .service(
                web::resource("/logout/")
                    .route(web::get().to(logout))
                    .route(web::post().to(logout)),
            )
            .service(
                web::resource("/me/")
                    .wrap(middlewares::RequireAuth)
                    .route(web::get().to(me)),
            ),
    )
    .route("/signup/", web::get().to(legacy_signup));
}
