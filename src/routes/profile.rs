use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{RequireAuth, RequireRole};
use crate::models::accounts::{CompleteProfileForm, Role};
use crate::services::ProfileService;

static PROFILE_SERVICE: Lazy<ProfileService> = Lazy::new(ProfileService::new_lazy);

pub async fn dashboard_home(request: HttpRequest) -> ActixResult<HttpResponse> {
    PROFILE_SERVICE.dashboard_home(&request).await
}

pub async fn complete_profile_page(request: HttpRequest) -> ActixResult<HttpResponse> {
    PROFILE_SERVICE.complete_profile_page(&request).await
}

pub async fn complete_profile(
    request: HttpRequest,
    form: web::Form<CompleteProfileForm>,
) -> ActixResult<HttpResponse> {
    PROFILE_SERVICE
        .complete_profile(&request, form.into_inner())
        .await
}

pub async fn profile(request: HttpRequest) -> ActixResult<HttpResponse> {
    PROFILE_SERVICE.profile(&request).await
}

pub async fn courses_enrolled(request: HttpRequest) -> ActixResult<HttpResponse> {
    PROFILE_SERVICE.courses_enrolled(&request).await
}

pub async fn courses_uploaded(request: HttpRequest) -> ActixResult<HttpResponse> {
    PROFILE_SERVICE.courses_uploaded(&request).await
}

pub async fn upload_page(request: HttpRequest) -> ActixResult<HttpResponse> {
    PROFILE_SERVICE.upload_page(&request).await
}

pub async fn upload(request: HttpRequest, payload: Multipart) -> ActixResult<HttpResponse> {
    PROFILE_SERVICE.upload(&request, payload).await
}

// 配置路由：任意已登录角色可访问，部分旧页面再按角色限制
pub fn configure_profile_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/dashboard/home/")
            .wrap(RequireAuth)
            .route(web::get().to(dashboard_home)),
    )
    .service(
        web::resource("/complete-profile/")
            .wrap(RequireAuth)
            .route(web::get().to(complete_profile_page))
            .route(web::post().to(complete_profile)),
    )
    .service(
        web::resource("/dashboard/profile/")
            .wrap(RequireAuth)
            .route(web::get().to(profile)),
    )
    .service(
        web::resource("/dashboard/courses-enrolled/")
            .wrap(RequireRole::new(Role::Student))
            .wrap(RequireAuth)
            .route(web::get().to(courses_enrolled)),
    )
    .service(
        web::resource("/dashboard/courses-uploaded/")
            .wrap(RequireRole::new_any(Role::staff_roles()))
            .wrap(RequireAuth)
            .route(web::get().to(courses_uploaded)),
    )
    .service(
        web::resource("/dashboard/upload/")
            .wrap(RequireRole::new_any(Role::staff_roles()))
            .wrap(RequireAuth)
            .route(web::get().to(upload_page))
            .route(web::post().to(upload)),
    );
}
