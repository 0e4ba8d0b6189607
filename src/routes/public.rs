use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::models::catalog::CourseListQuery;
use crate::services::PublicService;
use crate::utils::{SafeCountryId, SafeStateId};

static PUBLIC_SERVICE: Lazy<PublicService> = Lazy::new(PublicService::new_lazy);

pub async fn home(request: HttpRequest) -> ActixResult<HttpResponse> {
    PUBLIC_SERVICE.home(&request).await
}

pub async fn about(request: HttpRequest) -> ActixResult<HttpResponse> {
    PUBLIC_SERVICE.static_page(&request, "about").await
}

pub async fn contact(request: HttpRequest) -> ActixResult<HttpResponse> {
    PUBLIC_SERVICE.static_page(&request, "contact").await
}

pub async fn list_courses(
    request: HttpRequest,
    query: web::Query<CourseListQuery>,
) -> ActixResult<HttpResponse> {
    PUBLIC_SERVICE.list_courses(&request, query.into_inner()).await
}

pub async fn category(request: HttpRequest, path: web::Path<String>) -> ActixResult<HttpResponse> {
    PUBLIC_SERVICE.category(&request, &path.into_inner()).await
}

pub async fn course_detail(
    request: HttpRequest,
    path: web::Path<(String, String)>,
) -> ActixResult<HttpResponse> {
    let (instructor, slug) = path.into_inner();
    PUBLIC_SERVICE
        .course_detail(&request, &instructor, &slug)
        .await
}

pub async fn states(request: HttpRequest, country_id: SafeCountryId) -> ActixResult<HttpResponse> {
    PUBLIC_SERVICE.states(&request, country_id.0).await
}

pub async fn districts(request: HttpRequest, state_id: SafeStateId) -> ActixResult<HttpResponse> {
    PUBLIC_SERVICE.districts(&request, state_id.0).await
}

// 配置路由（课程详情是通配路径，必须最后注册）
pub fn configure_public_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(home))
        .route("/about/", web::get().to(about))
        .route("/contact/", web::get().to(contact))
        .route("/courses/", web::get().to(list_courses))
        .route("/courses/{category}/", web::get().to(category))
        .route("/ajax/states/{country_id}/", web::get().to(states))
        .route("/ajax/districts/{state_id}/", web::get().to(districts))
        .route("/{instructor}/course/{slug}/", web::get().to(course_detail));
}
