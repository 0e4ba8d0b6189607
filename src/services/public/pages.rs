use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::catalog::{HomeView, StaticPageView};
use crate::utils::render_page;

use super::PublicService;

const HOME_COURSE_COUNT: u64 = 6;

pub async fn handle_home(
    service: &PublicService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let courses = try_or_500!(
        storage.list_latest_courses(HOME_COURSE_COUNT).await,
        "Failed to load courses"
    );

    Ok(render_page(
        request,
        HomeView {
            system_name: service.get_config().app.system_name.clone(),
            courses,
        },
    ))
}

pub async fn handle_static_page(
    service: &PublicService,
    request: &HttpRequest,
    page: &str,
) -> ActixResult<HttpResponse> {
    Ok(render_page(
        request,
        StaticPageView {
            page: page.to_string(),
            system_name: service.get_config().app.system_name.clone(),
        },
    ))
}
