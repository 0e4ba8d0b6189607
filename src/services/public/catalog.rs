use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::middlewares::RequireAuth;
use crate::models::accounts::Role;
use crate::models::catalog::{CategoryView, CourseDetailView, CourseListQuery};
use crate::models::{ErrorCode, normalize_page};
use crate::utils::{form_error_with, render_page};

use super::PublicService;

const RELATED_COURSE_COUNT: u64 = 3;

pub async fn handle_list_courses(
    service: &PublicService,
    request: &HttpRequest,
    query: CourseListQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let (page, size) = normalize_page(query.page, query.size);
    let search = query
        .search
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    let courses = try_or_500!(
        storage.list_courses(search, page, size).await,
        "Failed to list courses"
    );
    Ok(render_page(request, courses))
}

pub async fn handle_category(
    service: &PublicService,
    request: &HttpRequest,
    category: &str,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let courses = try_or_500!(
        storage.list_courses_by_category(category).await,
        "Failed to list courses"
    );

    Ok(render_page(
        request,
        CategoryView {
            category: category.to_string(),
            courses,
        },
    ))
}

pub async fn handle_course_detail(
    service: &PublicService,
    request: &HttpRequest,
    instructor: &str,
    slug: &str,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let account = match storage.get_account_by_login(instructor).await {
        Ok(Some(account)) if account.username == instructor => account,
        Ok(_) => return Ok(course_not_found()),
        Err(e) => return Ok(crate::utils::server_error("Failed to load course", e)),
    };

    let course = match storage.get_course_by_slug(account.id, slug).await {
        Ok(Some(course)) => course,
        Ok(None) => return Ok(course_not_found()),
        Err(e) => return Ok(crate::utils::server_error("Failed to load course", e)),
    };

    let related_courses = try_or_500!(
        storage
            .list_related_courses(course.id, &course.category, RELATED_COURSE_COUNT)
            .await,
        "Failed to load related courses"
    );

    // 匿名访问也可以看详情，只有学生才有选课状态
    let enrolled = match RequireAuth::try_authenticate(request).await {
        Some(member) if member.role() == Role::Student => try_or_500!(
            storage.is_enrolled(member.id(), course.id).await,
            "Failed to load enrollment"
        ),
        _ => false,
    };

    Ok(render_page(
        request,
        CourseDetailView {
            instructor: account.summary(),
            course,
            related_courses,
            enrolled,
        },
    ))
}

fn course_not_found() -> HttpResponse {
    form_error_with(
        StatusCode::NOT_FOUND,
        ErrorCode::CourseNotFound,
        "Course not found.",
    )
}
