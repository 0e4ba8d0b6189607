use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::accounts::{MyCoursesView, ProfileView};
use crate::utils::render_page;

use super::ProfileService;

pub async fn handle_profile(request: &HttpRequest) -> ActixResult<HttpResponse> {
    let member = require_member!(request);
    Ok(render_page(request, ProfileView { member }))
}

pub async fn handle_courses_enrolled(
    service: &ProfileService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let member = require_member!(request);
    let storage = service.get_storage(request);

    let enrollments = try_or_500!(
        storage.list_student_enrollments(member.id()).await,
        "Failed to load enrollments"
    );
    let ids: Vec<i64> = enrollments.iter().map(|e| e.course_id).collect();
    let courses = try_or_500!(
        storage.list_courses_by_ids(&ids).await,
        "Failed to load courses"
    );

    Ok(render_page(request, MyCoursesView { courses }))
}

pub async fn handle_courses_uploaded(
    service: &ProfileService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let member = require_member!(request);
    let storage = service.get_storage(request);

    let courses = try_or_500!(
        storage.list_courses_by_instructor(member.id()).await,
        "Failed to load courses"
    );
    Ok(render_page(request, MyCoursesView { courses }))
}
