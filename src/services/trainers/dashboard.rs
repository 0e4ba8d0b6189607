use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::dashboards::TrainerDashboard;
use crate::utils::progress::average_rating;
use crate::utils::render_page;

use super::TrainerService;

pub async fn handle_dashboard(
    service: &TrainerService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let member = require_member!(request);
    let storage = service.get_storage(request);

    let assignments = try_or_500!(
        storage.list_trainer_assignments(member.id()).await,
        "Failed to load assignments"
    );
    let course_ids: Vec<i64> = assignments.iter().map(|a| a.course_id).collect();
    let courses = try_or_500!(
        storage.list_courses_by_ids(&course_ids).await,
        "Failed to load courses"
    );
    let total_students = try_or_500!(
        storage.count_distinct_students(&course_ids).await,
        "Failed to count students"
    );
    let ratings = try_or_500!(
        storage.list_trainer_ratings(member.id()).await,
        "Failed to load ratings"
    );
    let contact = try_or_500!(
        storage.get_trainer_contact(member.id()).await,
        "Failed to load contact"
    );

    Ok(render_page(
        request,
        TrainerDashboard {
            trainer: member.account.summary(),
            num_courses: courses.len() as u64,
            courses,
            total_students,
            average_rating: average_rating(ratings.iter().map(|r| r.rating)),
            rating_count: ratings.len() as u64,
            contact,
        },
    ))
}
