use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashMap;

use crate::models::dashboards::{CourseStudentsView, StudentProgressRow};
use crate::services::common::account_summaries;
use crate::utils::progress::summarize_course_progress;
use crate::utils::render_page;

use super::{TrainerService, assigned_course};

pub async fn handle_course_students(
    service: &TrainerService,
    request: &HttpRequest,
    course_id: i64,
) -> ActixResult<HttpResponse> {
    let member = require_member!(request);
    let storage = service.get_storage(request);

    let course = match assigned_course(&storage, member.id(), course_id).await {
        Ok(course) => course,
        Err(response) => return Ok(response),
    };

    let enrollments = try_or_500!(
        storage.list_course_enrollments(course.id).await,
        "Failed to load enrollments"
    );
    let total_videos = try_or_500!(
        storage.count_course_videos(course.id).await,
        "Failed to count videos"
    );
    let progress = try_or_500!(
        storage.list_progress_for_course(course.id).await,
        "Failed to load progress"
    );
    let students = try_or_500!(
        account_summaries(&storage, enrollments.iter().map(|e| e.student_id)).await,
        "Failed to load students"
    );

    let mut by_student: HashMap<i64, Vec<(bool, i64)>> = HashMap::new();
    for row in &progress {
        by_student
            .entry(row.student_id)
            .or_default()
            .push((row.completed, row.time_spent_seconds));
    }

    let students = enrollments
        .iter()
        .filter_map(|enrollment| {
            let student = students.get(&enrollment.student_id)?.clone();
            let rows = by_student
                .get(&enrollment.student_id)
                .cloned()
                .unwrap_or_default();
            Some(StudentProgressRow {
                student,
                enrolled_at: enrollment.enrolled_at,
                progress: summarize_course_progress(total_videos, rows),
            })
        })
        .collect();

    Ok(render_page(request, CourseStudentsView { course, students }))
}
