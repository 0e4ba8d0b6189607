use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashMap;

use crate::models::catalog::CourseSummary;
use crate::models::dashboards::{CourseAnalytics, FeedbackOverview, ProgressAnalysis};
use crate::utils::pricing::round_to;
use crate::utils::progress::{average_rating, progress_percentage};
use crate::utils::render_page;

use super::{ManagerService, feedback_rows};

pub async fn handle_view_feedback(
    service: &ManagerService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let feedbacks = try_or_500!(storage.list_feedback(None).await, "Failed to load feedback");
    let average_rating = average_rating(feedbacks.iter().map(|f| f.rating));
    let feedbacks = try_or_500!(
        feedback_rows(&storage, feedbacks).await,
        "Failed to load feedback"
    );

    Ok(render_page(
        request,
        FeedbackOverview {
            feedbacks,
            average_rating,
        },
    ))
}

/// 每门课程已选学生的平均完成度，课程没有学生或视频时为 0
pub async fn handle_analyze_progress(
    service: &ManagerService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let courses = try_or_500!(storage.list_all_courses().await, "Failed to load courses");
    let mut analytics = Vec::with_capacity(courses.len());

    for course in &courses {
        let enrollments = try_or_500!(
            storage.list_course_enrollments(course.id).await,
            "Failed to load enrollments"
        );
        let total_videos = try_or_500!(
            storage.count_course_videos(course.id).await,
            "Failed to count videos"
        );
        let total_students = enrollments.len() as u64;

        let average_progress = if total_students == 0 || total_videos == 0 {
            0.0
        } else {
            let progress = try_or_500!(
                storage.list_progress_for_course(course.id).await,
                "Failed to load progress"
            );
            let mut completed: HashMap<i64, u64> = HashMap::new();
            for row in progress.iter().filter(|p| p.completed) {
                *completed.entry(row.student_id).or_default() += 1;
            }
            let total: f64 = enrollments
                .iter()
                .map(|e| {
                    let done = completed.get(&e.student_id).copied().unwrap_or(0);
                    progress_percentage(done.min(total_videos), total_videos)
                })
                .sum();
            round_to(total / total_students as f64, 1)
        };

        analytics.push(CourseAnalytics {
            course: CourseSummary::from(course),
            total_students,
            total_videos,
            average_progress,
        });
    }

    Ok(render_page(request, ProgressAnalysis { courses: analytics }))
}
