use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::dashboards::{EnrolledCourse, PaymentWithCourse, StudentDashboard};
use crate::services::common::{course_summaries, student_course_progress};
use crate::utils::render_page;

use super::StudentService;

pub async fn handle_dashboard(
    service: &StudentService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let member = require_member!(request);
    let storage = service.get_storage(request);

    let enrollments = try_or_500!(
        storage.list_student_enrollments(member.id()).await,
        "Failed to load enrollments"
    );
    let course_ids: Vec<i64> = enrollments.iter().map(|e| e.course_id).collect();
    let courses = try_or_500!(
        storage.list_courses_by_ids(&course_ids).await,
        "Failed to load courses"
    );

    // 进度每次从记录重新计算
    let mut enrolled = Vec::with_capacity(enrollments.len());
    for enrollment in &enrollments {
        let Some(course) = courses.iter().find(|c| c.id == enrollment.course_id) else {
            continue;
        };
        let total_videos = try_or_500!(
            storage.count_course_videos(course.id).await,
            "Failed to count videos"
        );
        let progress = try_or_500!(
            student_course_progress(&storage, member.id(), course.id, total_videos).await,
            "Failed to load progress"
        );
        enrolled.push(EnrolledCourse {
            course: course.clone(),
            enrolled_at: enrollment.enrolled_at,
            progress,
        });
    }

    let payments = try_or_500!(
        storage.list_student_payments(member.id()).await,
        "Failed to load payments"
    );
    let payment_courses = try_or_500!(
        course_summaries(&storage, payments.iter().map(|p| p.course_id)).await,
        "Failed to load courses"
    );
    let payments = payments
        .into_iter()
        .map(|payment| PaymentWithCourse {
            course: payment_courses.get(&payment.course_id).cloned(),
            payment,
        })
        .collect();

    Ok(render_page(
        request,
        StudentDashboard {
            student: member.account.summary(),
            courses: enrolled,
            payments,
        },
    ))
}
