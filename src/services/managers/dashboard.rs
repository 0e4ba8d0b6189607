use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashMap;

use crate::models::accounts::Role;
use crate::models::dashboards::{
    CourseOverview, EnrollmentRow, ManagerDashboard, ManagerTotals, TrainerOverview,
    TrainerRatingRow, VideoRatingRow,
};
use crate::services::common::{account_summaries, course_summaries};
use crate::utils::progress::average_rating;
use crate::utils::render_page;

use super::{ManagerService, feedback_rows};

const LATEST_RATINGS: u64 = 20;
const LATEST_ENROLLMENTS: u64 = 10;
const LATEST_FEEDBACK: usize = 5;

pub async fn handle_dashboard(
    service: &ManagerService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    // 1. 总数
    let totals = ManagerTotals {
        total_courses: try_or_500!(storage.count_courses().await, "Failed to count courses"),
        total_students: try_or_500!(
            storage.count_by_role(Role::Student).await,
            "Failed to count students"
        ),
        total_trainers: try_or_500!(
            storage.count_by_role(Role::Trainer).await,
            "Failed to count trainers"
        ),
        total_enrollments: try_or_500!(
            storage.count_enrollments().await,
            "Failed to count enrollments"
        ),
    };

    // 2. 课程
    let all_courses = try_or_500!(storage.list_all_courses().await, "Failed to load courses");
    let instructors = try_or_500!(
        account_summaries(&storage, all_courses.iter().map(|c| c.instructor_id)).await,
        "Failed to load instructors"
    );
    let mut courses = Vec::with_capacity(all_courses.len());
    for course in all_courses {
        let num_students = try_or_500!(
            storage.count_course_students(course.id).await,
            "Failed to count students"
        );
        let num_videos = try_or_500!(
            storage.count_course_videos(course.id).await,
            "Failed to count videos"
        );
        let feedback = try_or_500!(
            storage.list_course_feedback(course.id).await,
            "Failed to load feedback"
        );
        courses.push(CourseOverview {
            instructor: instructors.get(&course.instructor_id).cloned(),
            num_students,
            num_videos,
            average_feedback: average_rating(feedback.iter().map(|f| f.rating)),
            course,
        });
    }

    // 3. 教练，按加入时间倒序
    let mut trainer_members = try_or_500!(
        storage.list_members_by_role(Role::Trainer).await,
        "Failed to load trainers"
    );
    trainer_members.sort_by(|a, b| b.account.created_at.cmp(&a.account.created_at));
    let mut trainers = Vec::with_capacity(trainer_members.len());
    for member in trainer_members {
        let assignments = try_or_500!(
            storage.list_trainer_assignments(member.id()).await,
            "Failed to load assignments"
        );
        let ratings = try_or_500!(
            storage.list_trainer_ratings(member.id()).await,
            "Failed to load ratings"
        );
        trainers.push(TrainerOverview {
            trainer: member.account.summary(),
            num_courses: assignments.len() as u64,
            average_rating: average_rating(ratings.iter().map(|r| r.rating)),
            num_ratings: ratings.len() as u64,
            joined_at: member.account.created_at,
        });
    }

    // 4. 最近的评分
    let latest_trainer_ratings = try_or_500!(
        storage.list_latest_trainer_ratings(LATEST_RATINGS).await,
        "Failed to load ratings"
    );
    let latest_video_ratings = try_or_500!(
        storage.list_latest_video_ratings(LATEST_RATINGS).await,
        "Failed to load ratings"
    );
    let people = try_or_500!(
        account_summaries(
            &storage,
            latest_trainer_ratings
                .iter()
                .flat_map(|r| [r.trainer_id, r.student_id])
                .chain(latest_video_ratings.iter().map(|r| r.student_id)),
        )
        .await,
        "Failed to load accounts"
    );
    let video_ids: Vec<i64> = latest_video_ratings.iter().map(|r| r.video_id).collect();
    let videos: HashMap<i64, _> = try_or_500!(
        storage.list_videos_by_ids(&video_ids).await,
        "Failed to load videos"
    )
    .into_iter()
    .map(|v| (v.id, v))
    .collect();

    let trainer_ratings = latest_trainer_ratings
        .into_iter()
        .map(|rating| TrainerRatingRow {
            trainer: people.get(&rating.trainer_id).cloned(),
            student: people.get(&rating.student_id).cloned(),
            rating,
        })
        .collect();
    let video_ratings = latest_video_ratings
        .into_iter()
        .map(|rating| VideoRatingRow {
            video: videos.get(&rating.video_id).cloned(),
            student: people.get(&rating.student_id).cloned(),
            rating,
        })
        .collect();

    // 5. 反馈与最近选课
    let all_feedback = try_or_500!(
        feedback_rows(
            &storage,
            try_or_500!(storage.list_feedback(None).await, "Failed to load feedback")
        )
        .await,
        "Failed to load feedback"
    );
    let recent_feedback = all_feedback.iter().take(LATEST_FEEDBACK).cloned().collect();

    let enrollments = try_or_500!(
        storage.list_latest_enrollments(LATEST_ENROLLMENTS).await,
        "Failed to load enrollments"
    );
    let students = try_or_500!(
        account_summaries(&storage, enrollments.iter().map(|e| e.student_id)).await,
        "Failed to load students"
    );
    let enrolled_courses = try_or_500!(
        course_summaries(&storage, enrollments.iter().map(|e| e.course_id)).await,
        "Failed to load courses"
    );
    let recent_enrollments = enrollments
        .into_iter()
        .map(|enrollment| EnrollmentRow {
            student: students.get(&enrollment.student_id).cloned(),
            course: enrolled_courses.get(&enrollment.course_id).cloned(),
            enrollment,
        })
        .collect();

    Ok(render_page(
        request,
        ManagerDashboard {
            totals,
            courses,
            trainers,
            trainer_ratings,
            video_ratings,
            all_feedback,
            recent_enrollments,
            recent_feedback,
        },
    ))
}
