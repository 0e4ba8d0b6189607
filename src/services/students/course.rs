use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashMap;

use crate::models::dashboards::{StudentCourseView, VideoWithProgress};
use crate::services::common::account_summaries;
use crate::utils::progress::summarize_course_progress;
use crate::utils::render_page;

use super::{StudentService, enrolled_course};

pub async fn handle_course_detail(
    service: &StudentService,
    request: &HttpRequest,
    course_id: i64,
) -> ActixResult<HttpResponse> {
    let member = require_member!(request);
    let storage = service.get_storage(request);

    let course = match enrolled_course(
        &storage,
        member.id(),
        course_id,
        "You are not enrolled in this course.",
    )
    .await
    {
        Ok(course) => course,
        Err(response) => return Ok(response),
    };

    let videos = try_or_500!(
        storage.list_course_videos(course.id).await,
        "Failed to load videos"
    );
    let progress = try_or_500!(
        storage
            .list_student_progress_for_course(member.id(), course.id)
            .await,
        "Failed to load progress"
    );
    let ratings = try_or_500!(
        storage
            .list_student_video_ratings_for_course(member.id(), course.id)
            .await,
        "Failed to load ratings"
    );

    let progress_by_video: HashMap<i64, _> = progress.iter().map(|p| (p.video_id, p)).collect();
    let rating_by_video: HashMap<i64, i32> =
        ratings.iter().map(|r| (r.video_id, r.rating)).collect();

    // 没有观看记录的视频按零进度展示，不写入记录
    let summary = summarize_course_progress(
        videos.len() as u64,
        progress.iter().map(|p| (p.completed, p.time_spent_seconds)),
    );
    let videos = videos
        .into_iter()
        .map(|video| {
            let row = progress_by_video.get(&video.id);
            VideoWithProgress {
                progress_percentage: row.map_or(0, |p| p.progress_percentage),
                completed: row.is_some_and(|p| p.completed),
                time_spent_seconds: row.map_or(0, |p| p.time_spent_seconds),
                my_rating: rating_by_video.get(&video.id).copied(),
                video,
            }
        })
        .collect();

    let trainer_ids = try_or_500!(
        storage.list_course_trainer_ids(course.id).await,
        "Failed to load trainers"
    );
    let trainer_map = try_or_500!(
        account_summaries(&storage, trainer_ids.iter().copied()).await,
        "Failed to load trainers"
    );
    let trainers = trainer_ids
        .iter()
        .filter_map(|id| trainer_map.get(id).cloned())
        .collect();

    let feedback = try_or_500!(
        storage.get_feedback(member.id(), course.id).await,
        "Failed to load feedback"
    );

    Ok(render_page(
        request,
        StudentCourseView {
            course,
            videos,
            summary,
            trainers,
            feedback,
        },
    ))
}
