use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use tracing::info;

use crate::models::catalog::CourseVideo;
use crate::models::dashboards::RateVideoView;
use crate::models::learning::RatingForm;
use crate::models::{ErrorCode, Notice};
use crate::services::common::error_response;
use crate::storage::Storage;
use crate::utils::{redirect_with_error, redirect_with_notice, render_page, server_error};

use super::{DASHBOARD_PATH, StudentService, course_path};

/// 只有已选该视频所属课程的学生可以评分
async fn enrolled_video(
    storage: &Arc<dyn Storage>,
    student_id: i64,
    video_id: i64,
) -> Result<CourseVideo, HttpResponse> {
    let video = match storage.get_video(video_id).await {
        Ok(Some(video)) => video,
        Ok(None) => {
            return Err(redirect_with_error(
                DASHBOARD_PATH,
                ErrorCode::VideoNotFound,
                "Video not found.",
            ));
        }
        Err(e) => return Err(server_error("Failed to load video", e)),
    };

    match storage.is_enrolled(student_id, video.course_id).await {
        Ok(true) => Ok(video),
        Ok(false) => Err(redirect_with_error(
            DASHBOARD_PATH,
            ErrorCode::NotEnrolled,
            "You are not enrolled in this course.",
        )),
        Err(e) => Err(server_error("Failed to load enrollment", e)),
    }
}

pub async fn handle_rate_video_page(
    service: &StudentService,
    request: &HttpRequest,
    video_id: i64,
) -> ActixResult<HttpResponse> {
    let member = require_member!(request);
    let storage = service.get_storage(request);

    let video = match enrolled_video(&storage, member.id(), video_id).await {
        Ok(video) => video,
        Err(response) => return Ok(response),
    };
    let existing_rating = try_or_500!(
        storage.get_video_rating(video.id, member.id()).await,
        "Failed to load rating"
    );

    Ok(render_page(
        request,
        RateVideoView {
            video,
            existing_rating,
        },
    ))
}

pub async fn handle_rate_video(
    service: &StudentService,
    request: &HttpRequest,
    video_id: i64,
    form: RatingForm,
) -> ActixResult<HttpResponse> {
    let member = require_member!(request);
    let storage = service.get_storage(request);

    let video = match enrolled_video(&storage, member.id(), video_id).await {
        Ok(video) => video,
        Err(response) => return Ok(response),
    };
    let input = match form.validate() {
        Ok(input) => input,
        Err(e) => return Ok(error_response(e)),
    };

    try_or_500!(
        storage.upsert_video_rating(video.id, member.id(), input).await,
        "Failed to save rating"
    );
    info!("Student {} rated video {}", member.id(), video.id);

    Ok(redirect_with_notice(
        &course_path(video.course_id),
        Notice::success("Thank you for your rating!"),
    ))
}
