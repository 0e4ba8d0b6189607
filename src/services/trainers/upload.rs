use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use crate::models::Notice;
use crate::models::catalog::{UploadVideoView, VideoForm, VideoInput};
use crate::services::common::error_response;
use crate::utils::multipart::{MultipartForm, UploadKind};
use crate::utils::{form_error, redirect_with_notice, render_page};

use super::{TrainerService, assigned_course};

pub async fn handle_upload_video_page(
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
    let videos = try_or_500!(
        storage.list_course_videos(course.id).await,
        "Failed to load videos"
    );

    Ok(render_page(request, UploadVideoView { course, videos }))
}

/// 标题和视频文件都必填
pub async fn handle_upload_video(
    service: &TrainerService,
    request: &HttpRequest,
    course_id: i64,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    let member = require_member!(request);
    let storage = service.get_storage(request);

    let course = match assigned_course(&storage, member.id(), course_id).await {
        Ok(course) => course,
        Err(response) => return Ok(response),
    };

    let form = match MultipartForm::from_payload(
        payload,
        &service.get_config().upload,
        &[("video", UploadKind::Video)],
    )
    .await
    {
        Ok(form) => form,
        Err(e) => return Ok(error_response(e)),
    };

    let fields = match VideoForm::from_multipart(&form) {
        Ok(fields) => fields,
        Err(e) => {
            form.discard_files();
            return Ok(error_response(e));
        }
    };
    let (Some(title), Some(file)) = (fields.title, form.file("video")) else {
        form.discard_files();
        return Ok(form_error("Please fill all required fields."));
    };

    let video = try_or_500!(
        storage
            .create_video(
                course.id,
                VideoInput {
                    title,
                    video: Some(file.reference.clone()),
                    order: fields.order.unwrap_or(0),
                },
            )
            .await,
        "Failed to save video"
    );

    info!(
        "Trainer {} uploaded video {} to course {}",
        member.account.username, video.id, course.id
    );
    Ok(redirect_with_notice(
        &format!("/trainer/course/{}/students/", course.id),
        Notice::success("Video uploaded successfully!"),
    ))
}
