use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use crate::models::catalog::{CourseSummary, CourseVideosView, VideoForm, VideoInput, VideoView};
use crate::models::{ErrorCode, Notice};
use crate::services::common::error_response;
use crate::utils::multipart::{MultipartForm, UploadKind};
use crate::utils::{
    form_error, redirect_with_error, redirect_with_notice, render_page, server_error,
};

use super::{ManagerService, course_videos_path, find_course, find_video};

const VIDEO_FILES: &[(&str, UploadKind)] = &[("video", UploadKind::Video)];

pub async fn handle_course_videos(
    service: &ManagerService,
    request: &HttpRequest,
    course_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let course = match find_course(&storage, course_id).await {
        Ok(course) => course,
        Err(response) => return Ok(response),
    };
    let videos = try_or_500!(
        storage.list_course_videos(course.id).await,
        "Failed to load videos"
    );
    Ok(render_page(request, CourseVideosView { course, videos }))
}

pub async fn handle_add_video(
    service: &ManagerService,
    request: &HttpRequest,
    course_id: i64,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let course = match find_course(&storage, course_id).await {
        Ok(course) => course,
        Err(response) => return Ok(response),
    };

    let form = match MultipartForm::from_payload(payload, &service.get_config().upload, VIDEO_FILES)
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
    info!("Video {} added to course {}", video.id, course.id);

    Ok(redirect_with_notice(
        &course_videos_path(course.id),
        Notice::success("Video added successfully!"),
    ))
}

/// 编辑页和删除确认页共用
pub async fn handle_video_page(
    service: &ManagerService,
    request: &HttpRequest,
    video_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let video = match find_video(&storage, video_id).await {
        Ok(video) => video,
        Err(response) => return Ok(response),
    };
    let course = match find_course(&storage, video.course_id).await {
        Ok(course) => course,
        Err(response) => return Ok(response),
    };

    Ok(render_page(
        request,
        VideoView {
            video,
            course: CourseSummary::from(&course),
        },
    ))
}

/// 缺省字段保持原值，上传新文件时替换视频
pub async fn handle_edit_video(
    service: &ManagerService,
    request: &HttpRequest,
    video_id: i64,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let video = match find_video(&storage, video_id).await {
        Ok(video) => video,
        Err(response) => return Ok(response),
    };

    let form = match MultipartForm::from_payload(payload, &service.get_config().upload, VIDEO_FILES)
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

    let input = VideoInput {
        title: fields.title.unwrap_or_else(|| video.title.clone()),
        video: form
            .file("video")
            .map(|f| f.reference.clone())
            .or_else(|| video.video.clone()),
        order: fields.order.unwrap_or(video.order),
    };

    match storage.update_video(video.id, input).await {
        Ok(Some(updated)) => {
            info!("Video {} updated", updated.id);
            Ok(redirect_with_notice(
                &course_videos_path(updated.course_id),
                Notice::success("Video updated successfully!"),
            ))
        }
        Ok(None) => {
            form.discard_files();
            Ok(video_not_found())
        }
        Err(e) => {
            form.discard_files();
            Ok(server_error("Failed to update video", e))
        }
    }
}

/// 删除视频及其进度和评分
pub async fn handle_delete_video(
    service: &ManagerService,
    request: &HttpRequest,
    video_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let video = match find_video(&storage, video_id).await {
        Ok(video) => video,
        Err(response) => return Ok(response),
    };

    match storage.delete_video_cascade(video.id).await {
        Ok(true) => {
            info!("Video \"{}\" deleted (id {})", video.title, video.id);
            Ok(redirect_with_notice(
                &course_videos_path(video.course_id),
                Notice::success(format!("Video \"{}\" deleted successfully!", video.title)),
            ))
        }
        Ok(false) => Ok(video_not_found()),
        Err(e) => Ok(server_error("Failed to delete video", e)),
    }
}

fn video_not_found() -> HttpResponse {
    redirect_with_error(
        super::DASHBOARD_PATH,
        ErrorCode::VideoNotFound,
        "Video not found.",
    )
}
