use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use crate::models::Notice;
use crate::models::catalog::{CourseForm, CourseFormView, VideoInput};
use crate::services::common::{course_write_error, error_response};
use crate::utils::multipart::{MultipartForm, UploadKind};
use crate::utils::{redirect_with_notice, render_page, server_error};

use super::ProfileService;

const UPLOAD_FIELDS: &[(&str, UploadKind)] = &[
    ("thumbnail", UploadKind::Image),
    ("featured_video", UploadKind::Video),
    ("lesson_video", UploadKind::Video),
];

pub async fn handle_upload_page(request: &HttpRequest) -> ActixResult<HttpResponse> {
    let member = require_member!(request);
    Ok(render_page(
        request,
        CourseFormView {
            course: None,
            instructors: vec![member.account.summary()],
        },
    ))
}

/// 旧版上传：当前用户即讲师，可附带第一节课视频
pub async fn handle_upload(
    service: &ProfileService,
    request: &HttpRequest,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    let member = require_member!(request);
    let storage = service.get_storage(request);
    let config = service.get_config();

    let form = match MultipartForm::from_payload(payload, &config.upload, UPLOAD_FIELDS).await {
        Ok(form) => form,
        Err(e) => return Ok(error_response(e)),
    };

    let input = match CourseForm::from_multipart(&form).and_then(|course| {
        course.into_input(
            None,
            member.id(),
            form.file("thumbnail").map(|f| f.reference.clone()),
            form.file("featured_video").map(|f| f.reference.clone()),
        )
    }) {
        Ok(input) => input,
        Err(e) => {
            form.discard_files();
            return Ok(error_response(e));
        }
    };

    let course = match storage.create_course(input).await {
        Ok(course) => course,
        Err(e) => {
            form.discard_files();
            return Ok(course_write_error(e));
        }
    };

    if let Some(lesson_title) = form.text("lesson_title") {
        let video = VideoInput {
            title: lesson_title.to_string(),
            video: form.file("lesson_video").map(|f| f.reference.clone()),
            order: 0,
        };
        if let Err(e) = storage.create_video(course.id, video).await {
            return Ok(server_error("Failed to save lesson video", e));
        }
    }

    info!(
        "Course \"{}\" uploaded by {}",
        course.title, member.account.username
    );
    Ok(redirect_with_notice(
        "/dashboard/courses-uploaded/",
        Notice::success(format!("Course \"{}\" created successfully!", course.title)),
    ))
}
