use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use serde_json::json;
use tracing::error;

use crate::models::learning::{ProgressForm, ProgressUpdateResponse};

use super::StudentService;

/// 播放器上报进度，返回 JSON 而不是跳转
pub async fn handle_update_progress(
    service: &StudentService,
    request: &HttpRequest,
    video_id: i64,
    form: ProgressForm,
) -> ActixResult<HttpResponse> {
    let member = require_member!(request);
    let storage = service.get_storage(request);

    let video = match storage.get_video(video_id).await {
        Ok(Some(video)) => video,
        Ok(None) => return Ok(HttpResponse::NotFound().json(json!({"error": "Video not found"}))),
        Err(e) => return Ok(internal_error(e)),
    };

    match storage.is_enrolled(member.id(), video.course_id).await {
        Ok(true) => {}
        Ok(false) => return Ok(HttpResponse::Forbidden().json(json!({"error": "Not enrolled"}))),
        Err(e) => return Ok(internal_error(e)),
    }

    let report = match form.parse() {
        Ok(report) => report,
        Err(e) => return Ok(HttpResponse::BadRequest().json(json!({"error": e.message()}))),
    };

    match storage
        .update_video_progress(member.id(), video.id, report)
        .await
    {
        Ok(progress) => Ok(HttpResponse::Ok().json(ProgressUpdateResponse::from(&progress))),
        Err(e) => Ok(internal_error(e)),
    }
}

fn internal_error(e: crate::errors::LmsError) -> HttpResponse {
    error!("Failed to update video progress: {}", e);
    HttpResponse::InternalServerError().json(json!({"error": "Failed to update progress"}))
}
