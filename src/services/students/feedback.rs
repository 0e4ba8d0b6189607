use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use crate::models::Notice;
use crate::models::dashboards::FeedbackPageView;
use crate::models::learning::RatingForm;
use crate::services::common::error_response;
use crate::utils::{redirect_with_notice, render_page};

use super::{StudentService, course_path, enrolled_course};

const FEEDBACK_DENIED: &str = "You must be enrolled in this course to submit feedback.";

pub async fn handle_feedback_page(
    service: &StudentService,
    request: &HttpRequest,
    course_id: i64,
) -> ActixResult<HttpResponse> {
    let member = require_member!(request);
    let storage = service.get_storage(request);

    let course = match enrolled_course(&storage, member.id(), course_id, FEEDBACK_DENIED).await {
        Ok(course) => course,
        Err(response) => return Ok(response),
    };
    let existing_feedback = try_or_500!(
        storage.get_feedback(member.id(), course.id).await,
        "Failed to load feedback"
    );

    Ok(render_page(
        request,
        FeedbackPageView {
            course,
            existing_feedback,
        },
    ))
}

pub async fn handle_submit_feedback(
    service: &StudentService,
    request: &HttpRequest,
    course_id: i64,
    form: RatingForm,
) -> ActixResult<HttpResponse> {
    let member = require_member!(request);
    let storage = service.get_storage(request);

    let course = match enrolled_course(&storage, member.id(), course_id, FEEDBACK_DENIED).await {
        Ok(course) => course,
        Err(response) => return Ok(response),
    };
    let input = match form.validate() {
        Ok(input) => input,
        Err(e) => return Ok(error_response(e)),
    };

    try_or_500!(
        storage.upsert_feedback(member.id(), course.id, input).await,
        "Failed to save feedback"
    );
    info!("Student {} left feedback on course {}", member.id(), course.id);

    Ok(redirect_with_notice(
        &course_path(course.id),
        Notice::success("Thank you for your feedback!"),
    ))
}
