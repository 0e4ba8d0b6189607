use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use crate::models::Notice;
use crate::models::dashboards::{RateTrainerView, TrainerContactPage};
use crate::models::learning::RatingForm;
use crate::services::common::error_response;
use crate::utils::progress::average_rating;
use crate::utils::{redirect_with_notice, render_page};

use super::{StudentService, reachable_trainer};

const RATE_DENIED: &str = "You can only rate trainers or course instructors.";
const CONTACT_DENIED: &str = "You can only contact trainers or course instructors.";

pub async fn handle_rate_trainer_page(
    service: &StudentService,
    request: &HttpRequest,
    trainer_id: i64,
) -> ActixResult<HttpResponse> {
    let member = require_member!(request);
    let storage = service.get_storage(request);

    let trainer = match reachable_trainer(&storage, member.id(), trainer_id, RATE_DENIED).await {
        Ok(trainer) => trainer,
        Err(response) => return Ok(response),
    };
    let existing_rating = try_or_500!(
        storage.get_trainer_rating(trainer.id(), member.id()).await,
        "Failed to load rating"
    );

    Ok(render_page(
        request,
        RateTrainerView {
            trainer: trainer.account.summary(),
            existing_rating,
        },
    ))
}

pub async fn handle_rate_trainer(
    service: &StudentService,
    request: &HttpRequest,
    trainer_id: i64,
    form: RatingForm,
) -> ActixResult<HttpResponse> {
    let member = require_member!(request);
    let storage = service.get_storage(request);

    let trainer = match reachable_trainer(&storage, member.id(), trainer_id, RATE_DENIED).await {
        Ok(trainer) => trainer,
        Err(response) => return Ok(response),
    };
    let input = match form.validate() {
        Ok(input) => input,
        Err(e) => return Ok(error_response(e)),
    };

    try_or_500!(
        storage
            .upsert_trainer_rating(trainer.id(), member.id(), input)
            .await,
        "Failed to save rating"
    );
    info!("Student {} rated trainer {}", member.id(), trainer.id());

    Ok(redirect_with_notice(
        &format!("/student/trainer/{}/contact/", trainer.id()),
        Notice::success("Thank you for your rating!"),
    ))
}

pub async fn handle_trainer_contact(
    service: &StudentService,
    request: &HttpRequest,
    trainer_id: i64,
) -> ActixResult<HttpResponse> {
    let member = require_member!(request);
    let storage = service.get_storage(request);

    let trainer = match reachable_trainer(&storage, member.id(), trainer_id, CONTACT_DENIED).await
    {
        Ok(trainer) => trainer,
        Err(response) => return Ok(response),
    };

    // 只读，不会为教练创建空的联系方式
    let contact = try_or_500!(
        storage.get_trainer_contact(trainer.id()).await,
        "Failed to load contact"
    );
    let ratings = try_or_500!(
        storage.list_trainer_ratings(trainer.id()).await,
        "Failed to load ratings"
    );

    Ok(render_page(
        request,
        TrainerContactPage {
            trainer: trainer.account.summary(),
            contact,
            average_rating: average_rating(ratings.iter().map(|r| r.rating)),
            rating_count: ratings.len() as u64,
        },
    ))
}
