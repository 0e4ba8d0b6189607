use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use crate::models::Notice;
use crate::models::catalog::{ContactForm, ContactView};
use crate::models::accounts::Member;
use crate::utils::{redirect_with_notice, render_page, server_error};

use super::{DASHBOARD_PATH, ManagerService, find_trainer};

pub async fn handle_trainer_contact_page(
    service: &ManagerService,
    request: &HttpRequest,
    trainer_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let trainer = match find_trainer(&storage, trainer_id).await {
        Ok(trainer) => trainer,
        Err(response) => return Ok(response),
    };
    let contact = try_or_500!(
        storage.get_trainer_contact(trainer.id()).await,
        "Failed to load contact"
    );

    Ok(render_page(
        request,
        ContactView {
            trainer: trainer.account.summary(),
            contact,
        },
    ))
}

pub async fn handle_edit_trainer_contact(
    service: &ManagerService,
    request: &HttpRequest,
    trainer_id: i64,
    form: ContactForm,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let trainer = match find_trainer(&storage, trainer_id).await {
        Ok(trainer) => trainer,
        Err(response) => return Ok(response),
    };

    try_or_500!(
        storage
            .upsert_trainer_contact(trainer.id(), form.normalized())
            .await,
        "Failed to save contact"
    );
    info!("Contact of trainer {} updated", trainer.account.username);

    Ok(redirect_with_notice(
        DASHBOARD_PATH,
        Notice::success(format!(
            "Contact information for \"{}\" updated successfully!",
            trainer.account.username
        )),
    ))
}

pub async fn handle_delete_trainer_contact_page(
    service: &ManagerService,
    request: &HttpRequest,
    trainer_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let trainer = match find_trainer(&storage, trainer_id).await {
        Ok(trainer) => trainer,
        Err(response) => return Ok(response),
    };

    match storage.get_trainer_contact(trainer.id()).await {
        Ok(Some(contact)) => Ok(render_page(
            request,
            ContactView {
                trainer: trainer.account.summary(),
                contact: Some(contact),
            },
        )),
        Ok(None) => Ok(no_contact(&trainer)),
        Err(e) => Ok(server_error("Failed to load contact", e)),
    }
}

pub async fn handle_delete_trainer_contact(
    service: &ManagerService,
    request: &HttpRequest,
    trainer_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let trainer = match find_trainer(&storage, trainer_id).await {
        Ok(trainer) => trainer,
        Err(response) => return Ok(response),
    };

    match storage.delete_trainer_contact(trainer.id()).await {
        Ok(true) => {
            info!("Contact of trainer {} deleted", trainer.account.username);
            Ok(redirect_with_notice(
                DASHBOARD_PATH,
                Notice::success(format!(
                    "Contact information for \"{}\" deleted successfully!",
                    trainer.account.username
                )),
            ))
        }
        Ok(false) => Ok(no_contact(&trainer)),
        Err(e) => Ok(server_error("Failed to delete contact", e)),
    }
}

fn no_contact(trainer: &Member) -> HttpResponse {
    redirect_with_notice(
        DASHBOARD_PATH,
        Notice::info(format!(
            "No contact information found for \"{}\".",
            trainer.account.username
        )),
    )
}
