use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use crate::models::Notice;
use crate::models::catalog::ContactForm;
use crate::models::dashboards::OwnContactView;
use crate::utils::{redirect_with_notice, render_page};

use super::{DASHBOARD_PATH, TrainerService};

pub async fn handle_contact_page(
    service: &TrainerService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let member = require_member!(request);
    let storage = service.get_storage(request);

    let contact = try_or_500!(
        storage.get_trainer_contact(member.id()).await,
        "Failed to load contact"
    );
    Ok(render_page(request, OwnContactView { contact }))
}

pub async fn handle_edit_contact(
    service: &TrainerService,
    request: &HttpRequest,
    form: ContactForm,
) -> ActixResult<HttpResponse> {
    let member = require_member!(request);
    let storage = service.get_storage(request);

    try_or_500!(
        storage
            .upsert_trainer_contact(member.id(), form.normalized())
            .await,
        "Failed to save contact"
    );
    info!("Trainer {} updated contact information", member.account.username);

    Ok(redirect_with_notice(
        DASHBOARD_PATH,
        Notice::success("Contact information updated successfully!"),
    ))
}

pub async fn handle_delete_contact_page(
    service: &TrainerService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let member = require_member!(request);
    let storage = service.get_storage(request);

    match storage.get_trainer_contact(member.id()).await {
        Ok(Some(contact)) => Ok(render_page(
            request,
            OwnContactView {
                contact: Some(contact),
            },
        )),
        Ok(None) => Ok(nothing_to_delete()),
        Err(e) => Ok(crate::utils::server_error("Failed to load contact", e)),
    }
}

pub async fn handle_delete_contact(
    service: &TrainerService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let member = require_member!(request);
    let storage = service.get_storage(request);

    match storage.delete_trainer_contact(member.id()).await {
        Ok(true) => {
            info!("Trainer {} deleted contact information", member.account.username);
            Ok(redirect_with_notice(
                DASHBOARD_PATH,
                Notice::success("Contact information deleted successfully!"),
            ))
        }
        Ok(false) => Ok(nothing_to_delete()),
        Err(e) => Ok(crate::utils::server_error("Failed to delete contact", e)),
    }
}

fn nothing_to_delete() -> HttpResponse {
    redirect_with_notice(
        DASHBOARD_PATH,
        Notice::info("No contact information to delete."),
    )
}
