use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use crate::errors::LmsError;
use crate::models::accounts::{
    AccountUpdate, AddTrainerForm, EditTrainerForm, Location, NewAccount, Role,
};
use crate::models::catalog::StaticPageView;
use crate::models::dashboards::TrainerDetailView;
use crate::models::{ErrorCode, Notice};
use crate::services::common::{account_conflict, assignment_rows, check_new_account};
use crate::utils::password::hash_password;
use crate::utils::validate::{validate_email, validate_password_simple};
use crate::utils::{
    form_error_with, redirect_with_error, redirect_with_notice, render_page, server_error,
};

use super::{DASHBOARD_PATH, ManagerService, find_trainer};

pub async fn handle_add_trainer_page(
    service: &ManagerService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    Ok(render_page(
        request,
        StaticPageView {
            page: "add-trainer".to_string(),
            system_name: service.get_config().app.system_name.clone(),
        },
    ))
}

pub async fn handle_add_trainer(
    service: &ManagerService,
    request: &HttpRequest,
    form: AddTrainerForm,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let username = form.username.trim().to_string();
    let email = form.email.trim().to_string();

    if let Err(response) = check_new_account(&storage, &username, &email, &form.password).await {
        return Ok(response);
    }
    let password_hash = match hash_password(&form.password) {
        Ok(hash) => hash,
        Err(e) => return Ok(server_error("Failed to add trainer", e)),
    };

    let trainer = match storage
        .create_account(NewAccount {
            username,
            email,
            password_hash,
            first_name: form.first_name.trim().to_string(),
            last_name: form.last_name.trim().to_string(),
            role: Role::Trainer,
            location: Location::default(),
        })
        .await
    {
        Ok(member) => member,
        Err(LmsError::Conflict(_)) => return Ok(account_conflict()),
        Err(e) => return Ok(server_error("Failed to add trainer", e)),
    };

    info!("Trainer {} added", trainer.account.username);
    Ok(redirect_with_notice(
        DASHBOARD_PATH,
        Notice::success(format!(
            "Trainer \"{}\" added successfully!",
            trainer.account.username
        )),
    ))
}

/// 编辑页和删除确认页共用
pub async fn handle_trainer_page(
    service: &ManagerService,
    request: &HttpRequest,
    trainer_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let trainer = match find_trainer(&storage, trainer_id).await {
        Ok(trainer) => trainer,
        Err(response) => return Ok(response),
    };

    let assignments = try_or_500!(
        storage.list_trainer_assignments(trainer.id()).await,
        "Failed to load assignments"
    );
    let assignments = try_or_500!(
        assignment_rows(&storage, assignments).await,
        "Failed to load assignments"
    );
    let contact = try_or_500!(
        storage.get_trainer_contact(trainer.id()).await,
        "Failed to load contact"
    );

    Ok(render_page(
        request,
        TrainerDetailView {
            trainer: trainer.account.summary(),
            location: Location {
                country: trainer.profile.country,
                state: trainer.profile.state,
                district: trainer.profile.district,
            },
            assignments,
            contact,
        },
    ))
}

/// 缺省字段保持原值，密码为空时不修改
pub async fn handle_edit_trainer(
    service: &ManagerService,
    request: &HttpRequest,
    trainer_id: i64,
    form: EditTrainerForm,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let trainer = match find_trainer(&storage, trainer_id).await {
        Ok(trainer) => trainer,
        Err(response) => return Ok(response),
    };

    let email = form.email.map(|e| e.trim().to_string());
    if let Some(email) = &email {
        if let Err(msg) = validate_email(email) {
            return Ok(form_error_with(
                StatusCode::BAD_REQUEST,
                ErrorCode::UserEmailInvalid,
                msg,
            ));
        }
        match storage.email_exists(email, Some(trainer.id())).await {
            Ok(true) => {
                return Ok(form_error_with(
                    StatusCode::CONFLICT,
                    ErrorCode::UserEmailAlreadyExists,
                    "Email already exists.",
                ));
            }
            Ok(false) => {}
            Err(e) => return Ok(server_error("Failed to check email", e)),
        }
    }

    let password_hash = match form.password.as_deref().filter(|p| !p.is_empty()) {
        None => None,
        Some(password) => {
            if let Err(msg) = validate_password_simple(password) {
                return Ok(form_error_with(
                    StatusCode::BAD_REQUEST,
                    ErrorCode::UserPasswordInvalid,
                    msg,
                ));
            }
            match hash_password(password) {
                Ok(hash) => Some(hash),
                Err(e) => return Ok(server_error("Failed to update trainer", e)),
            }
        }
    };

    let update = AccountUpdate {
        first_name: form.first_name.map(|v| v.trim().to_string()),
        last_name: form.last_name.map(|v| v.trim().to_string()),
        email,
        password_hash,
    };
    match storage.update_account(trainer.id(), update).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(redirect_with_error(
                DASHBOARD_PATH,
                ErrorCode::UserNotFound,
                "Trainer not found.",
            ));
        }
        Err(LmsError::Conflict(_)) => {
            return Ok(form_error_with(
                StatusCode::CONFLICT,
                ErrorCode::UserEmailAlreadyExists,
                "Email already exists.",
            ));
        }
        Err(e) => return Ok(server_error("Failed to update trainer", e)),
    }

    fn merge(submitted: Option<String>, current: Option<String>) -> Option<String> {
        match submitted {
            Some(value) => Some(value.trim().to_string()).filter(|v| !v.is_empty()),
            None => current,
        }
    }
    let location = Location {
        country: merge(form.country, trainer.profile.country.clone()),
        state: merge(form.state, trainer.profile.state.clone()),
        district: merge(form.district, trainer.profile.district.clone()),
    };
    try_or_500!(
        storage.update_profile_location(trainer.id(), location).await,
        "Failed to update trainer location"
    );

    info!("Trainer {} updated", trainer.account.username);
    Ok(redirect_with_notice(
        DASHBOARD_PATH,
        Notice::success(format!(
            "Trainer \"{}\" updated successfully!",
            trainer.account.username
        )),
    ))
}

/// 删除教练账号：分配、联系方式、评分、名下课程、资料一并删除
pub async fn handle_delete_trainer(
    service: &ManagerService,
    request: &HttpRequest,
    trainer_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let trainer = match find_trainer(&storage, trainer_id).await {
        Ok(trainer) => trainer,
        Err(response) => return Ok(response),
    };

    match storage.delete_trainer_cascade(trainer.id()).await {
        Ok(true) => {
            info!("Trainer {} deleted", trainer.account.username);
            Ok(redirect_with_notice(
                DASHBOARD_PATH,
                Notice::success(format!(
                    "Trainer \"{}\" deleted successfully!",
                    trainer.account.username
                )),
            ))
        }
        Ok(false) => Ok(redirect_with_error(
            DASHBOARD_PATH,
            ErrorCode::UserNotFound,
            "Trainer not found.",
        )),
        Err(e) => Ok(server_error("Failed to delete trainer", e)),
    }
}
