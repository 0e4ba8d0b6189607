use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use crate::models::accounts::{CompleteProfileForm, CompleteProfileView, Location};
use crate::models::{ErrorCode, Notice};
use crate::services::common::forget_cached_account;
use crate::utils::{redirect_with_error, redirect_with_notice, render_page};

use super::ProfileService;

const COMPLETE_PROFILE_PATH: &str = "/complete-profile/";

pub async fn handle_complete_profile_page(
    service: &ProfileService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let member = require_member!(request);
    let storage = service.get_storage(request);

    let countries = try_or_500!(storage.list_countries().await, "Failed to load countries");
    Ok(render_page(
        request,
        CompleteProfileView {
            countries,
            profile: member.profile,
        },
    ))
}

/// 选中的地区按 ID 查出名称写入资料，未提交的字段保持原值
pub async fn handle_complete_profile(
    service: &ProfileService,
    request: &HttpRequest,
    form: CompleteProfileForm,
) -> ActixResult<HttpResponse> {
    let member = require_member!(request);
    let storage = service.get_storage(request);

    let mut location = Location {
        country: member.profile.country.clone(),
        state: member.profile.state.clone(),
        district: member.profile.district.clone(),
    };

    if let Some(country_id) = form.country {
        match storage.get_country(country_id).await {
            Ok(Some(country)) => location.country = Some(country.name),
            Ok(None) => return Ok(location_not_found()),
            Err(e) => return Ok(crate::utils::server_error("Failed to load country", e)),
        }
    }
    if let Some(state_id) = form.state {
        match storage.get_state(state_id).await {
            Ok(Some(state)) => location.state = Some(state.name),
            Ok(None) => return Ok(location_not_found()),
            Err(e) => return Ok(crate::utils::server_error("Failed to load state", e)),
        }
    }
    if let Some(district_id) = form.district {
        match storage.get_district(district_id).await {
            Ok(Some(district)) => location.district = Some(district.name),
            Ok(None) => return Ok(location_not_found()),
            Err(e) => return Ok(crate::utils::server_error("Failed to load district", e)),
        }
    }

    try_or_500!(
        storage.update_profile_location(member.id(), location).await,
        "Failed to update profile"
    );
    forget_cached_account(request).await;
    info!("Account {} completed profile", member.account.username);

    Ok(redirect_with_notice(
        member.role().dashboard_path(),
        Notice::success("Profile updated successfully!"),
    ))
}

fn location_not_found() -> HttpResponse {
    redirect_with_error(
        COMPLETE_PROFILE_PATH,
        ErrorCode::LocationNotFound,
        "Selected location was not found.",
    )
}
