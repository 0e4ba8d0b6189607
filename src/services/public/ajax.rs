use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::PublicService;

// 返回裸 JSON 数组 [{id, name}]，供下拉框联动使用
pub async fn handle_states(
    service: &PublicService,
    request: &HttpRequest,
    country_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let states = try_or_500!(
        storage.list_states(country_id).await,
        "Failed to load states"
    );
    Ok(HttpResponse::Ok().json(states))
}

pub async fn handle_districts(
    service: &PublicService,
    request: &HttpRequest,
    state_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let districts = try_or_500!(
        storage.list_districts(state_id).await,
        "Failed to load districts"
    );
    Ok(HttpResponse::Ok().json(districts))
}
