use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::accounts::ProfileView;
use crate::utils::render_page;

pub async fn handle_me(request: &HttpRequest) -> ActixResult<HttpResponse> {
    let member = require_member!(request);
    Ok(render_page(request, ProfileView { member }))
}
