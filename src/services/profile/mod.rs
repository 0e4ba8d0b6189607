//! 所有登录角色共用的页面：角色首页跳转、完善资料、旧版个人中心

pub mod complete;
pub mod legacy;
pub mod upload;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::accounts::CompleteProfileForm;
use crate::storage::Storage;

pub struct ProfileService {
    storage: Option<Arc<dyn Storage>>,
}

impl ProfileService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub(crate) fn get_config(&self) -> &AppConfig {
        AppConfig::get()
    }

    // 跳转到当前角色的首页
    pub async fn dashboard_home(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let member = require_member!(request);
        Ok(crate::utils::redirect_to(member.role().dashboard_path()))
    }

    pub async fn complete_profile_page(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        complete::handle_complete_profile_page(self, request).await
    }

    pub async fn complete_profile(
        &self,
        request: &HttpRequest,
        form: CompleteProfileForm,
    ) -> ActixResult<HttpResponse> {
        complete::handle_complete_profile(self, request, form).await
    }

    pub async fn profile(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        legacy::handle_profile(request).await
    }

    pub async fn courses_enrolled(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        legacy::handle_courses_enrolled(self, request).await
    }

    pub async fn courses_uploaded(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        legacy::handle_courses_uploaded(self, request).await
    }

    pub async fn upload_page(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        upload::handle_upload_page(request).await
    }

    pub async fn upload(&self, request: &HttpRequest, payload: Multipart) -> ActixResult<HttpResponse> {
        upload::handle_upload(self, request, payload).await
    }
}
