pub mod login;
pub mod logout;
pub mod me;
pub mod signup;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::accounts::{LoginForm, SignupForm};
use crate::storage::Storage;

pub struct AuthService {
    storage: Option<Arc<dyn Storage>>,
}

impl AuthService {
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

    // 注册（学生）
    pub async fn signup(&self, form: SignupForm, request: &HttpRequest) -> ActixResult<HttpResponse> {
        signup::handle_signup(self, form, request).await
    }

    // 登录验证
    pub async fn login(&self, form: LoginForm, request: &HttpRequest) -> ActixResult<HttpResponse> {
        login::handle_login(self, form, request).await
    }

    // 登录页
    pub async fn login_page(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        login::handle_login_page(self, request).await
    }

    // 退出登录
    pub async fn logout(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        logout::handle_logout(request).await
    }

    // 当前账号信息
    pub async fn me(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        me::handle_me(request).await
    }
}
