//! 公开页面：首页、课程目录和地区联动查询

pub mod ajax;
pub mod catalog;
pub mod pages;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::catalog::CourseListQuery;
use crate::storage::Storage;

pub struct PublicService {
    storage: Option<Arc<dyn Storage>>,
}

impl PublicService {
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

    pub async fn home(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        pages::handle_home(self, request).await
    }

    pub async fn static_page(&self, request: &HttpRequest, page: &str) -> ActixResult<HttpResponse> {
        pages::handle_static_page(self, request, page).await
    }

    pub async fn list_courses(
        &self,
        request: &HttpRequest,
        query: CourseListQuery,
    ) -> ActixResult<HttpResponse> {
        catalog::handle_list_courses(self, request, query).await
    }

    pub async fn category(&self, request: &HttpRequest, category: &str) -> ActixResult<HttpResponse> {
        catalog::handle_category(self, request, category).await
    }

    pub async fn course_detail(
        &self,
        request: &HttpRequest,
        instructor: &str,
        slug: &str,
    ) -> ActixResult<HttpResponse> {
        catalog::handle_course_detail(self, request, instructor, slug).await
    }

    pub async fn states(&self, request: &HttpRequest, country_id: i64) -> ActixResult<HttpResponse> {
        ajax::handle_states(self, request, country_id).await
    }

    pub async fn districts(&self, request: &HttpRequest, state_id: i64) -> ActixResult<HttpResponse> {
        ajax::handle_districts(self, request, state_id).await
    }
}
