//! 教练端：分配课程、学生进度、上传视频、联系方式

pub mod contact;
pub mod dashboard;
pub mod students;
pub mod upload;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::ErrorCode;
use crate::models::catalog::{ContactForm, Course};
use crate::storage::Storage;
use crate::utils::{redirect_with_error, server_error};

pub(crate) const DASHBOARD_PATH: &str = "/trainer/dashboard/";

pub struct TrainerService {
    storage: Option<Arc<dyn Storage>>,
}

impl TrainerService {
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

    pub async fn dashboard(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        dashboard::handle_dashboard(self, request).await
    }

    pub async fn course_students(&self, request: &HttpRequest, course_id: i64) -> ActixResult<HttpResponse> {
        students::handle_course_students(self, request, course_id).await
    }

    pub async fn upload_video_page(&self, request: &HttpRequest, course_id: i64) -> ActixResult<HttpResponse> {
        upload::handle_upload_video_page(self, request, course_id).await
    }

    pub async fn upload_video(
        &self,
        request: &HttpRequest,
        course_id: i64,
        payload: Multipart,
    ) -> ActixResult<HttpResponse> {
        upload::handle_upload_video(self, request, course_id, payload).await
    }

    pub async fn contact_page(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        contact::handle_contact_page(self, request).await
    }

    pub async fn edit_contact(&self, request: &HttpRequest, form: ContactForm) -> ActixResult<HttpResponse> {
        contact::handle_edit_contact(self, request, form).await
    }

    pub async fn delete_contact_page(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        contact::handle_delete_contact_page(self, request).await
    }

    pub async fn delete_contact(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        contact::handle_delete_contact(self, request).await
    }
}

/// 读取课程并确认当前教练已被分配
pub(crate) async fn assigned_course(
    storage: &Arc<dyn Storage>,
    trainer_id: i64,
    course_id: i64,
) -> Result<Course, HttpResponse> {
    let course = match storage.get_course(course_id).await {
        Ok(Some(course)) => course,
        Ok(None) => {
            return Err(redirect_with_error(
                DASHBOARD_PATH,
                ErrorCode::CourseNotFound,
                "Course not found.",
            ));
        }
        Err(e) => return Err(server_error("Failed to load course", e)),
    };

    match storage.is_trainer_assigned(trainer_id, course.id).await {
        Ok(true) => Ok(course),
        Ok(false) => {
            tracing::info!("Trainer {} denied access to course {}", trainer_id, course_id);
            Err(redirect_with_error(
                DASHBOARD_PATH,
                ErrorCode::TrainerNotAssigned,
                "You are not assigned to this course.",
            ))
        }
        Err(e) => Err(server_error("Failed to load assignment", e)),
    }
}
