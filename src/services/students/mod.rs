//! 学生端：学习、进度上报、购买申请、评分与反馈

pub mod course;
pub mod dashboard;
pub mod feedback;
pub mod payment;
pub mod progress;
pub mod ratings;
pub mod trainers;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::ErrorCode;
use crate::models::accounts::Member;
use crate::models::catalog::Course;
use crate::models::learning::{PaymentRequestForm, ProgressForm, RatingForm};
use crate::storage::Storage;
use crate::utils::{redirect_with_error, server_error};

pub(crate) const DASHBOARD_PATH: &str = "/student/dashboard/";

pub struct StudentService {
    storage: Option<Arc<dyn Storage>>,
}

impl StudentService {
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

    pub async fn dashboard(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        dashboard::handle_dashboard(self, request).await
    }

    pub async fn course_detail(&self, request: &HttpRequest, course_id: i64) -> ActixResult<HttpResponse> {
        course::handle_course_detail(self, request, course_id).await
    }

    pub async fn update_progress(
        &self,
        request: &HttpRequest,
        video_id: i64,
        form: ProgressForm,
    ) -> ActixResult<HttpResponse> {
        progress::handle_update_progress(self, request, video_id, form).await
    }

    pub async fn payment_page(&self, request: &HttpRequest, course_id: i64) -> ActixResult<HttpResponse> {
        payment::handle_payment_page(self, request, course_id).await
    }

    pub async fn request_payment(
        &self,
        request: &HttpRequest,
        course_id: i64,
        form: PaymentRequestForm,
    ) -> ActixResult<HttpResponse> {
        payment::handle_request_payment(self, request, course_id, form).await
    }

    pub async fn rate_trainer_page(&self, request: &HttpRequest, trainer_id: i64) -> ActixResult<HttpResponse> {
        trainers::handle_rate_trainer_page(self, request, trainer_id).await
    }

    pub async fn rate_trainer(
        &self,
        request: &HttpRequest,
        trainer_id: i64,
        form: RatingForm,
    ) -> ActixResult<HttpResponse> {
        trainers::handle_rate_trainer(self, request, trainer_id, form).await
    }

    pub async fn trainer_contact(&self, request: &HttpRequest, trainer_id: i64) -> ActixResult<HttpResponse> {
        trainers::handle_trainer_contact(self, request, trainer_id).await
    }

    pub async fn rate_video_page(&self, request: &HttpRequest, video_id: i64) -> ActixResult<HttpResponse> {
        ratings::handle_rate_video_page(self, request, video_id).await
    }

    pub async fn rate_video(
        &self,
        request: &HttpRequest,
        video_id: i64,
        form: RatingForm,
    ) -> ActixResult<HttpResponse> {
        ratings::handle_rate_video(self, request, video_id, form).await
    }

    pub async fn feedback_page(&self, request: &HttpRequest, course_id: i64) -> ActixResult<HttpResponse> {
        feedback::handle_feedback_page(self, request, course_id).await
    }

    pub async fn submit_feedback(
        &self,
        request: &HttpRequest,
        course_id: i64,
        form: RatingForm,
    ) -> ActixResult<HttpResponse> {
        feedback::handle_submit_feedback(self, request, course_id, form).await
    }
}

pub(crate) fn course_path(course_id: i64) -> String {
    format!("/student/course/{course_id}/")
}

/// 读取课程并确认学生已选课，否则返回跳转响应
pub(crate) async fn enrolled_course(
    storage: &Arc<dyn Storage>,
    student_id: i64,
    course_id: i64,
    deny_message: &str,
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

    match storage.is_enrolled(student_id, course_id).await {
        Ok(true) => Ok(course),
        Ok(false) => {
            tracing::info!("Student {} denied access to course {}", student_id, course_id);
            Err(redirect_with_error(
                DASHBOARD_PATH,
                ErrorCode::NotEnrolled,
                deny_message,
            ))
        }
        Err(e) => Err(server_error("Failed to load enrollment", e)),
    }
}

/// 学生只能查看或评价自己课程的教练 / 讲师
pub(crate) async fn reachable_trainer(
    storage: &Arc<dyn Storage>,
    student_id: i64,
    trainer_id: i64,
    deny_message: &str,
) -> Result<Member, HttpResponse> {
    let trainer = match storage.get_member(trainer_id).await {
        Ok(Some(member)) => member,
        Ok(None) => {
            return Err(redirect_with_error(
                DASHBOARD_PATH,
                ErrorCode::UserNotFound,
                "Trainer not found.",
            ));
        }
        Err(e) => return Err(server_error("Failed to load trainer", e)),
    };

    match storage
        .trainer_reachable_by_student(trainer.id(), student_id)
        .await
    {
        Ok(true) => Ok(trainer),
        Ok(false) => {
            tracing::info!(
                "Student {} denied access to trainer {}",
                student_id,
                trainer_id
            );
            Err(redirect_with_error(
                DASHBOARD_PATH,
                ErrorCode::TrainerNotReachable,
                deny_message,
            ))
        }
        Err(e) => Err(server_error("Failed to check trainer", e)),
    }
}
