//! 管理员端：课程、视频、教练、分配、反馈、进度分析和支付审批

pub mod assignments;
pub mod contacts;
pub mod courses;
pub mod dashboard;
pub mod payments;
pub mod reports;
pub mod trainers;
pub mod videos;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::ErrorCode;
use crate::models::accounts::{AddTrainerForm, EditTrainerForm, Member, Role};
use crate::models::catalog::{
    AssignTrainerForm, ContactForm, Course, CourseVideo, TrainerCourseForm,
};
use crate::models::dashboards::{FeedbackRow, PaymentRow};
use crate::models::learning::{Feedback, Payment, PaymentUpdateForm};
use crate::services::common::{account_summaries, course_summaries};
use crate::storage::Storage;
use crate::utils::{redirect_with_error, server_error};

pub(crate) const DASHBOARD_PATH: &str = "/manager/dashboard/";

pub struct ManagerService {
    storage: Option<Arc<dyn Storage>>,
}

impl ManagerService {
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

    // 课程
    pub async fn add_course_page(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        courses::handle_add_course_page(self, request).await
    }

    pub async fn add_course(&self, request: &HttpRequest, payload: Multipart) -> ActixResult<HttpResponse> {
        courses::handle_add_course(self, request, payload).await
    }

    pub async fn edit_course_page(&self, request: &HttpRequest, course_id: i64) -> ActixResult<HttpResponse> {
        courses::handle_edit_course_page(self, request, course_id).await
    }

    pub async fn edit_course(
        &self,
        request: &HttpRequest,
        course_id: i64,
        payload: Multipart,
    ) -> ActixResult<HttpResponse> {
        courses::handle_edit_course(self, request, course_id, payload).await
    }

    pub async fn delete_course_page(&self, request: &HttpRequest, course_id: i64) -> ActixResult<HttpResponse> {
        courses::handle_delete_course_page(self, request, course_id).await
    }

    pub async fn delete_course(&self, request: &HttpRequest, course_id: i64) -> ActixResult<HttpResponse> {
        courses::handle_delete_course(self, request, course_id).await
    }

    // 视频
    pub async fn course_videos(&self, request: &HttpRequest, course_id: i64) -> ActixResult<HttpResponse> {
        videos::handle_course_videos(self, request, course_id).await
    }

    pub async fn add_video(
        &self,
        request: &HttpRequest,
        course_id: i64,
        payload: Multipart,
    ) -> ActixResult<HttpResponse> {
        videos::handle_add_video(self, request, course_id, payload).await
    }

    pub async fn video_page(&self, request: &HttpRequest, video_id: i64) -> ActixResult<HttpResponse> {
        videos::handle_video_page(self, request, video_id).await
    }

    pub async fn edit_video(
        &self,
        request: &HttpRequest,
        video_id: i64,
        payload: Multipart,
    ) -> ActixResult<HttpResponse> {
        videos::handle_edit_video(self, request, video_id, payload).await
    }

    pub async fn delete_video(&self, request: &HttpRequest, video_id: i64) -> ActixResult<HttpResponse> {
        videos::handle_delete_video(self, request, video_id).await
    }

    // 教练
    pub async fn add_trainer_page(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        trainers::handle_add_trainer_page(self, request).await
    }

    pub async fn add_trainer(&self, request: &HttpRequest, form: AddTrainerForm) -> ActixResult<HttpResponse> {
        trainers::handle_add_trainer(self, request, form).await
    }

    pub async fn trainer_page(&self, request: &HttpRequest, trainer_id: i64) -> ActixResult<HttpResponse> {
        trainers::handle_trainer_page(self, request, trainer_id).await
    }

    pub async fn edit_trainer(
        &self,
        request: &HttpRequest,
        trainer_id: i64,
        form: EditTrainerForm,
    ) -> ActixResult<HttpResponse> {
        trainers::handle_edit_trainer(self, request, trainer_id, form).await
    }

    pub async fn delete_trainer(&self, request: &HttpRequest, trainer_id: i64) -> ActixResult<HttpResponse> {
        trainers::handle_delete_trainer(self, request, trainer_id).await
    }

    // 教练联系方式
    pub async fn trainer_contact_page(&self, request: &HttpRequest, trainer_id: i64) -> ActixResult<HttpResponse> {
        contacts::handle_trainer_contact_page(self, request, trainer_id).await
    }

    pub async fn edit_trainer_contact(
        &self,
        request: &HttpRequest,
        trainer_id: i64,
        form: ContactForm,
    ) -> ActixResult<HttpResponse> {
        contacts::handle_edit_trainer_contact(self, request, trainer_id, form).await
    }

    pub async fn delete_trainer_contact_page(
        &self,
        request: &HttpRequest,
        trainer_id: i64,
    ) -> ActixResult<HttpResponse> {
        contacts::handle_delete_trainer_contact_page(self, request, trainer_id).await
    }

    pub async fn delete_trainer_contact(&self, request: &HttpRequest, trainer_id: i64) -> ActixResult<HttpResponse> {
        contacts::handle_delete_trainer_contact(self, request, trainer_id).await
    }

    // 教练分配
    pub async fn assign_trainer_page(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        assignments::handle_assign_trainer_page(self, request).await
    }

    pub async fn assign_trainer(&self, request: &HttpRequest, form: AssignTrainerForm) -> ActixResult<HttpResponse> {
        assignments::handle_assign_trainer(self, request, form).await
    }

    pub async fn trainer_assignments(&self, request: &HttpRequest, trainer_id: i64) -> ActixResult<HttpResponse> {
        assignments::handle_trainer_assignments(self, request, trainer_id).await
    }

    pub async fn assign_course_to_trainer(
        &self,
        request: &HttpRequest,
        trainer_id: i64,
        form: TrainerCourseForm,
    ) -> ActixResult<HttpResponse> {
        assignments::handle_assign_course_to_trainer(self, request, trainer_id, form).await
    }

    pub async fn unassign_page(&self, request: &HttpRequest, assignment_id: i64) -> ActixResult<HttpResponse> {
        assignments::handle_unassign_page(self, request, assignment_id).await
    }

    pub async fn unassign_trainer(&self, request: &HttpRequest, assignment_id: i64) -> ActixResult<HttpResponse> {
        assignments::handle_unassign_trainer(self, request, assignment_id).await
    }

    // 统计
    pub async fn view_feedback(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        reports::handle_view_feedback(self, request).await
    }

    pub async fn analyze_progress(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        reports::handle_analyze_progress(self, request).await
    }

    // 支付审批
    pub async fn view_payments(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        payments::handle_view_payments(self, request).await
    }

    pub async fn payment_page(&self, request: &HttpRequest, payment_id: i64) -> ActixResult<HttpResponse> {
        payments::handle_payment_page(self, request, payment_id).await
    }

    pub async fn update_payment(
        &self,
        request: &HttpRequest,
        payment_id: i64,
        form: PaymentUpdateForm,
    ) -> ActixResult<HttpResponse> {
        payments::handle_update_payment(self, request, payment_id, form).await
    }
}

/// 读取教练账号，不存在或不是教练时跳回首页
pub(crate) async fn find_trainer(
    storage: &Arc<dyn Storage>,
    trainer_id: i64,
) -> std::result::Result<Member, HttpResponse> {
    match storage.get_member(trainer_id).await {
        Ok(Some(member)) if member.role() == Role::Trainer => Ok(member),
        Ok(Some(_)) => Err(redirect_with_error(
            DASHBOARD_PATH,
            ErrorCode::NotATrainer,
            "This user is not a trainer.",
        )),
        Ok(None) => Err(redirect_with_error(
            DASHBOARD_PATH,
            ErrorCode::UserNotFound,
            "Trainer not found.",
        )),
        Err(e) => Err(server_error("Failed to load trainer", e)),
    }
}

pub(crate) async fn find_course(
    storage: &Arc<dyn Storage>,
    course_id: i64,
) -> std::result::Result<Course, HttpResponse> {
    match storage.get_course(course_id).await {
        Ok(Some(course)) => Ok(course),
        Ok(None) => Err(redirect_with_error(
            DASHBOARD_PATH,
            ErrorCode::CourseNotFound,
            "Course not found.",
        )),
        Err(e) => Err(server_error("Failed to load course", e)),
    }
}

pub(crate) async fn find_video(
    storage: &Arc<dyn Storage>,
    video_id: i64,
) -> std::result::Result<CourseVideo, HttpResponse> {
    match storage.get_video(video_id).await {
        Ok(Some(video)) => Ok(video),
        Ok(None) => Err(redirect_with_error(
            DASHBOARD_PATH,
            ErrorCode::VideoNotFound,
            "Video not found.",
        )),
        Err(e) => Err(server_error("Failed to load video", e)),
    }
}

pub(crate) async fn feedback_rows(
    storage: &Arc<dyn Storage>,
    feedbacks: Vec<Feedback>,
) -> Result<Vec<FeedbackRow>> {
    let students = account_summaries(storage, feedbacks.iter().map(|f| f.student_id)).await?;
    let courses = course_summaries(storage, feedbacks.iter().map(|f| f.course_id)).await?;

    Ok(feedbacks
        .into_iter()
        .map(|feedback| FeedbackRow {
            student: students.get(&feedback.student_id).cloned(),
            course: courses.get(&feedback.course_id).cloned(),
            feedback,
        })
        .collect())
}

pub(crate) async fn payment_rows(
    storage: &Arc<dyn Storage>,
    payments: Vec<Payment>,
) -> Result<Vec<PaymentRow>> {
    let accounts = account_summaries(
        storage,
        payments
            .iter()
            .flat_map(|p| std::iter::once(p.student_id).chain(p.approved_by)),
    )
    .await?;
    let courses = course_summaries(storage, payments.iter().map(|p| p.course_id)).await?;

    Ok(payments
        .into_iter()
        .map(|payment| PaymentRow {
            student: accounts.get(&payment.student_id).cloned(),
            course: courses.get(&payment.course_id).cloned(),
            approved_by: payment.approved_by.and_then(|id| accounts.get(&id).cloned()),
            payment,
        })
        .collect())
}

pub(crate) fn course_videos_path(course_id: i64) -> String {
    format!("/manager/course/{course_id}/videos/")
}
