use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{RequireAuth, RequireRole};
use crate::models::accounts::{AddTrainerForm, EditTrainerForm, Role};
use crate::models::catalog::{AssignTrainerForm, ContactForm, TrainerCourseForm};
use crate::models::learning::PaymentUpdateForm;
use crate::services::ManagerService;
use crate::utils::{SafeAssignmentId, SafeCourseId, SafePaymentId, SafeTrainerId, SafeVideoId};

// 懒加载的全局 ManagerService 实例
static MANAGER_SERVICE: Lazy<ManagerService> = Lazy::new(ManagerService::new_lazy);

pub async fn dashboard(request: HttpRequest) -> ActixResult<HttpResponse> {
    MANAGER_SERVICE.dashboard(&request).await
}

// 课程
pub async fn add_course_page(request: HttpRequest) -> ActixResult<HttpResponse> {
    MANAGER_SERVICE.add_course_page(&request).await
}

pub async fn add_course(request: HttpRequest, payload: Multipart) -> ActixResult<HttpResponse> {
    MANAGER_SERVICE.add_course(&request, payload).await
}

pub async fn edit_course_page(request: HttpRequest, course_id: SafeCourseId) -> ActixResult<HttpResponse> {
    MANAGER_SERVICE.edit_course_page(&request, course_id.0).await
}

pub async fn edit_course(
    request: HttpRequest,
    course_id: SafeCourseId,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    MANAGER_SERVICE
        .edit_course(&request, course_id.0, payload)
        .await
}

pub async fn delete_course_page(
    request: HttpRequest,
    course_id: SafeCourseId,
) -> ActixResult<HttpResponse> {
    MANAGER_SERVICE.delete_course_page(&request, course_id.0).await
}

pub async fn delete_course(request: HttpRequest, course_id: SafeCourseId) -> ActixResult<HttpResponse> {
    MANAGER_SERVICE.delete_course(&request, course_id.0).await
}

// 视频
pub async fn course_videos(request: HttpRequest, course_id: SafeCourseId) -> ActixResult<HttpResponse> {
    MANAGER_SERVICE.course_videos(&request, course_id.0).await
}

pub async fn add_video(
    request: HttpRequest,
    course_id: SafeCourseId,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    MANAGER_SERVICE
        .add_video(&request, course_id.0, payload)
        .await
}

pub async fn video_page(request: HttpRequest, video_id: SafeVideoId) -> ActixResult<HttpResponse> {
    MANAGER_SERVICE.video_page(&request, video_id.0).await
}

pub async fn edit_video(
    request: HttpRequest,
    video_id: SafeVideoId,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    MANAGER_SERVICE
        .edit_video(&request, video_id.0, payload)
        .await
}

pub async fn delete_video(request: HttpRequest, video_id: SafeVideoId) -> ActixResult<HttpResponse> {
    MANAGER_SERVICE.delete_video(&request, video_id.0).await
}

// 教练
pub async fn add_trainer_page(request: HttpRequest) -> ActixResult<HttpResponse> {
    MANAGER_SERVICE.add_trainer_page(&request).await
}

pub async fn add_trainer(
    request: HttpRequest,
    form: web::Form<AddTrainerForm>,
) -> ActixResult<HttpResponse> {
    MANAGER_SERVICE.add_trainer(&request, form.into_inner()).await
}

pub async fn trainer_page(request: HttpRequest, trainer_id: SafeTrainerId) -> ActixResult<HttpResponse> {
    MANAGER_SERVICE.trainer_page(&request, trainer_id.0).await
}

pub async fn edit_trainer(
    request: HttpRequest,
    trainer_id: SafeTrainerId,
    form: web::Form<EditTrainerForm>,
) -> ActixResult<HttpResponse> {
    MANAGER_SERVICE
        .edit_trainer(&request, trainer_id.0, form.into_inner())
        .await
}

pub async fn delete_trainer(
    request: HttpRequest,
    trainer_id: SafeTrainerId,
) -> ActixResult<HttpResponse> {
    MANAGER_SERVICE.delete_trainer(&request, trainer_id.0).await
}

pub async fn trainer_contact_page(
    request: HttpRequest,
    trainer_id: SafeTrainerId,
) -> ActixResult<HttpResponse> {
    MANAGER_SERVICE
        .trainer_contact_page(&request, trainer_id.0)
        .await
}

pub async fn edit_trainer_contact(
    request: HttpRequest,
    trainer_id: SafeTrainerId,
    form: web::Form<ContactForm>,
) -> ActixResult<HttpResponse> {
    MANAGER_SERVICE
        .edit_trainer_contact(&request, trainer_id.0, form.into_inner())
        .await
}

pub async fn delete_trainer_contact_page(
    request: HttpRequest,
    trainer_id: SafeTrainerId,
) -> ActixResult<HttpResponse> {
    MANAGER_SERVICE
        .delete_trainer_contact_page(&request, trainer_id.0)
        .await
}

pub async fn delete_trainer_contact(
    request: HttpRequest,
    trainer_id: SafeTrainerId,
) -> ActixResult<HttpResponse> {
    MANAGER_SERVICE
        .delete_trainer_contact(&request, trainer_id.0)
        .await
}

// 分配
pub async fn assign_trainer_page(request: HttpRequest) -> ActixResult<HttpResponse> {
    MANAGER_SERVICE.assign_trainer_page(&request).await
}

pub async fn assign_trainer(
    request: HttpRequest,
    form: web::Form<AssignTrainerForm>,
) -> ActixResult<HttpResponse> {
    MANAGER_SERVICE
        .assign_trainer(&request, form.into_inner())
        .await
}

pub async fn trainer_assignments(
    request: HttpRequest,
    trainer_id: SafeTrainerId,
) -> ActixResult<HttpResponse> {
    MANAGER_SERVICE
        .trainer_assignments(&request, trainer_id.0)
        .await
}

pub async fn assign_course_to_trainer(
    request: HttpRequest,
    trainer_id: SafeTrainerId,
    form: web::Form<TrainerCourseForm>,
) -> ActixResult<HttpResponse> {
    MANAGER_SERVICE
        .assign_course_to_trainer(&request, trainer_id.0, form.into_inner())
        .await
}

pub async fn unassign_page(
    request: HttpRequest,
    assignment_id: SafeAssignmentId,
) -> ActixResult<HttpResponse> {
    MANAGER_SERVICE.unassign_page(&request, assignment_id.0).await
}

pub async fn unassign_trainer(
    request: HttpRequest,
    assignment_id: SafeAssignmentId,
) -> ActixResult<HttpResponse> {
    MANAGER_SERVICE
        .unassign_trainer(&request, assignment_id.0)
        .await
}

// 反馈、进度、支付
pub async fn view_feedback(request: HttpRequest) -> ActixResult<HttpResponse> {
    MANAGER_SERVICE.view_feedback(&request).await
}

pub async fn analyze_progress(request: HttpRequest) -> ActixResult<HttpResponse> {
    MANAGER_SERVICE.analyze_progress(&request).await
}

pub async fn view_payments(request: HttpRequest) -> ActixResult<HttpResponse> {
    MANAGER_SERVICE.view_payments(&request).await
}

pub async fn payment_page(request: HttpRequest, payment_id: SafePaymentId) -> ActixResult<HttpResponse> {
    MANAGER_SERVICE.payment_page(&request, payment_id.0).await
}

pub async fn update_payment(
    request: HttpRequest,
    payment_id: SafePaymentId,
    form: web::Form<PaymentUpdateForm>,
) -> ActixResult<HttpResponse> {
    MANAGER_SERVICE
        .update_payment(&request, payment_id.0, form.into_inner())
        .await
}

// 配置路由
pub fn configure_manager_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/manager")
            .wrap(RequireRole::new(Role::Manager))
            .wrap(RequireAuth)
            .route("/dashboard/", web::get().to(dashboard))
            // 课程
            .service(
                web::resource("/add-course/")
                    .route(web::get().to(add_course_page))
                    .route(web::post().to(add_course)),
            )
            .service(
                web::resource("/course/{course_id}/edit/")
                    .route(web::get().to(edit_course_page))
                    .route(web::post().to(edit_course)),
            )
            .service(
                web::resource("/course/{course_id}/delete/")
                    .route(web::get().to(delete_course_page))
                    .route(web::post().to(delete_course)),
            )
            .route("/course/{course_id}/videos/", web::get().to(course_videos))
            .service(
                web::resource("/course/{course_id}/add-video/")
                    .route(web::get().to(course_videos))
                    .route(web::post().to(add_video)),
            )
            .service(
                web::resource("/video/{video_id}/edit/")
                    .route(web::get().to(video_page))
                    .route(web::post().to(edit_video)),
            )
            .service(
                web::resource("/video/{video_id}/delete/")
                    .route(web::get().to(video_page))
                    .route(web::post().to(delete_video)),
            )
            // 教练
            .service(
                web::resource("/add-trainer/")
                    .route(web::get().to(add_trainer_page))
                    .route(web::post().to(add_trainer)),
            )
            .service(
                web::resource("/trainer/{trainer_id}/edit/")
                    .route(web::get().to(trainer_page))
                    .route(web::post().to(edit_trainer)),
            )
            .service(
                web::resource("/trainer/{trainer_id}/delete/")
                    .route(web::get().to(trainer_page))
                    .route(web::post().to(delete_trainer)),
            )
            .service(
                web::resource("/trainer/{trainer_id}/contact/edit/")
                    .route(web::get().to(trainer_contact_page))
                    .route(web::post().to(edit_trainer_contact)),
            )
            .service(
                web::resource("/trainer/{trainer_id}/contact/delete/")
                    .route(web::get().to(delete_trainer_contact_page))
                    .route(web::post().to(delete_trainer_contact)),
            )
            .service(
                web::resource("/trainer/{trainer_id}/assignments/")
                    .route(web::get().to(trainer_assignments))
                    .route(web::post().to(assign_course_to_trainer)),
            )
            // 分配
            .service(
                web::resource("/assign-trainer/")
                    .route(web::get().to(assign_trainer_page))
                    .route(web::post().to(assign_trainer)),
            )
            .service(
                web::resource("/assignment/{assignment_id}/unassign/")
                    .route(web::get().to(unassign_page))
                    .route(web::post().to(unassign_trainer)),
            )
            // 报表与支付
            .route("/view-feedback/", web::get().to(view_feedback))
            .route("/analyze-progress/", web::get().to(analyze_progress))
            .route("/view-payments/", web::get().to(view_payments))
            .service(
                web::resource("/payment/{payment_id}/update/")
                    .route(web::get().to(payment_page))
                    .route(web::post().to(update_payment)),
            ),
    );
}
