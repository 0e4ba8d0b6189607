use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{RequireAuth, RequireRole};
use crate::models::accounts::Role;
use crate::models::learning::{PaymentRequestForm, ProgressForm, RatingForm};
use crate::services::StudentService;
use crate::utils::{SafeCourseId, SafeTrainerId, SafeVideoId};

static STUDENT_SERVICE: Lazy<StudentService> = Lazy::new(StudentService::new_lazy);

pub async fn dashboard(request: HttpRequest) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.dashboard(&request).await
}

pub async fn course_detail(request: HttpRequest, course_id: SafeCourseId) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.course_detail(&request, course_id.0).await
}

pub async fn update_progress(
    request: HttpRequest,
    video_id: SafeVideoId,
    form: web::Form<ProgressForm>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .update_progress(&request, video_id.0, form.into_inner())
        .await
}

pub async fn payment_page(request: HttpRequest, course_id: SafeCourseId) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.payment_page(&request, course_id.0).await
}

pub async fn request_payment(
    request: HttpRequest,
    course_id: SafeCourseId,
    form: web::Form<PaymentRequestForm>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .request_payment(&request, course_id.0, form.into_inner())
        .await
}

pub async fn rate_trainer_page(
    request: HttpRequest,
    trainer_id: SafeTrainerId,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.rate_trainer_page(&request, trainer_id.0).await
}

pub async fn rate_trainer(
    request: HttpRequest,
    trainer_id: SafeTrainerId,
    form: web::Form<RatingForm>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .rate_trainer(&request, trainer_id.0, form.into_inner())
        .await
}

pub async fn trainer_contact(
    request: HttpRequest,
    trainer_id: SafeTrainerId,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.trainer_contact(&request, trainer_id.0).await
}

pub async fn rate_video_page(request: HttpRequest, video_id: SafeVideoId) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.rate_video_page(&request, video_id.0).await
}

pub async fn rate_video(
    request: HttpRequest,
    video_id: SafeVideoId,
    form: web::Form<RatingForm>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .rate_video(&request, video_id.0, form.into_inner())
        .await
}

pub async fn feedback_page(request: HttpRequest, course_id: SafeCourseId) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.feedback_page(&request, course_id.0).await
}

pub async fn submit_feedback(
    request: HttpRequest,
    course_id: SafeCourseId,
    form: web::Form<RatingForm>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .submit_feedback(&request, course_id.0, form.into_inner())
        .await
}

// 配置路由
pub fn configure_student_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/student")
            .wrap(RequireRole::new(Role::Student))
            .wrap(RequireAuth)
            .route("/dashboard/", web::get().to(dashboard))
            .route("/course/{course_id}/", web::get().to(course_detail))
            .route(
                "/video/{video_id}/progress/",
                web::post().to(update_progress),
            )
            .service(
                web::resource("/course/{course_id}/payment/")
                    .route(web::get().to(payment_page))
                    .route(web::post().to(request_payment)),
            )
            .service(
                web::resource("/trainer/{trainer_id}/rate/")
                    .route(web::get().to(rate_trainer_page))
                    .route(web::post().to(rate_trainer)),
            )
            .route(
                "/trainer/{trainer_id}/contact/",
                web::get().to(trainer_contact),
            )
            .service(
                web::resource("/video/{video_id}/rate/")
                    .route(web::get().to(rate_video_page))
                    .route(web::post().to(rate_video)),
            )
            .service(
                web::resource("/course/{course_id}/feedback/")
                    .route(web::get().to(feedback_page))
                    .route(web::post().to(submit_feedback)),
            ),
    );
}
