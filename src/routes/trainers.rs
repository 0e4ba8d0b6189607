use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{RequireAuth, RequireRole};
use crate::models::accounts::Role;
use crate::models::catalog::ContactForm;
use crate::services::TrainerService;
use crate::utils::SafeCourseId;

static TRAINER_SERVICE: Lazy<TrainerService> = Lazy::new(TrainerService::new_lazy);

pub async fn dashboard(request: HttpRequest) -> ActixResult<HttpResponse> {
    TRAINER_SERVICE.dashboard(&request).await
}

pub async fn course_students(request: HttpRequest, course_id: SafeCourseId) -> ActixResult<HttpResponse> {
    TRAINER_SERVICE.course_students(&request, course_id.0).await
}

pub async fn upload_video_page(
    request: HttpRequest,
    course_id: SafeCourseId,
) -> ActixResult<HttpResponse> {
    TRAINER_SERVICE.upload_video_page(&request, course_id.0).await
}

pub async fn upload_video(
    request: HttpRequest,
    course_id: SafeCourseId,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    TRAINER_SERVICE
        .upload_video(&request, course_id.0, payload)
        .await
}

pub async fn contact_page(request: HttpRequest) -> ActixResult<HttpResponse> {
    TRAINER_SERVICE.contact_page(&request).await
}

pub async fn edit_contact(
    request: HttpRequest,
    form: web::Form<ContactForm>,
) -> ActixResult<HttpResponse> {
    TRAINER_SERVICE.edit_contact(&request, form.into_inner()).await
}

pub async fn delete_contact_page(request: HttpRequest) -> ActixResult<HttpResponse> {
    TRAINER_SERVICE.delete_contact_page(&request).await
}

pub async fn delete_contact(request: HttpRequest) -> ActixResult<HttpResponse> {
    TRAINER_SERVICE.delete_contact(&request).await
}

// 配置路由
pub fn configure_trainer_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/trainer")
            .wrap(RequireRole::new(Role::Trainer))
            .wrap(RequireAuth)
            .route("/dashboard/", web::get().to(dashboard))
            .route(
                "/course/{course_id}/students/",
                web::get().to(course_students),
            )
            .service(
                web::resource("/course/{course_id}/upload-video/")
                    .route(web::get().to(upload_video_page))
                    .route(web::post().to(upload_video)),
            )
            .service(
                web::resource("/contact/edit/")
                    .route(web::get().to(contact_page))
                    .route(web::post().to(edit_contact)),
            )
            .service(
                web::resource("/contact/delete/")
                    .route(web::get().to(delete_contact_page))
                    .route(web::post().to(delete_contact)),
            ),
    );
}
