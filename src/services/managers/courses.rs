use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use tracing::info;

use crate::models::accounts::{AccountSummary, Role};
use crate::models::catalog::{Course, CourseDeleteView, CourseForm, CourseFormView};
use crate::models::{ErrorCode, Notice};
use crate::services::common::{course_write_error, error_response};
use crate::storage::Storage;
use crate::utils::multipart::{MultipartForm, UploadKind};
use crate::utils::{redirect_with_error, redirect_with_notice, render_page, server_error};

use super::{DASHBOARD_PATH, ManagerService, find_course};

const COURSE_FILES: &[(&str, UploadKind)] = &[
    ("thumbnail", UploadKind::Image),
    ("featured_video", UploadKind::Video),
];

/// 可以担任讲师的账号：管理员和教练
async fn instructor_options(storage: &Arc<dyn Storage>) -> crate::errors::Result<Vec<AccountSummary>> {
    let mut instructors = Vec::new();
    for role in Role::staff_roles() {
        instructors.extend(
            storage
                .list_members_by_role(*role)
                .await?
                .iter()
                .map(|m| m.account.summary()),
        );
    }
    Ok(instructors)
}

/// 表单中指定的讲师必须存在，未指定时使用 `fallback`
async fn resolve_instructor(
    storage: &Arc<dyn Storage>,
    requested: Option<i64>,
    fallback: i64,
) -> Result<i64, HttpResponse> {
    let Some(instructor_id) = requested else {
        return Ok(fallback);
    };
    match storage.get_account_by_id(instructor_id).await {
        Ok(Some(account)) => Ok(account.id),
        Ok(None) => Err(redirect_with_error(
            DASHBOARD_PATH,
            ErrorCode::UserNotFound,
            "Instructor not found.",
        )),
        Err(e) => Err(server_error("Failed to load instructor", e)),
    }
}

pub async fn handle_add_course_page(
    service: &ManagerService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let instructors = try_or_500!(
        instructor_options(&storage).await,
        "Failed to load instructors"
    );
    Ok(render_page(
        request,
        CourseFormView {
            course: None,
            instructors,
        },
    ))
}

pub async fn handle_add_course(
    service: &ManagerService,
    request: &HttpRequest,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    let member = require_member!(request);
    save_course(service, request, None, member.id(), payload).await
}

pub async fn handle_edit_course_page(
    service: &ManagerService,
    request: &HttpRequest,
    course_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let course = match find_course(&storage, course_id).await {
        Ok(course) => course,
        Err(response) => return Ok(response),
    };
    let instructors = try_or_500!(
        instructor_options(&storage).await,
        "Failed to load instructors"
    );
    Ok(render_page(
        request,
        CourseFormView {
            course: Some(course),
            instructors,
        },
    ))
}

pub async fn handle_edit_course(
    service: &ManagerService,
    request: &HttpRequest,
    course_id: i64,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let course = match find_course(&storage, course_id).await {
        Ok(course) => course,
        Err(response) => return Ok(response),
    };
    let instructor_id = course.instructor_id;
    save_course(service, request, Some(course), instructor_id, payload).await
}

/// 新建和编辑共用：解析表单、确定讲师、写入；原价和折扣一起写入以重算折后价
async fn save_course(
    service: &ManagerService,
    request: &HttpRequest,
    existing: Option<Course>,
    default_instructor: i64,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let form = match MultipartForm::from_payload(payload, &service.get_config().upload, COURSE_FILES)
        .await
    {
        Ok(form) => form,
        Err(e) => return Ok(error_response(e)),
    };
    let fields = match CourseForm::from_multipart(&form) {
        Ok(fields) => fields,
        Err(e) => {
            form.discard_files();
            return Ok(error_response(e));
        }
    };

    let instructor_id =
        match resolve_instructor(&storage, fields.instructor, default_instructor).await {
            Ok(id) => id,
            Err(response) => {
                form.discard_files();
                return Ok(response);
            }
        };

    let input = match fields.into_input(
        existing.as_ref(),
        instructor_id,
        form.file("thumbnail").map(|f| f.reference.clone()),
        form.file("featured_video").map(|f| f.reference.clone()),
    ) {
        Ok(input) => input,
        Err(e) => {
            form.discard_files();
            return Ok(error_response(e));
        }
    };

    let result = match &existing {
        None => storage.create_course(input).await.map(Some),
        Some(course) => storage.update_course(course.id, input).await,
    };

    match result {
        Ok(Some(course)) if existing.is_none() => {
            info!("Course \"{}\" created (id {})", course.title, course.id);
            Ok(redirect_with_notice(
                DASHBOARD_PATH,
                Notice::success(format!("Course \"{}\" created successfully!", course.title)),
            ))
        }
        Ok(Some(course)) => {
            info!("Course \"{}\" updated (id {})", course.title, course.id);
            Ok(redirect_with_notice(
                DASHBOARD_PATH,
                Notice::success(format!("Course \"{}\" updated successfully!", course.title)),
            ))
        }
        Ok(None) => {
            form.discard_files();
            Ok(redirect_with_error(
                DASHBOARD_PATH,
                ErrorCode::CourseNotFound,
                "Course not found.",
            ))
        }
        Err(e) => {
            form.discard_files();
            Ok(course_write_error(e))
        }
    }
}

pub async fn handle_delete_course_page(
    service: &ManagerService,
    request: &HttpRequest,
    course_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let course = match find_course(&storage, course_id).await {
        Ok(course) => course,
        Err(response) => return Ok(response),
    };
    let video_count = try_or_500!(
        storage.count_course_videos(course.id).await,
        "Failed to count videos"
    );
    let student_count = try_or_500!(
        storage.count_course_students(course.id).await,
        "Failed to count students"
    );

    Ok(render_page(
        request,
        CourseDeleteView {
            course,
            video_count,
            student_count,
        },
    ))
}

/// 删除课程及其视频、进度、评分、选课、分配、支付和反馈
pub async fn handle_delete_course(
    service: &ManagerService,
    request: &HttpRequest,
    course_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let course = match find_course(&storage, course_id).await {
        Ok(course) => course,
        Err(response) => return Ok(response),
    };

    match storage.delete_course_cascade(course.id).await {
        Ok(true) => {
            info!("Course \"{}\" deleted (id {})", course.title, course.id);
            Ok(redirect_with_notice(
                DASHBOARD_PATH,
                Notice::success(format!("Course \"{}\" deleted successfully!", course.title)),
            ))
        }
        Ok(false) => Ok(redirect_with_error(
            DASHBOARD_PATH,
            ErrorCode::CourseNotFound,
            "Course not found.",
        )),
        Err(e) => Ok(server_error("Failed to delete course", e)),
    }
}
