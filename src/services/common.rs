//! 各服务共用的查询和响应辅助函数

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, web};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::cache::ObjectCache;
use crate::config::AppConfig;
use crate::errors::{LmsError, Result};
use crate::middlewares::RequireAuth;
use crate::middlewares::require_auth::{LOGIN_REQUIRED_MESSAGE, account_cache_key};
use crate::models::ErrorCode;
use crate::models::accounts::{AccountSummary, Member};
use crate::models::catalog::{AssignmentRow, CourseSummary, TrainerAssignment};
use crate::models::learning::CourseProgressSummary;
use crate::storage::Storage;
use crate::utils::jwt::JwtUtils;
use crate::utils::progress::summarize_course_progress;
use crate::utils::validate::{validate_email, validate_password_simple, validate_username};
use crate::utils::{form_error, form_error_with, redirect_with_error, server_error};

pub(crate) fn current_member(request: &HttpRequest) -> std::result::Result<Member, HttpResponse> {
    RequireAuth::extract_member(request).ok_or_else(|| {
        redirect_with_error(
            &AppConfig::get().app.login_path,
            ErrorCode::Unauthorized,
            LOGIN_REQUIRED_MESSAGE,
        )
    })
}

/// 业务错误转换为表单响应
pub(crate) fn error_response(err: LmsError) -> HttpResponse {
    match err {
        LmsError::Validation(msg) => form_error(msg),
        LmsError::Conflict(msg) => form_error_with(StatusCode::CONFLICT, ErrorCode::Conflict, msg),
        LmsError::NotFound(msg) => form_error_with(StatusCode::NOT_FOUND, ErrorCode::NotFound, msg),
        LmsError::Forbidden(msg) => {
            form_error_with(StatusCode::FORBIDDEN, ErrorCode::Forbidden, msg)
        }
        other => server_error("Request failed", other),
    }
}

/// 删除当前令牌对应的账号缓存（退出登录、资料变更后调用）
pub(crate) async fn forget_cached_account(request: &HttpRequest) {
    let Some(token) = JwtUtils::extract_access_token(request) else {
        return;
    };
    if let Some(cache) = request.app_data::<web::Data<Arc<dyn ObjectCache>>>() {
        cache.remove(&account_cache_key(&token)).await;
    }
}

pub(crate) async fn account_summaries<I>(
    storage: &Arc<dyn Storage>,
    ids: I,
) -> Result<HashMap<i64, AccountSummary>>
where
    I: IntoIterator<Item = i64>,
{
    let ids: Vec<i64> = ids.into_iter().collect::<HashSet<_>>().into_iter().collect();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let accounts = storage.list_accounts_by_ids(&ids).await?;
    Ok(accounts.iter().map(|a| (a.id, a.summary())).collect())
}

pub(crate) async fn course_summaries<I>(
    storage: &Arc<dyn Storage>,
    ids: I,
) -> Result<HashMap<i64, CourseSummary>>
where
    I: IntoIterator<Item = i64>,
{
    let ids: Vec<i64> = ids.into_iter().collect::<HashSet<_>>().into_iter().collect();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let courses = storage.list_courses_by_ids(&ids).await?;
    Ok(courses
        .iter()
        .map(|c| (c.id, CourseSummary::from(c)))
        .collect())
}

/// 学生在某门课程上的进度，每次都从进度记录重新计算
pub(crate) async fn student_course_progress(
    storage: &Arc<dyn Storage>,
    student_id: i64,
    course_id: i64,
    total_videos: u64,
) -> Result<CourseProgressSummary> {
    let rows = storage
        .list_student_progress_for_course(student_id, course_id)
        .await?;
    Ok(summarize_course_progress(
        total_videos,
        rows.iter().map(|p| (p.completed, p.time_spent_seconds)),
    ))
}

/// 分配记录补全教练、课程和分配人信息，关联数据缺失的行被跳过
pub(crate) async fn assignment_rows(
    storage: &Arc<dyn Storage>,
    assignments: Vec<TrainerAssignment>,
) -> Result<Vec<AssignmentRow>> {
    let accounts = account_summaries(
        storage,
        assignments
            .iter()
            .flat_map(|a| std::iter::once(a.trainer_id).chain(a.assigned_by)),
    )
    .await?;
    let courses = course_summaries(storage, assignments.iter().map(|a| a.course_id)).await?;

    Ok(assignments
        .into_iter()
        .filter_map(|a| {
            Some(AssignmentRow {
                id: a.id,
                trainer: accounts.get(&a.trainer_id)?.clone(),
                course: courses.get(&a.course_id)?.clone(),
                assigned_by: a.assigned_by.and_then(|id| accounts.get(&id).cloned()),
                assigned_at: a.assigned_at,
            })
        })
        .collect())
}

/// 课程写入失败：slug 冲突给出可读提示，其余按通用规则处理
pub(crate) fn course_write_error(err: LmsError) -> HttpResponse {
    match err {
        LmsError::Conflict(_) => form_error_with(
            StatusCode::CONFLICT,
            ErrorCode::CourseSlugConflict,
            "A course with this title already exists.",
        ),
        other => error_response(other),
    }
}

/// 新账号的格式校验和重复检查，唯一索引兜底
pub(crate) async fn check_new_account(
    storage: &Arc<dyn Storage>,
    username: &str,
    email: &str,
    password: &str,
) -> std::result::Result<(), HttpResponse> {
    if let Err(msg) = validate_username(username) {
        return Err(form_error_with(
            StatusCode::BAD_REQUEST,
            ErrorCode::UserNameInvalid,
            msg,
        ));
    }
    if let Err(msg) = validate_email(email) {
        return Err(form_error_with(
            StatusCode::BAD_REQUEST,
            ErrorCode::UserEmailInvalid,
            msg,
        ));
    }
    if let Err(msg) = validate_password_simple(password) {
        return Err(form_error_with(
            StatusCode::BAD_REQUEST,
            ErrorCode::UserPasswordInvalid,
            msg,
        ));
    }

    match storage.username_exists(username).await {
        Ok(true) => {
            return Err(form_error_with(
                StatusCode::CONFLICT,
                ErrorCode::UserNameAlreadyExists,
                "Username already exists.",
            ));
        }
        Ok(false) => {}
        Err(e) => return Err(server_error("Failed to check username", e)),
    }

    match storage.email_exists(email, None).await {
        Ok(true) => Err(form_error_with(
            StatusCode::CONFLICT,
            ErrorCode::UserEmailAlreadyExists,
            "Email already exists.",
        )),
        Ok(false) => Ok(()),
        Err(e) => Err(server_error("Failed to check email", e)),
    }
}

/// 并发注册时唯一索引冲突
pub(crate) fn account_conflict() -> HttpResponse {
    form_error_with(
        StatusCode::CONFLICT,
        ErrorCode::UserNameAlreadyExists,
        "Username or email already exists.",
    )
}
