use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use crate::models::accounts::Role;
use crate::models::catalog::{
    AssignTrainerForm, AssignTrainerView, CourseSummary, TrainerAssignmentsView, TrainerCourseForm,
};
use crate::models::{ErrorCode, Notice};
use crate::services::common::assignment_rows;
use crate::utils::{form_error, redirect_with_error, redirect_with_notice, render_page, server_error};

use super::{ManagerService, find_course, find_trainer};

const ASSIGN_PATH: &str = "/manager/assign-trainer/";

fn trainer_assignments_path(trainer_id: i64) -> String {
    format!("/manager/trainer/{trainer_id}/assignments/")
}

pub async fn handle_assign_trainer_page(
    service: &ManagerService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let trainers = try_or_500!(
        storage.list_members_by_role(Role::Trainer).await,
        "Failed to load trainers"
    );
    let courses = try_or_500!(storage.list_all_courses().await, "Failed to load courses");
    let assignments = try_or_500!(
        storage.list_assignments().await,
        "Failed to load assignments"
    );
    let assignments = try_or_500!(
        assignment_rows(&storage, assignments).await,
        "Failed to load assignments"
    );

    Ok(render_page(
        request,
        AssignTrainerView {
            trainers: trainers.iter().map(|m| m.account.summary()).collect(),
            courses: courses.iter().map(CourseSummary::from).collect(),
            assignments,
        },
    ))
}

/// 已分配时给出提示，不重复写入
pub async fn handle_assign_trainer(
    service: &ManagerService,
    request: &HttpRequest,
    form: AssignTrainerForm,
) -> ActixResult<HttpResponse> {
    let member = require_member!(request);
    let storage = service.get_storage(request);

    let trainer = match find_trainer(&storage, form.trainer).await {
        Ok(trainer) => trainer,
        Err(response) => return Ok(response),
    };
    let course = match find_course(&storage, form.course).await {
        Ok(course) => course,
        Err(response) => return Ok(response),
    };

    let created = try_or_500!(
        storage
            .assign_trainer(trainer.id(), course.id, Some(member.id()))
            .await,
        "Failed to assign trainer"
    );

    let notice = if created.is_some() {
        info!(
            "Trainer {} assigned to course {} by {}",
            trainer.account.username, course.id, member.account.username
        );
        Notice::success(format!(
            "Trainer \"{}\" assigned to \"{}\" successfully!",
            trainer.account.username, course.title
        ))
    } else {
        Notice::info(format!(
            "Trainer \"{}\" is already assigned to \"{}\".",
            trainer.account.username, course.title
        ))
    };
    Ok(redirect_with_notice(ASSIGN_PATH, notice))
}

pub async fn handle_trainer_assignments(
    service: &ManagerService,
    request: &HttpRequest,
    trainer_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let trainer = match find_trainer(&storage, trainer_id).await {
        Ok(trainer) => trainer,
        Err(response) => return Ok(response),
    };

    let assignments = try_or_500!(
        storage.list_trainer_assignments(trainer.id()).await,
        "Failed to load assignments"
    );
    let assignments = try_or_500!(
        assignment_rows(&storage, assignments).await,
        "Failed to load assignments"
    );
    let all_courses = try_or_500!(storage.list_all_courses().await, "Failed to load courses");

    Ok(render_page(
        request,
        TrainerAssignmentsView {
            trainer: trainer.account.summary(),
            assignments,
            all_courses: all_courses.iter().map(CourseSummary::from).collect(),
        },
    ))
}

pub async fn handle_assign_course_to_trainer(
    service: &ManagerService,
    request: &HttpRequest,
    trainer_id: i64,
    form: TrainerCourseForm,
) -> ActixResult<HttpResponse> {
    let member = require_member!(request);
    let storage = service.get_storage(request);

    let trainer = match find_trainer(&storage, trainer_id).await {
        Ok(trainer) => trainer,
        Err(response) => return Ok(response),
    };
    let Some(course_id) = form.course else {
        return Ok(form_error("Please select a course."));
    };
    let course = match find_course(&storage, course_id).await {
        Ok(course) => course,
        Err(response) => return Ok(response),
    };

    let created = try_or_500!(
        storage
            .assign_trainer(trainer.id(), course.id, Some(member.id()))
            .await,
        "Failed to assign trainer"
    );

    let notice = if created.is_some() {
        info!(
            "Trainer {} assigned to course {} by {}",
            trainer.account.username, course.id, member.account.username
        );
        Notice::success(format!(
            "Trainer assigned to \"{}\" successfully!",
            course.title
        ))
    } else {
        Notice::info(format!(
            "Trainer \"{}\" is already assigned to \"{}\".",
            trainer.account.username, course.title
        ))
    };
    Ok(redirect_with_notice(
        &trainer_assignments_path(trainer.id()),
        notice,
    ))
}

pub async fn handle_unassign_page(
    service: &ManagerService,
    request: &HttpRequest,
    assignment_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let assignment = match storage.get_assignment(assignment_id).await {
        Ok(Some(assignment)) => assignment,
        Ok(None) => return Ok(assignment_not_found()),
        Err(e) => return Ok(server_error("Failed to load assignment", e)),
    };
    let rows = try_or_500!(
        assignment_rows(&storage, vec![assignment]).await,
        "Failed to load assignment"
    );

    match rows.into_iter().next() {
        Some(row) => Ok(render_page(request, row)),
        None => Ok(assignment_not_found()),
    }
}

pub async fn handle_unassign_trainer(
    service: &ManagerService,
    request: &HttpRequest,
    assignment_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let assignment = match storage.get_assignment(assignment_id).await {
        Ok(Some(assignment)) => assignment,
        Ok(None) => return Ok(assignment_not_found()),
        Err(e) => return Ok(server_error("Failed to load assignment", e)),
    };
    let row = try_or_500!(
        assignment_rows(&storage, vec![assignment.clone()]).await,
        "Failed to load assignment"
    )
    .into_iter()
    .next();

    match storage.delete_assignment(assignment.id).await {
        Ok(true) => {
            info!(
                "Trainer {} unassigned from course {}",
                assignment.trainer_id, assignment.course_id
            );
            let message = match row {
                Some(row) => format!(
                    "Trainer \"{}\" unassigned from \"{}\" successfully!",
                    row.trainer.username, row.course.title
                ),
                None => "Trainer unassigned successfully!".to_string(),
            };
            Ok(redirect_with_notice(ASSIGN_PATH, Notice::success(message)))
        }
        Ok(false) => Ok(assignment_not_found()),
        Err(e) => Ok(server_error("Failed to unassign trainer", e)),
    }
}

fn assignment_not_found() -> HttpResponse {
    redirect_with_error(
        ASSIGN_PATH,
        ErrorCode::AssignmentNotFound,
        "Assignment not found.",
    )
}
