use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use tracing::info;

use crate::models::catalog::Course;
use crate::models::dashboards::PaymentPageView;
use crate::models::learning::{NewPayment, PaymentMethod, PaymentRequestForm};
use crate::models::{ErrorCode, Notice};
use crate::storage::Storage;
use crate::utils::{redirect_with_error, redirect_with_notice, render_page, server_error};

use super::{DASHBOARD_PATH, StudentService, course_path};

/// 已选课或已有待审批申请时返回跳转
async fn check_can_request(
    storage: &Arc<dyn Storage>,
    student_id: i64,
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

    match storage.is_enrolled(student_id, course.id).await {
        Ok(true) => {
            return Err(redirect_with_notice(
                &course_path(course.id),
                Notice::info("You are already enrolled in this course."),
            ));
        }
        Ok(false) => {}
        Err(e) => return Err(server_error("Failed to load enrollment", e)),
    }

    match storage.has_pending_payment(student_id, course.id).await {
        Ok(true) => Err(redirect_with_notice(
            DASHBOARD_PATH,
            Notice::info(
                "You have already requested to purchase this course. Please wait for manager approval.",
            ),
        )),
        Ok(false) => Ok(course),
        Err(e) => Err(server_error("Failed to load payments", e)),
    }
}

pub async fn handle_payment_page(
    service: &StudentService,
    request: &HttpRequest,
    course_id: i64,
) -> ActixResult<HttpResponse> {
    let member = require_member!(request);
    let storage = service.get_storage(request);

    let course = match check_can_request(&storage, member.id(), course_id).await {
        Ok(course) => course,
        Err(response) => return Ok(response),
    };

    Ok(render_page(
        request,
        PaymentPageView {
            course,
            methods: PaymentMethod::all().to_vec(),
        },
    ))
}

/// 重复申请检查是先查后写，并发提交时可能产生两条申请
pub async fn handle_request_payment(
    service: &StudentService,
    request: &HttpRequest,
    course_id: i64,
    form: PaymentRequestForm,
) -> ActixResult<HttpResponse> {
    let member = require_member!(request);
    let storage = service.get_storage(request);

    let course = match check_can_request(&storage, member.id(), course_id).await {
        Ok(course) => course,
        Err(response) => return Ok(response),
    };

    let payment = try_or_500!(
        storage
            .create_payment(NewPayment {
                student_id: member.id(),
                course_id: course.id,
                amount: course.price,
                payment_method: form.payment_method,
                transaction_id: form
                    .transaction_id
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty()),
                notes: form.notes.map(|n| n.trim().to_string()),
            })
            .await,
        "Failed to create payment request"
    );

    info!(
        "Payment request {} submitted by {} for course {}",
        payment.id, member.account.username, course.id
    );
    Ok(redirect_with_notice(
        DASHBOARD_PATH,
        Notice::success(
            "Payment request submitted! The manager will review and approve your request. You will be notified once approved.",
        ),
    ))
}
