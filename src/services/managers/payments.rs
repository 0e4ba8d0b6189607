use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use crate::models::dashboards::{PaymentTotals, PaymentsOverview};
use crate::models::learning::{PaymentDecision, PaymentUpdateForm};
use crate::models::{ErrorCode, Notice};
use crate::utils::{redirect_with_error, redirect_with_notice, render_page, server_error};

use super::{ManagerService, payment_rows};

const PAYMENTS_PATH: &str = "/manager/view-payments/";

pub async fn handle_view_payments(
    service: &ManagerService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let payments = try_or_500!(storage.list_all_payments().await, "Failed to load payments");
    let totals = PaymentTotals::from_payments(&payments);
    let payments = try_or_500!(
        payment_rows(&storage, payments).await,
        "Failed to load payments"
    );

    Ok(render_page(request, PaymentsOverview { payments, totals }))
}

pub async fn handle_payment_page(
    service: &ManagerService,
    request: &HttpRequest,
    payment_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let payment = match storage.get_payment(payment_id).await {
        Ok(Some(payment)) => payment,
        Ok(None) => return Ok(payment_not_found()),
        Err(e) => return Ok(server_error("Failed to load payment", e)),
    };
    let row = try_or_500!(
        payment_rows(&storage, vec![payment]).await,
        "Failed to load payment"
    );

    match row.into_iter().next() {
        Some(row) => Ok(render_page(request, row)),
        None => Ok(payment_not_found()),
    }
}

/// 审批在一个事务内完成，批准时同时写入选课记录；终态申请不再改动
pub async fn handle_update_payment(
    service: &ManagerService,
    request: &HttpRequest,
    payment_id: i64,
    form: PaymentUpdateForm,
) -> ActixResult<HttpResponse> {
    let member = require_member!(request);
    let storage = service.get_storage(request);

    let notes = form
        .notes
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());
    let decision = try_or_500!(
        storage
            .decide_payment(payment_id, member.id(), form.action, notes)
            .await,
        "Failed to update payment"
    );

    match decision {
        PaymentDecision::Approved {
            payment,
            newly_enrolled,
        } => {
            let student = try_or_500!(
                storage.get_account_by_id(payment.student_id).await,
                "Failed to load student"
            );
            let course = try_or_500!(
                storage.get_course(payment.course_id).await,
                "Failed to load course"
            );
            info!(
                "Payment {} approved by {} (new enrollment: {})",
                payment.id, member.account.username, newly_enrolled
            );
            Ok(redirect_with_notice(
                PAYMENTS_PATH,
                Notice::success(format!(
                    "Payment request approved! Student \"{}\" has been enrolled in \"{}\".",
                    student.map(|s| s.username).unwrap_or_default(),
                    course.map(|c| c.title).unwrap_or_default()
                )),
            ))
        }
        PaymentDecision::Rejected { payment } => {
            info!(
                "Payment {} rejected by {}",
                payment.id, member.account.username
            );
            Ok(redirect_with_notice(
                PAYMENTS_PATH,
                Notice::success("Payment request rejected."),
            ))
        }
        PaymentDecision::AlreadyProcessed(status) => Ok(redirect_with_error(
            PAYMENTS_PATH,
            ErrorCode::PaymentAlreadyProcessed,
            format!("This payment request has already been {status}."),
        )),
        PaymentDecision::NotFound => Ok(payment_not_found()),
    }
}

fn payment_not_found() -> HttpResponse {
    redirect_with_error(
        PAYMENTS_PATH,
        ErrorCode::PaymentNotFound,
        "Payment request not found.",
    )
}

