use super::{SeaOrmStorage, db_err};
use crate::entity::enrollments::{
    ActiveModel as EnrollmentActiveModel, Column as EnrollmentColumn, Entity as Enrollments,
};
use crate::entity::payments::{ActiveModel, Column, Entity as Payments};
use crate::errors::{LmsError, Result};
use crate::models::learning::payments::{
    NewPayment, Payment, PaymentAction, PaymentDecision, PaymentStatus,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

impl SeaOrmStorage {
    pub async fn has_pending_payment_impl(&self, student_id: i64, course_id: i64) -> Result<bool> {
        let count = Payments::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::CourseId.eq(course_id))
            .filter(Column::Status.eq(PaymentStatus::REQUESTED))
            .count(&self.db)
            .await
            .map_err(db_err("查询支付申请失败"))?;
        Ok(count > 0)
    }

    pub async fn create_payment_impl(&self, req: NewPayment) -> Result<Payment> {
        let now = chrono::Utc::now().timestamp();
        let model = ActiveModel {
            student_id: Set(req.student_id),
            course_id: Set(req.course_id),
            amount: Set(req.amount),
            payment_method: Set(req.payment_method.as_str().to_string()),
            transaction_id: Set(req.transaction_id),
            status: Set(PaymentStatus::Requested.to_string()),
            notes: Set(req.notes),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(db_err("创建支付申请失败"))?;
        Ok(result.into_payment())
    }

    pub async fn get_payment_impl(&self, payment_id: i64) -> Result<Option<Payment>> {
        let result = Payments::find_by_id(payment_id)
            .one(&self.db)
            .await
            .map_err(db_err("查询支付申请失败"))?;
        Ok(result.map(|m| m.into_payment()))
    }

    pub async fn list_student_payments_impl(&self, student_id: i64) -> Result<Vec<Payment>> {
        let result = Payments::find()
            .filter(Column::StudentId.eq(student_id))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err("查询学生支付申请失败"))?;
        Ok(result.into_iter().map(|m| m.into_payment()).collect())
    }

    pub async fn list_all_payments_impl(&self) -> Result<Vec<Payment>> {
        let result = Payments::find()
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err("查询支付申请失败"))?;
        Ok(result.into_iter().map(|m| m.into_payment()).collect())
    }

    /// 审批支付申请
    ///
    /// 只有 `requested` 状态可以审批；批准时在同一事务内补齐选课记录，
    /// 学生已在课程中时不重复创建。
    pub async fn decide_payment_impl(
        &self,
        payment_id: i64,
        approver_id: i64,
        action: PaymentAction,
        notes: Option<String>,
    ) -> Result<PaymentDecision> {
        let txn = self.db.begin().await.map_err(db_err("开启事务失败"))?;

        let Some(existing) = Payments::find_by_id(payment_id)
            .one(&txn)
            .await
            .map_err(db_err("查询支付申请失败"))?
        else {
            return Ok(PaymentDecision::NotFound);
        };

        // 状态列无法识别时拒绝审批，不当作待处理
        let current = existing.status.parse::<PaymentStatus>().map_err(|e| {
            LmsError::database_operation(format!("支付申请 {payment_id} 状态异常: {e}"))
        })?;
        if current != PaymentStatus::Requested {
            return Ok(PaymentDecision::AlreadyProcessed(current));
        }

        let now = chrono::Utc::now().timestamp();
        let student_id = existing.student_id;
        let course_id = existing.course_id;

        let mut model: ActiveModel = existing.into();
        model.status = Set(match action {
            PaymentAction::Approve => PaymentStatus::Approved.to_string(),
            PaymentAction::Reject => PaymentStatus::Rejected.to_string(),
        });
        model.approved_by = Set(Some(approver_id));
        model.approved_at = Set(Some(now));
        model.updated_at = Set(now);
        if let Some(notes) = notes.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()) {
            model.notes = Set(Some(notes));
        }
        let updated = model
            .update(&txn)
            .await
            .map_err(db_err("更新支付申请失败"))?;

        let decision = match action {
            PaymentAction::Approve => {
                let enrolled = Enrollments::find()
                    .filter(EnrollmentColumn::StudentId.eq(student_id))
                    .filter(EnrollmentColumn::CourseId.eq(course_id))
                    .count(&txn)
                    .await
                    .map_err(db_err("查询选课记录失败"))?
                    > 0;
                if !enrolled {
                    EnrollmentActiveModel {
                        student_id: Set(student_id),
                        course_id: Set(course_id),
                        enrolled_at: Set(now),
                        ..Default::default()
                    }
                    .insert(&txn)
                    .await
                    .map_err(db_err("创建选课记录失败"))?;
                }
                PaymentDecision::Approved {
                    payment: Box::new(updated.into_payment()),
                    newly_enrolled: !enrolled,
                }
            }
            PaymentAction::Reject => PaymentDecision::Rejected {
                payment: Box::new(updated.into_payment()),
            },
        };

        txn.commit().await.map_err(db_err("提交事务失败"))?;
        Ok(decision)
    }
}

#[cfg(test)]
mod tests {
    use super::super::courses::tests::{course_input, create_member};
    use super::*;
    use crate::models::accounts::entities::Role;
    use crate::models::learning::payments::PaymentMethod;
    use crate::storage::Storage;

    async fn setup() -> (SeaOrmStorage, i64, i64, i64) {
        let storage = SeaOrmStorage::in_memory().await.expect("storage");
        let manager = create_member(&storage, "manager1", Role::Manager).await;
        let student = create_member(&storage, "student1", Role::Student).await;
        let course = storage
            .create_course(course_input("Paid Course", manager))
            .await
            .expect("course");
        (storage, manager, student, course.id)
    }

    fn request(student_id: i64, course_id: i64) -> NewPayment {
        NewPayment {
            student_id,
            course_id,
            amount: 80.0,
            payment_method: PaymentMethod::Card,
            transaction_id: Some("TX-1".into()),
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_approve_enrolls_student_once() {
        let (storage, manager, student, course) = setup().await;
        let payment = storage
            .create_payment(request(student, course))
            .await
            .expect("payment");
        assert_eq!(payment.status, PaymentStatus::Requested);
        assert!(storage.has_pending_payment(student, course).await.expect("pending"));

        let decision = storage
            .decide_payment(payment.id, manager, PaymentAction::Approve, Some("ok".into()))
            .await
            .expect("approve");
        match decision {
            PaymentDecision::Approved {
                payment,
                newly_enrolled,
            } => {
                assert!(newly_enrolled);
                assert_eq!(payment.status, PaymentStatus::Approved);
                assert_eq!(payment.approved_by, Some(manager));
                assert_eq!(payment.notes.as_deref(), Some("ok"));
            }
            other => panic!("unexpected decision: {other:?}"),
        }
        assert!(storage.is_enrolled(student, course).await.expect("enrolled"));
        assert!(!storage.has_pending_payment(student, course).await.expect("pending"));

        // 终态申请不能再次审批
        let again = storage
            .decide_payment(payment.id, manager, PaymentAction::Reject, None)
            .await
            .expect("again");
        assert!(matches!(
            again,
            PaymentDecision::AlreadyProcessed(PaymentStatus::Approved)
        ));

        // 已在课程中的学生再次批准不会重复选课
        let second = storage
            .create_payment(request(student, course))
            .await
            .expect("second payment");
        let decision = storage
            .decide_payment(second.id, manager, PaymentAction::Approve, None)
            .await
            .expect("approve again");
        assert!(matches!(
            decision,
            PaymentDecision::Approved {
                newly_enrolled: false,
                ..
            }
        ));
        assert_eq!(storage.count_course_students(course).await.expect("count"), 1);
    }

    #[tokio::test]
    async fn test_reject_does_not_enroll() {
        let (storage, manager, student, course) = setup().await;
        let payment = storage
            .create_payment(request(student, course))
            .await
            .expect("payment");

        let decision = storage
            .decide_payment(payment.id, manager, PaymentAction::Reject, None)
            .await
            .expect("reject");
        assert!(matches!(decision, PaymentDecision::Rejected { .. }));
        assert!(!storage.is_enrolled(student, course).await.expect("enrolled"));

        let missing = storage
            .decide_payment(9999, manager, PaymentAction::Approve, None)
            .await
            .expect("missing");
        assert!(matches!(missing, PaymentDecision::NotFound));
    }

    #[tokio::test]
    async fn test_unknown_status_is_not_reopened() {
        let (storage, manager, student, course) = setup().await;
        let payment = storage
            .create_payment(request(student, course))
            .await
            .expect("payment");

        let mut broken: ActiveModel = Payments::find_by_id(payment.id)
            .one(&storage.db)
            .await
            .expect("query")
            .expect("exists")
            .into();
        broken.status = Set("archived".into());
        broken.update(&storage.db).await.expect("corrupt status");

        let err = storage
            .decide_payment(payment.id, manager, PaymentAction::Approve, None)
            .await
            .expect_err("unknown status must not be decided");
        assert_eq!(err.code(), "E005");
        assert!(!storage.is_enrolled(student, course).await.expect("enrolled"));
    }
}
