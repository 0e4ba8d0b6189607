//! 购买申请实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub course_id: i64,
    #[sea_orm(column_type = "Double")]
    pub amount: f64,
    pub payment_method: String,
    pub transaction_id: Option<String>,
    pub status: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub approved_by: Option<i64>,
    pub approved_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_payment(self) -> crate::models::learning::payments::Payment {
        use super::to_datetime;
        use crate::models::learning::payments::{Payment, PaymentMethod, PaymentStatus};

        Payment {
            id: self.id,
            student_id: self.student_id,
            course_id: self.course_id,
            amount: self.amount,
            payment_method: self
                .payment_method
                .parse::<PaymentMethod>()
                .unwrap_or(PaymentMethod::Other),
            transaction_id: self.transaction_id,
            status: self
                .status
                .parse::<PaymentStatus>()
                .unwrap_or(PaymentStatus::Requested),
            notes: self.notes,
            approved_by: self.approved_by,
            approved_at: self.approved_at.map(to_datetime),
            created_at: to_datetime(self.created_at),
            updated_at: to_datetime(self.updated_at),
        }
    }
}
