use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 支付申请状态：requested -> approved / rejected，后两者为终态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "learning.ts")]
pub enum PaymentStatus {
    Requested,
    Approved,
    Rejected,
}

impl PaymentStatus {
    pub const REQUESTED: &'static str = "requested";
    pub const APPROVED: &'static str = "approved";
    pub const REJECTED: &'static str = "rejected";
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Requested => write!(f, "{}", PaymentStatus::REQUESTED),
            PaymentStatus::Approved => write!(f, "{}", PaymentStatus::APPROVED),
            PaymentStatus::Rejected => write!(f, "{}", PaymentStatus::REJECTED),
        }
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            PaymentStatus::REQUESTED => Ok(PaymentStatus::Requested),
            PaymentStatus::APPROVED => Ok(PaymentStatus::Approved),
            PaymentStatus::REJECTED => Ok(PaymentStatus::Rejected),
            _ => Err(format!("Invalid payment status: {s}")),
        }
    }
}

// 支付方式
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "learning.ts")]
pub enum PaymentMethod {
    #[default]
    Card,
    Upi,
    Netbanking,
    Wallet,
    Cash,
    Other,
}

impl PaymentMethod {
    pub fn all() -> &'static [PaymentMethod] {
        &[
            Self::Card,
            Self::Upi,
            Self::Netbanking,
            Self::Wallet,
            Self::Cash,
            Self::Other,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::Card => "card",
            PaymentMethod::Upi => "upi",
            PaymentMethod::Netbanking => "netbanking",
            PaymentMethod::Wallet => "wallet",
            PaymentMethod::Cash => "cash",
            PaymentMethod::Other => "other",
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PaymentMethod::all()
            .iter()
            .copied()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| format!("Invalid payment method: {s}"))
    }
}

// 支付申请
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "learning.ts")]
pub struct Payment {
    pub id: i64,
    pub student_id: i64,
    pub course_id: i64,
    pub amount: f64,
    pub payment_method: PaymentMethod,
    pub transaction_id: Option<String>,
    pub status: PaymentStatus,
    pub notes: Option<String>,
    pub approved_by: Option<i64>,
    pub approved_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 学生提交的支付申请表单
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "learning.ts")]
pub struct PaymentRequestForm {
    #[serde(default)]
    pub payment_method: PaymentMethod,
    pub transaction_id: Option<String>,
    pub notes: Option<String>,
}

/// 新支付申请的存储层输入
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub student_id: i64,
    pub course_id: i64,
    pub amount: f64,
    pub payment_method: PaymentMethod,
    pub transaction_id: Option<String>,
    pub notes: Option<String>,
}

// 管理员审批动作
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "learning.ts")]
pub enum PaymentAction {
    Approve,
    Reject,
}

// 管理员审批表单
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "learning.ts")]
pub struct PaymentUpdateForm {
    pub action: PaymentAction,
    pub notes: Option<String>,
}

/// 审批结果
#[derive(Debug, Clone)]
pub enum PaymentDecision {
    /// 已批准；`newly_enrolled` 为 false 表示学生此前已在课程中
    Approved {
        payment: Box<Payment>,
        newly_enrolled: bool,
    },
    Rejected {
        payment: Box<Payment>,
    },
    /// 申请已处于终态，未做任何修改
    AlreadyProcessed(PaymentStatus),
    NotFound,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            PaymentStatus::Requested,
            PaymentStatus::Approved,
            PaymentStatus::Rejected,
        ] {
            assert_eq!(status.to_string().parse::<PaymentStatus>(), Ok(status));
        }
    }

    #[test]
    fn test_payment_form_defaults_to_card() {
        let form: PaymentRequestForm = serde_json::from_str("{}").expect("empty form");
        assert_eq!(form.payment_method, PaymentMethod::Card);
        assert_eq!("upi".parse::<PaymentMethod>(), Ok(PaymentMethod::Upi));
        assert!("cheque".parse::<PaymentMethod>().is_err());
    }
}
