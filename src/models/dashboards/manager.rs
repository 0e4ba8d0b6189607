use serde::Serialize;
use ts_rs::TS;

use crate::models::accounts::{AccountSummary, Location};
use crate::models::catalog::{AssignmentRow, Course, CourseSummary, CourseVideo, TrainerContact};
use crate::models::learning::{Enrollment, Feedback, Payment, TrainerRating, VideoRating};

// 管理员首页的课程行
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "dashboard.ts")]
pub struct CourseOverview {
    pub course: Course,
    pub instructor: Option<AccountSummary>,
    pub num_students: u64,
    pub num_videos: u64,
    pub average_feedback: Option<f64>,
}

// 管理员首页的教练行
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "dashboard.ts")]
pub struct TrainerOverview {
    pub trainer: AccountSummary,
    pub num_courses: u64,
    pub average_rating: Option<f64>,
    pub num_ratings: u64,
    pub joined_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "dashboard.ts")]
pub struct TrainerRatingRow {
    pub rating: TrainerRating,
    pub trainer: Option<AccountSummary>,
    pub student: Option<AccountSummary>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "dashboard.ts")]
pub struct VideoRatingRow {
    pub rating: VideoRating,
    pub video: Option<CourseVideo>,
    pub student: Option<AccountSummary>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "dashboard.ts")]
pub struct FeedbackRow {
    pub feedback: Feedback,
    pub student: Option<AccountSummary>,
    pub course: Option<CourseSummary>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "dashboard.ts")]
pub struct EnrollmentRow {
    pub enrollment: Enrollment,
    pub student: Option<AccountSummary>,
    pub course: Option<CourseSummary>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "dashboard.ts")]
pub struct ManagerTotals {
    pub total_courses: u64,
    pub total_students: u64,
    pub total_trainers: u64,
    pub total_enrollments: u64,
}

// 管理员首页
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "dashboard.ts")]
pub struct ManagerDashboard {
    pub totals: ManagerTotals,
    pub courses: Vec<CourseOverview>,
    pub trainers: Vec<TrainerOverview>,
    pub trainer_ratings: Vec<TrainerRatingRow>,
    pub video_ratings: Vec<VideoRatingRow>,
    pub all_feedback: Vec<FeedbackRow>,
    pub recent_enrollments: Vec<EnrollmentRow>,
    pub recent_feedback: Vec<FeedbackRow>,
}

// 全部反馈
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "dashboard.ts")]
pub struct FeedbackOverview {
    pub feedbacks: Vec<FeedbackRow>,
    pub average_rating: Option<f64>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "dashboard.ts")]
pub struct CourseAnalytics {
    pub course: CourseSummary,
    pub total_students: u64,
    pub total_videos: u64,
    /// 已选学生的平均进度，保留一位小数
    pub average_progress: f64,
}

// 学习进度分析
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "dashboard.ts")]
pub struct ProgressAnalysis {
    pub courses: Vec<CourseAnalytics>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "dashboard.ts")]
pub struct PaymentRow {
    pub payment: Payment,
    pub student: Option<AccountSummary>,
    pub course: Option<CourseSummary>,
    pub approved_by: Option<AccountSummary>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, TS)]
#[ts(export, export_to = "dashboard.ts")]
pub struct PaymentTotals {
    pub total_payments: u64,
    /// 已批准申请的金额合计
    pub total_amount: f64,
    pub requested_payments: u64,
    pub approved_payments: u64,
    pub rejected_payments: u64,
}

impl PaymentTotals {
    pub fn from_payments(payments: &[Payment]) -> Self {
        use crate::models::learning::PaymentStatus;

        let mut totals = PaymentTotals {
            total_payments: payments.len() as u64,
            ..Default::default()
        };
        for payment in payments {
            match payment.status {
                PaymentStatus::Requested => totals.requested_payments += 1,
                PaymentStatus::Approved => {
                    totals.approved_payments += 1;
                    totals.total_amount += payment.amount;
                }
                PaymentStatus::Rejected => totals.rejected_payments += 1,
            }
        }
        totals.total_amount = crate::utils::pricing::round_to(totals.total_amount, 2);
        totals
    }
}

// 支付申请列表
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "dashboard.ts")]
pub struct PaymentsOverview {
    pub payments: Vec<PaymentRow>,
    pub totals: PaymentTotals,
}

// 教练详情（编辑 / 删除确认）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "dashboard.ts")]
pub struct TrainerDetailView {
    pub trainer: AccountSummary,
    pub location: Location,
    pub assignments: Vec<AssignmentRow>,
    pub contact: Option<TrainerContact>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::learning::{PaymentMethod, PaymentStatus};

    fn payment(amount: f64, status: PaymentStatus) -> Payment {
        let now = chrono::Utc::now();
        Payment {
            id: 1,
            student_id: 1,
            course_id: 1,
            amount,
            payment_method: PaymentMethod::Card,
            transaction_id: None,
            status,
            notes: None,
            approved_by: None,
            approved_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_payment_totals_only_sum_approved() {
        let totals = PaymentTotals::from_payments(&[
            payment(80.0, PaymentStatus::Approved),
            payment(19.99, PaymentStatus::Approved),
            payment(50.0, PaymentStatus::Requested),
            payment(10.0, PaymentStatus::Rejected),
        ]);
        assert_eq!(totals.total_payments, 4);
        assert_eq!(totals.total_amount, 99.99);
        assert_eq!(totals.requested_payments, 1);
        assert_eq!(totals.approved_payments, 2);
        assert_eq!(totals.rejected_payments, 1);
    }

    #[test]
    fn test_payment_totals_empty() {
        assert_eq!(PaymentTotals::from_payments(&[]), PaymentTotals::default());
    }
}
