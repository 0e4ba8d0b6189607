use serde::Serialize;
use ts_rs::TS;

use crate::models::accounts::AccountSummary;
use crate::models::catalog::{Course, CourseSummary, CourseVideo, TrainerContact};
use crate::models::learning::{
    CourseProgressSummary, Feedback, Payment, PaymentMethod, TrainerRating, VideoRating,
};

// 学生首页中的一门已选课程
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "dashboard.ts")]
pub struct EnrolledCourse {
    pub course: Course,
    pub enrolled_at: chrono::DateTime<chrono::Utc>,
    pub progress: CourseProgressSummary,
}

// 学生的支付申请
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "dashboard.ts")]
pub struct PaymentWithCourse {
    pub payment: Payment,
    pub course: Option<CourseSummary>,
}

// 学生首页
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "dashboard.ts")]
pub struct StudentDashboard {
    pub student: AccountSummary,
    pub courses: Vec<EnrolledCourse>,
    pub payments: Vec<PaymentWithCourse>,
}

// 课程内单个视频及学生进度，未观看时为 0
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "dashboard.ts")]
pub struct VideoWithProgress {
    pub video: CourseVideo,
    pub progress_percentage: i32,
    pub completed: bool,
    pub time_spent_seconds: i64,
    pub my_rating: Option<i32>,
}

// 学生课程详情
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "dashboard.ts")]
pub struct StudentCourseView {
    pub course: Course,
    pub videos: Vec<VideoWithProgress>,
    pub summary: CourseProgressSummary,
    pub trainers: Vec<AccountSummary>,
    pub feedback: Option<Feedback>,
}

// 支付申请页
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "dashboard.ts")]
pub struct PaymentPageView {
    pub course: Course,
    pub methods: Vec<PaymentMethod>,
}

// 评价教练页
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "dashboard.ts")]
pub struct RateTrainerView {
    pub trainer: AccountSummary,
    pub existing_rating: Option<TrainerRating>,
}

// 评价视频页
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "dashboard.ts")]
pub struct RateVideoView {
    pub video: CourseVideo,
    pub existing_rating: Option<VideoRating>,
}

// 教练联系方式页
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "dashboard.ts")]
pub struct TrainerContactPage {
    pub trainer: AccountSummary,
    pub contact: Option<TrainerContact>,
    /// 没有评分时为 None
    pub average_rating: Option<f64>,
    pub rating_count: u64,
}

// 课程反馈页
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "dashboard.ts")]
pub struct FeedbackPageView {
    pub course: Course,
    pub existing_feedback: Option<Feedback>,
}
