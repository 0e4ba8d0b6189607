use serde::Serialize;
use ts_rs::TS;

use crate::models::accounts::AccountSummary;
use crate::models::catalog::{Course, TrainerContact};
use crate::models::learning::CourseProgressSummary;

// 教练首页
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "dashboard.ts")]
pub struct TrainerDashboard {
    pub trainer: AccountSummary,
    pub courses: Vec<Course>,
    pub num_courses: u64,
    /// 所有分配课程中去重后的学生数
    pub total_students: u64,
    pub average_rating: Option<f64>,
    pub rating_count: u64,
    pub contact: Option<TrainerContact>,
}

// 课程学生进度中的一行
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "dashboard.ts")]
pub struct StudentProgressRow {
    pub student: AccountSummary,
    pub enrolled_at: chrono::DateTime<chrono::Utc>,
    pub progress: CourseProgressSummary,
}

// 教练查看课程学生进度
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "dashboard.ts")]
pub struct CourseStudentsView {
    pub course: Course,
    pub students: Vec<StudentProgressRow>,
}

// 教练联系方式编辑页
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "dashboard.ts")]
pub struct OwnContactView {
    pub contact: Option<TrainerContact>,
}
