use serde::Serialize;
use ts_rs::TS;

use super::entities::{Course, CourseVideo, TrainerContact};
use crate::models::PaginatedResponse;
use crate::models::accounts::AccountSummary;

// 列表中使用的课程摘要
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "catalog.ts")]
pub struct CourseSummary {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub category: String,
    pub price: f64,
}

impl From<&Course> for CourseSummary {
    fn from(course: &Course) -> Self {
        Self {
            id: course.id,
            title: course.title.clone(),
            slug: course.slug.clone(),
            category: course.category.clone(),
            price: course.price,
        }
    }
}

// 首页
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "catalog.ts")]
pub struct HomeView {
    pub system_name: String,
    pub courses: Vec<Course>,
}

// 静态页（关于 / 联系我们）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "catalog.ts")]
pub struct StaticPageView {
    pub page: String,
    pub system_name: String,
}

pub type CourseListResponse = PaginatedResponse<Course>;

// 分类页
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "catalog.ts")]
pub struct CategoryView {
    pub category: String,
    pub courses: Vec<Course>,
}

// 课程详情页
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "catalog.ts")]
pub struct CourseDetailView {
    pub course: Course,
    pub instructor: AccountSummary,
    pub related_courses: Vec<Course>,
    pub enrolled: bool,
}

// 课程表单页（新建 / 编辑）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "catalog.ts")]
pub struct CourseFormView {
    pub course: Option<Course>,
    pub instructors: Vec<AccountSummary>,
}

// 课程删除确认页
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "catalog.ts")]
pub struct CourseDeleteView {
    pub course: Course,
    pub video_count: u64,
    pub student_count: u64,
}

// 课程视频管理页
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "catalog.ts")]
pub struct CourseVideosView {
    pub course: Course,
    pub videos: Vec<CourseVideo>,
}

// 单个视频（编辑 / 删除确认）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "catalog.ts")]
pub struct VideoView {
    pub video: CourseVideo,
    pub course: CourseSummary,
}

// 分配记录
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "catalog.ts")]
pub struct AssignmentRow {
    pub id: i64,
    pub trainer: AccountSummary,
    pub course: CourseSummary,
    pub assigned_by: Option<AccountSummary>,
    pub assigned_at: chrono::DateTime<chrono::Utc>,
}

// 分配教练页
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "catalog.ts")]
pub struct AssignTrainerView {
    pub trainers: Vec<AccountSummary>,
    pub courses: Vec<CourseSummary>,
    pub assignments: Vec<AssignmentRow>,
}

// 单个教练的分配管理页
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "catalog.ts")]
pub struct TrainerAssignmentsView {
    pub trainer: AccountSummary,
    pub assignments: Vec<AssignmentRow>,
    pub all_courses: Vec<CourseSummary>,
}

// 联系方式编辑 / 删除确认页
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "catalog.ts")]
pub struct ContactView {
    pub trainer: AccountSummary,
    pub contact: Option<TrainerContact>,
}

// 教练上传视频页
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "catalog.ts")]
pub struct UploadVideoView {
    pub course: Course,
    pub videos: Vec<CourseVideo>,
}
