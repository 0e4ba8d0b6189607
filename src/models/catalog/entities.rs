use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 课程
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "catalog.ts")]
pub struct Course {
    pub id: i64,
    pub title: String,
    /// 由标题生成，标题修改后随之变化
    pub slug: String,
    pub description: String,
    pub category: String,
    pub level: String,
    pub duration: String,
    pub requirements: String,
    pub content: String,
    /// 原价
    pub list_price: f64,
    /// 折扣百分比
    pub discount: f64,
    /// 折后价（写入时由原价和折扣计算）
    pub price: f64,
    pub thumbnail: Option<String>,
    pub featured_video: Option<String>,
    pub instructor_id: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 课程视频
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "catalog.ts")]
pub struct CourseVideo {
    pub id: i64,
    pub course_id: i64,
    pub title: String,
    pub video: Option<String>,
    pub order: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 教练-课程分配
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "catalog.ts")]
pub struct TrainerAssignment {
    pub id: i64,
    pub trainer_id: i64,
    pub course_id: i64,
    pub assigned_by: Option<i64>,
    pub assigned_at: chrono::DateTime<chrono::Utc>,
}

// 教练联系方式
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "catalog.ts")]
pub struct TrainerContact {
    pub id: i64,
    pub trainer_id: i64,
    pub whatsapp: Option<String>,
    pub microsoft_teams: Option<String>,
    pub skype: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
