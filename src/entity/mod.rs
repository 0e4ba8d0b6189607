//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体进行 CRUD 操作，然后转换为 models 中的业务实体。

use chrono::{DateTime, Utc};

pub mod prelude;

pub mod accounts;
pub mod countries;
pub mod course_videos;
pub mod courses;
pub mod districts;
pub mod enrollments;
pub mod feedbacks;
pub mod payments;
pub mod profiles;
pub mod states;
pub mod trainer_contacts;
pub mod trainer_course_assignments;
pub mod trainer_ratings;
pub mod video_progress;
pub mod video_ratings;

/// 数据库中的时间戳统一存储为 Unix 秒
pub(crate) fn to_datetime(ts: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()
}
