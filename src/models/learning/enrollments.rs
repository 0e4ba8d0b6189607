use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 选课记录，学生是否属于某课程的唯一依据
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "learning.ts")]
pub struct Enrollment {
    pub id: i64,
    pub student_id: i64,
    pub course_id: i64,
    pub enrolled_at: chrono::DateTime<chrono::Utc>,
}
