use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::errors::{LmsError, Result};

// 学生对教练的评分（每对唯一）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "learning.ts")]
pub struct TrainerRating {
    pub id: i64,
    pub trainer_id: i64,
    pub student_id: i64,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 学生对视频的评分（每对唯一）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "learning.ts")]
pub struct VideoRating {
    pub id: i64,
    pub video_id: i64,
    pub student_id: i64,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 课程反馈（每个学生每门课一条）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "learning.ts")]
pub struct Feedback {
    pub id: i64,
    pub student_id: i64,
    pub course_id: i64,
    pub rating: i32,
    pub comment: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 评分 / 反馈表单
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "learning.ts")]
pub struct RatingForm {
    pub rating: i32,
    #[serde(default)]
    pub comment: String,
}

/// 校验后的评分
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatingInput {
    pub rating: i32,
    pub comment: String,
}

impl RatingForm {
    pub fn validate(self) -> Result<RatingInput> {
        if !(1..=5).contains(&self.rating) {
            return Err(LmsError::validation("Rating must be between 1 and 5."));
        }
        Ok(RatingInput {
            rating: self.rating,
            comment: self.comment.trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_range() {
        for rating in 1..=5 {
            assert!(
                RatingForm {
                    rating,
                    comment: String::new()
                }
                .validate()
                .is_ok()
            );
        }
        for rating in [0, 6, -1] {
            assert!(
                RatingForm {
                    rating,
                    comment: String::new()
                }
                .validate()
                .is_err()
            );
        }
    }

    #[test]
    fn test_comment_trimmed() {
        let input = RatingForm {
            rating: 4,
            comment: "  great  ".into(),
        }
        .validate()
        .expect("valid rating");
        assert_eq!(input.comment, "great");
    }
}
