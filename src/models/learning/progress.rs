use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::errors::{LmsError, Result};

// 学生在单个视频上的观看进度
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "learning.ts")]
pub struct VideoProgress {
    pub id: i64,
    pub student_id: i64,
    pub video_id: i64,
    pub progress_percentage: i32,
    pub completed: bool,
    pub time_spent_seconds: i64,
    pub last_watched: chrono::DateTime<chrono::Utc>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// 播放器上报的原始表单，字段都是字符串
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProgressForm {
    pub progress: Option<String>,
    pub completed: Option<String>,
    pub time_spent: Option<String>,
}

/// 解析后的进度上报
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressReport {
    pub percentage: i64,
    pub completed: bool,
    pub time_spent: i64,
}

impl ProgressForm {
    pub fn parse(&self) -> Result<ProgressReport> {
        fn number(field: &str, value: Option<&String>) -> Result<i64> {
            match value.map(|v| v.trim()).filter(|v| !v.is_empty()) {
                None => Ok(0),
                Some(v) => v
                    .parse::<i64>()
                    .map_err(|_| LmsError::validation(format!("Invalid {field}: {v}"))),
            }
        }

        Ok(ProgressReport {
            percentage: number("progress", self.progress.as_ref())?,
            completed: self.completed.as_deref() == Some("true"),
            time_spent: number("time_spent", self.time_spent.as_ref())?,
        })
    }
}

impl ProgressReport {
    /// 百分比限制在 0..=100
    pub fn clamped_percentage(&self) -> i32 {
        self.percentage.clamp(0, 100) as i32
    }
}

// 进度上报响应
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "learning.ts")]
pub struct ProgressUpdateResponse {
    pub success: bool,
    pub progress: i32,
    pub completed: bool,
    pub time_spent: i64,
}

impl From<&VideoProgress> for ProgressUpdateResponse {
    fn from(progress: &VideoProgress) -> Self {
        Self {
            success: true,
            progress: progress.progress_percentage,
            completed: progress.completed,
            time_spent: progress.time_spent_seconds,
        }
    }
}

// 单门课程的进度汇总
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "learning.ts")]
pub struct CourseProgressSummary {
    pub total_videos: u64,
    pub completed_videos: u64,
    pub progress_percentage: f64,
    pub total_time_spent: i64,
    pub average_time_per_video: f64,
    pub average_time_formatted: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_progress_form() {
        let form = ProgressForm {
            progress: Some("150".into()),
            completed: Some("true".into()),
            time_spent: Some("42".into()),
        };
        let report = form.parse().expect("valid form");
        assert_eq!(report.clamped_percentage(), 100);
        assert!(report.completed);
        assert_eq!(report.time_spent, 42);
    }

    #[test]
    fn test_missing_fields_default_to_zero() {
        let report = ProgressForm::default().parse().expect("empty form");
        assert_eq!(
            report,
            ProgressReport {
                percentage: 0,
                completed: false,
                time_spent: 0
            }
        );
        assert_eq!(
            ProgressReport {
                percentage: -7,
                completed: false,
                time_spent: 0
            }
            .clamped_percentage(),
            0
        );
    }

    #[test]
    fn test_completed_requires_literal_true() {
        let form = ProgressForm {
            completed: Some("True".into()),
            ..Default::default()
        };
        assert!(!form.parse().expect("valid").completed);
    }

    #[test]
    fn test_invalid_number_is_validation_error() {
        let form = ProgressForm {
            progress: Some("abc".into()),
            ..Default::default()
        };
        assert_eq!(form.parse().unwrap_err().code(), "E007");
    }
}
