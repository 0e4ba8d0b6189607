//! 学习进度与评分统计
//!
//! 所有聚合都在读取时计算，不做缓存。

use crate::models::learning::progress::CourseProgressSummary;
use crate::utils::pricing::round_to;

/// 课程完成百分比，课程没有视频时为 0
pub fn progress_percentage(completed_videos: u64, total_videos: u64) -> f64 {
    if total_videos == 0 {
        return 0.0;
    }
    completed_videos as f64 / total_videos as f64 * 100.0
}

/// 每个视频的平均学习时长（秒），按课程视频总数平均
pub fn average_time_per_video(total_time_spent: i64, total_videos: u64) -> f64 {
    if total_videos == 0 {
        return 0.0;
    }
    total_time_spent as f64 / total_videos as f64
}

/// 格式化时长：`1h 2m 3s`、`2m 3s`、`3s`
pub fn format_duration(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds as u64
    } else {
        0
    };
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{hours}h {minutes}m {secs}s")
    } else if minutes > 0 {
        format!("{minutes}m {secs}s")
    } else {
        format!("{secs}s")
    }
}

/// 平均评分，保留一位小数；没有评分时为 `None`
pub fn average_rating<I>(ratings: I) -> Option<f64>
where
    I: IntoIterator<Item = i32>,
{
    let (sum, count) = ratings
        .into_iter()
        .fold((0i64, 0u64), |(sum, count), r| (sum + r as i64, count + 1));
    if count == 0 {
        None
    } else {
        Some(round_to(sum as f64 / count as f64, 1))
    }
}

/// 汇总某个学生在一门课程中的进度
///
/// `rows` 为该学生在该课程视频上的 `(completed, time_spent_seconds)`，
/// 没有记录的视频按零进度处理。
pub fn summarize_course_progress<I>(total_videos: u64, rows: I) -> CourseProgressSummary
where
    I: IntoIterator<Item = (bool, i64)>,
{
    let (completed_videos, total_time_spent) = rows
        .into_iter()
        .fold((0u64, 0i64), |(done, time), (completed, spent)| {
            (done + u64::from(completed), time + spent)
        });
    let completed_videos = completed_videos.min(total_videos);
    let average = average_time_per_video(total_time_spent, total_videos);

    CourseProgressSummary {
        total_videos,
        completed_videos,
        progress_percentage: progress_percentage(completed_videos, total_videos),
        total_time_spent,
        average_time_per_video: average,
        average_time_formatted: format_duration(average),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_percentage() {
        assert_eq!(progress_percentage(0, 0), 0.0);
        assert_eq!(progress_percentage(3, 4), 75.0);
        assert_eq!(progress_percentage(4, 4), 100.0);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0.0), "0s");
        assert_eq!(format_duration(59.9), "59s");
        assert_eq!(format_duration(123.0), "2m 3s");
        assert_eq!(format_duration(3723.0), "1h 2m 3s");
        assert_eq!(format_duration(3600.0), "1h 0m 0s");
        assert_eq!(format_duration(f64::NAN), "0s");
    }

    #[test]
    fn test_average_rating() {
        assert_eq!(average_rating(Vec::<i32>::new()), None);
        assert_eq!(average_rating(vec![5, 4]), Some(4.5));
        assert_eq!(average_rating(vec![5, 4, 4]), Some(4.3));
    }

    #[test]
    fn test_summarize_course_progress() {
        let summary = summarize_course_progress(4, vec![(true, 120), (false, 60), (true, 60)]);
        assert_eq!(summary.completed_videos, 2);
        assert_eq!(summary.progress_percentage, 50.0);
        assert_eq!(summary.total_time_spent, 240);
        assert_eq!(summary.average_time_per_video, 60.0);
        assert_eq!(summary.average_time_formatted, "1m 0s");

        let empty = summarize_course_progress(0, Vec::new());
        assert_eq!(empty.progress_percentage, 0.0);
        assert_eq!(empty.average_time_formatted, "0s");
    }

    #[test]
    fn test_three_video_course_progress() {
        let one_of_three =
            summarize_course_progress(3, vec![(true, 30), (false, 10), (false, 0)]);
        assert_eq!(one_of_three.completed_videos, 1);
        assert!((one_of_three.progress_percentage - 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(round_to(one_of_three.progress_percentage, 1), 33.3);

        let all_three = summarize_course_progress(3, vec![(true, 30), (true, 10), (true, 5)]);
        assert_eq!(all_three.completed_videos, 3);
        assert_eq!(all_three.progress_percentage, 100.0);
    }
}
