use super::{SeaOrmStorage, db_err};
use crate::entity::course_videos;
use crate::entity::video_progress::{ActiveModel, Column, Entity as VideoProgressEntity};
use crate::errors::Result;
use crate::models::learning::progress::{ProgressReport, VideoProgress};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QuerySelect, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 更新视频进度
    ///
    /// 百分比限制在 0..=100，完成标记按上报值写入，累计时长只增不减。
    pub async fn update_video_progress_impl(
        &self,
        student_id: i64,
        video_id: i64,
        report: ProgressReport,
    ) -> Result<VideoProgress> {
        let now = chrono::Utc::now().timestamp();
        let percentage = report.clamped_percentage();
        let time_spent = report.time_spent.max(0);

        let txn = self.db.begin().await.map_err(db_err("开启事务失败"))?;
        let existing = VideoProgressEntity::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::VideoId.eq(video_id))
            .one(&txn)
            .await
            .map_err(db_err("查询学习进度失败"))?;

        let saved = match existing {
            Some(model) => {
                let previous_time = model.time_spent_seconds;
                let mut model: ActiveModel = model.into();
                model.progress_percentage = Set(percentage);
                model.completed = Set(report.completed);
                model.time_spent_seconds = Set(previous_time.max(time_spent));
                model.last_watched = Set(now);
                model.update(&txn).await
            }
            None => {
                ActiveModel {
                    student_id: Set(student_id),
                    video_id: Set(video_id),
                    progress_percentage: Set(percentage),
                    completed: Set(report.completed),
                    time_spent_seconds: Set(time_spent),
                    last_watched: Set(now),
                    created_at: Set(now),
                    ..Default::default()
                }
                .insert(&txn)
                .await
            }
        }
        .map_err(db_err("保存学习进度失败"))?;

        txn.commit().await.map_err(db_err("提交事务失败"))?;
        Ok(saved.into_progress())
    }

    async fn course_video_ids(&self, course_id: i64) -> Result<Vec<i64>> {
        course_videos::Entity::find()
            .select_only()
            .column(course_videos::Column::Id)
            .filter(course_videos::Column::CourseId.eq(course_id))
            .into_tuple::<i64>()
            .all(&self.db)
            .await
            .map_err(db_err("查询课程视频失败"))
    }

    pub async fn list_student_progress_for_course_impl(
        &self,
        student_id: i64,
        course_id: i64,
    ) -> Result<Vec<VideoProgress>> {
        let video_ids = self.course_video_ids(course_id).await?;
        if video_ids.is_empty() {
            return Ok(Vec::new());
        }
        let result = VideoProgressEntity::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::VideoId.is_in(video_ids))
            .all(&self.db)
            .await
            .map_err(db_err("查询学习进度失败"))?;
        Ok(result.into_iter().map(|m| m.into_progress()).collect())
    }

    pub async fn list_progress_for_course_impl(&self, course_id: i64) -> Result<Vec<VideoProgress>> {
        let video_ids = self.course_video_ids(course_id).await?;
        if video_ids.is_empty() {
            return Ok(Vec::new());
        }
        let result = VideoProgressEntity::find()
            .filter(Column::VideoId.is_in(video_ids))
            .all(&self.db)
            .await
            .map_err(db_err("查询课程学习进度失败"))?;
        Ok(result.into_iter().map(|m| m.into_progress()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::super::courses::tests::{course_input, create_member};
    use super::*;
    use crate::models::accounts::entities::Role;
    use crate::models::catalog::requests::VideoInput;
    use crate::storage::Storage;

    #[tokio::test]
    async fn test_progress_clamps_and_keeps_max_time() {
        let storage = SeaOrmStorage::in_memory().await.expect("storage");
        let trainer = create_member(&storage, "trainer1", Role::Trainer).await;
        let student = create_member(&storage, "student1", Role::Student).await;
        let course = storage
            .create_course(course_input("Progress", trainer))
            .await
            .expect("course");
        let video = storage
            .create_video(
                course.id,
                VideoInput {
                    title: "Lesson".into(),
                    video: None,
                    order: 1,
                },
            )
            .await
            .expect("video");

        let first = storage
            .update_video_progress(
                student,
                video.id,
                ProgressReport {
                    percentage: 150,
                    completed: true,
                    time_spent: 300,
                },
            )
            .await
            .expect("first");
        assert_eq!(first.progress_percentage, 100);
        assert!(first.completed);
        assert_eq!(first.time_spent_seconds, 300);

        let second = storage
            .update_video_progress(
                student,
                video.id,
                ProgressReport {
                    percentage: -5,
                    completed: false,
                    time_spent: 120,
                },
            )
            .await
            .expect("second");
        assert_eq!(second.id, first.id);
        assert_eq!(second.progress_percentage, 0);
        assert!(!second.completed);
        assert_eq!(second.time_spent_seconds, 300);

        let rows = storage
            .list_progress_for_course(course.id)
            .await
            .expect("rows");
        assert_eq!(rows.len(), 1);
    }
}
