use super::{SeaOrmStorage, db_err};
use crate::entity::course_videos::{ActiveModel, Column, Entity as CourseVideos};
use crate::entity::{video_progress, video_ratings};
use crate::errors::Result;
use crate::models::catalog::{entities::CourseVideo, requests::VideoInput};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

impl SeaOrmStorage {
    pub async fn create_video_impl(&self, course_id: i64, input: VideoInput) -> Result<CourseVideo> {
        let now = chrono::Utc::now().timestamp();
        let model = ActiveModel {
            course_id: Set(course_id),
            title: Set(input.title),
            video: Set(input.video),
            sort_order: Set(input.order),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(db_err("创建课程视频失败"))?;
        Ok(result.into_video())
    }

    pub async fn update_video_impl(
        &self,
        video_id: i64,
        input: VideoInput,
    ) -> Result<Option<CourseVideo>> {
        let Some(existing) = CourseVideos::find_by_id(video_id)
            .one(&self.db)
            .await
            .map_err(db_err("查询课程视频失败"))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        model.title = Set(input.title);
        model.video = Set(input.video);
        model.sort_order = Set(input.order);
        model.updated_at = Set(chrono::Utc::now().timestamp());

        let updated = model
            .update(&self.db)
            .await
            .map_err(db_err("更新课程视频失败"))?;
        Ok(Some(updated.into_video()))
    }

    /// 删除视频及其学习进度和评分
    pub async fn delete_video_cascade_impl(&self, video_id: i64) -> Result<bool> {
        let txn = self.db.begin().await.map_err(db_err("开启事务失败"))?;

        video_progress::Entity::delete_many()
            .filter(video_progress::Column::VideoId.eq(video_id))
            .exec(&txn)
            .await
            .map_err(db_err("删除学习进度失败"))?;
        video_ratings::Entity::delete_many()
            .filter(video_ratings::Column::VideoId.eq(video_id))
            .exec(&txn)
            .await
            .map_err(db_err("删除视频评分失败"))?;
        let result = CourseVideos::delete_by_id(video_id)
            .exec(&txn)
            .await
            .map_err(db_err("删除课程视频失败"))?;

        txn.commit().await.map_err(db_err("提交事务失败"))?;
        Ok(result.rows_affected > 0)
    }

    pub async fn get_video_impl(&self, video_id: i64) -> Result<Option<CourseVideo>> {
        let result = CourseVideos::find_by_id(video_id)
            .one(&self.db)
            .await
            .map_err(db_err("查询课程视频失败"))?;
        Ok(result.map(|m| m.into_video()))
    }

    pub async fn list_videos_by_ids_impl(&self, ids: &[i64]) -> Result<Vec<CourseVideo>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let result = CourseVideos::find()
            .filter(Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(db_err("批量查询课程视频失败"))?;
        Ok(result.into_iter().map(|m| m.into_video()).collect())
    }

    /// 按顺序号、创建时间列出课程视频
    pub async fn list_course_videos_impl(&self, course_id: i64) -> Result<Vec<CourseVideo>> {
        let result = CourseVideos::find()
            .filter(Column::CourseId.eq(course_id))
            .order_by_asc(Column::SortOrder)
            .order_by_asc(Column::CreatedAt)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err("查询课程视频失败"))?;
        Ok(result.into_iter().map(|m| m.into_video()).collect())
    }

    pub async fn count_course_videos_impl(&self, course_id: i64) -> Result<u64> {
        CourseVideos::find()
            .filter(Column::CourseId.eq(course_id))
            .count(&self.db)
            .await
            .map_err(db_err("统计课程视频失败"))
    }
}

#[cfg(test)]
mod tests {
    use super::super::courses::tests::{course_input, create_member};
    use super::*;
    use crate::models::accounts::entities::Role;
    use crate::models::learning::progress::ProgressReport;
    use crate::storage::Storage;

    fn video(title: &str, order: i32) -> VideoInput {
        VideoInput {
            title: title.to_string(),
            video: Some(format!("videos/{title}.mp4")),
            order,
        }
    }

    #[tokio::test]
    async fn test_videos_are_ordered() {
        let storage = SeaOrmStorage::in_memory().await.expect("storage");
        let trainer = create_member(&storage, "trainer1", Role::Trainer).await;
        let course = storage
            .create_course(course_input("Ordered", trainer))
            .await
            .expect("course");

        storage.create_video(course.id, video("third", 3)).await.expect("v3");
        storage.create_video(course.id, video("first", 1)).await.expect("v1");
        storage.create_video(course.id, video("second", 2)).await.expect("v2");

        let titles: Vec<String> = storage
            .list_course_videos(course.id)
            .await
            .expect("list")
            .into_iter()
            .map(|v| v.title)
            .collect();
        assert_eq!(titles, vec!["first", "second", "third"]);
        assert_eq!(storage.count_course_videos(course.id).await.expect("count"), 3);
    }

    #[tokio::test]
    async fn test_delete_video_cascades_progress() {
        let storage = SeaOrmStorage::in_memory().await.expect("storage");
        let trainer = create_member(&storage, "trainer1", Role::Trainer).await;
        let student = create_member(&storage, "student1", Role::Student).await;
        let course = storage
            .create_course(course_input("Cascade", trainer))
            .await
            .expect("course");
        let lesson = storage
            .create_video(course.id, video("lesson", 1))
            .await
            .expect("video");

        storage
            .update_video_progress(
                student,
                lesson.id,
                ProgressReport {
                    percentage: 40,
                    completed: false,
                    time_spent: 30,
                },
            )
            .await
            .expect("progress");

        assert!(storage.delete_video_cascade(lesson.id).await.expect("delete"));
        assert!(storage.get_video(lesson.id).await.expect("get").is_none());
        assert!(
            storage
                .list_student_progress_for_course(student, course.id)
                .await
                .expect("progress")
                .is_empty()
        );
        assert!(!storage.delete_video_cascade(lesson.id).await.expect("again"));
    }
}
