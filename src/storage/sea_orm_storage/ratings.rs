use super::{SeaOrmStorage, db_err};
use crate::entity::{course_videos, feedbacks, trainer_ratings, video_ratings};
use crate::errors::Result;
use crate::models::learning::ratings::{Feedback, RatingInput, TrainerRating, VideoRating};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set};

fn optional_comment(comment: String) -> Option<String> {
    if comment.is_empty() { None } else { Some(comment) }
}

impl SeaOrmStorage {
    /// 学生对教练的评分，每对只保留一条
    pub async fn upsert_trainer_rating_impl(
        &self,
        trainer_id: i64,
        student_id: i64,
        input: RatingInput,
    ) -> Result<TrainerRating> {
        use trainer_ratings::{ActiveModel, Column, Entity};

        let now = chrono::Utc::now().timestamp();
        let existing = Entity::find()
            .filter(Column::TrainerId.eq(trainer_id))
            .filter(Column::StudentId.eq(student_id))
            .one(&self.db)
            .await
            .map_err(db_err("查询教练评分失败"))?;

        let saved = match existing {
            Some(model) => {
                let mut model: ActiveModel = model.into();
                model.rating = Set(input.rating);
                model.comment = Set(optional_comment(input.comment));
                model.updated_at = Set(now);
                model.update(&self.db).await
            }
            None => {
                ActiveModel {
                    trainer_id: Set(trainer_id),
                    student_id: Set(student_id),
                    rating: Set(input.rating),
                    comment: Set(optional_comment(input.comment)),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(&self.db)
                .await
            }
        }
        .map_err(db_err("保存教练评分失败"))?;

        Ok(saved.into_rating())
    }

    pub async fn get_trainer_rating_impl(
        &self,
        trainer_id: i64,
        student_id: i64,
    ) -> Result<Option<TrainerRating>> {
        use trainer_ratings::{Column, Entity};

        let result = Entity::find()
            .filter(Column::TrainerId.eq(trainer_id))
            .filter(Column::StudentId.eq(student_id))
            .one(&self.db)
            .await
            .map_err(db_err("查询教练评分失败"))?;
        Ok(result.map(|m| m.into_rating()))
    }

    pub async fn list_trainer_ratings_impl(&self, trainer_id: i64) -> Result<Vec<TrainerRating>> {
        use trainer_ratings::{Column, Entity};

        let result = Entity::find()
            .filter(Column::TrainerId.eq(trainer_id))
            .order_by_desc(Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err("查询教练评分失败"))?;
        Ok(result.into_iter().map(|m| m.into_rating()).collect())
    }

    pub async fn list_latest_trainer_ratings_impl(&self, limit: u64) -> Result<Vec<TrainerRating>> {
        use trainer_ratings::{Column, Entity};

        let result = Entity::find()
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(db_err("查询教练评分失败"))?;
        Ok(result.into_iter().map(|m| m.into_rating()).collect())
    }

    /// 学生对视频的评分，每对只保留一条
    pub async fn upsert_video_rating_impl(
        &self,
        video_id: i64,
        student_id: i64,
        input: RatingInput,
    ) -> Result<VideoRating> {
        use video_ratings::{ActiveModel, Column, Entity};

        let now = chrono::Utc::now().timestamp();
        let existing = Entity::find()
            .filter(Column::VideoId.eq(video_id))
            .filter(Column::StudentId.eq(student_id))
            .one(&self.db)
            .await
            .map_err(db_err("查询视频评分失败"))?;

        let saved = match existing {
            Some(model) => {
                let mut model: ActiveModel = model.into();
                model.rating = Set(input.rating);
                model.comment = Set(optional_comment(input.comment));
                model.updated_at = Set(now);
                model.update(&self.db).await
            }
            None => {
                ActiveModel {
                    video_id: Set(video_id),
                    student_id: Set(student_id),
                    rating: Set(input.rating),
                    comment: Set(optional_comment(input.comment)),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(&self.db)
                .await
            }
        }
        .map_err(db_err("保存视频评分失败"))?;

        Ok(saved.into_rating())
    }

    pub async fn get_video_rating_impl(
        &self,
        video_id: i64,
        student_id: i64,
    ) -> Result<Option<VideoRating>> {
        use video_ratings::{Column, Entity};

        let result = Entity::find()
            .filter(Column::VideoId.eq(video_id))
            .filter(Column::StudentId.eq(student_id))
            .one(&self.db)
            .await
            .map_err(db_err("查询视频评分失败"))?;
        Ok(result.map(|m| m.into_rating()))
    }

    pub async fn list_student_video_ratings_for_course_impl(
        &self,
        student_id: i64,
        course_id: i64,
    ) -> Result<Vec<VideoRating>> {
        use video_ratings::{Column, Entity};

        let video_ids: Vec<i64> = course_videos::Entity::find()
            .select_only()
            .column(course_videos::Column::Id)
            .filter(course_videos::Column::CourseId.eq(course_id))
            .into_tuple::<i64>()
            .all(&self.db)
            .await
            .map_err(db_err("查询课程视频失败"))?;
        if video_ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = Entity::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::VideoId.is_in(video_ids))
            .all(&self.db)
            .await
            .map_err(db_err("查询视频评分失败"))?;
        Ok(result.into_iter().map(|m| m.into_rating()).collect())
    }

    pub async fn list_latest_video_ratings_impl(&self, limit: u64) -> Result<Vec<VideoRating>> {
        use video_ratings::{Column, Entity};

        let result = Entity::find()
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(db_err("查询视频评分失败"))?;
        Ok(result.into_iter().map(|m| m.into_rating()).collect())
    }

    /// 课程反馈，每个学生每门课程一条
    pub async fn upsert_feedback_impl(
        &self,
        student_id: i64,
        course_id: i64,
        input: RatingInput,
    ) -> Result<Feedback> {
        use feedbacks::{ActiveModel, Column, Entity};

        let now = chrono::Utc::now().timestamp();
        let existing = Entity::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::CourseId.eq(course_id))
            .one(&self.db)
            .await
            .map_err(db_err("查询课程反馈失败"))?;

        let saved = match existing {
            Some(model) => {
                let mut model: ActiveModel = model.into();
                model.rating = Set(input.rating);
                model.comment = Set(input.comment);
                model.updated_at = Set(now);
                model.update(&self.db).await
            }
            None => {
                ActiveModel {
                    student_id: Set(student_id),
                    course_id: Set(course_id),
                    rating: Set(input.rating),
                    comment: Set(input.comment),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(&self.db)
                .await
            }
        }
        .map_err(db_err("保存课程反馈失败"))?;

        Ok(saved.into_feedback())
    }

    pub async fn get_feedback_impl(
        &self,
        student_id: i64,
        course_id: i64,
    ) -> Result<Option<Feedback>> {
        use feedbacks::{Column, Entity};

        let result = Entity::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::CourseId.eq(course_id))
            .one(&self.db)
            .await
            .map_err(db_err("查询课程反馈失败"))?;
        Ok(result.map(|m| m.into_feedback()))
    }

    pub async fn list_course_feedback_impl(&self, course_id: i64) -> Result<Vec<Feedback>> {
        use feedbacks::{Column, Entity};

        let result = Entity::find()
            .filter(Column::CourseId.eq(course_id))
            .order_by_desc(Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err("查询课程反馈失败"))?;
        Ok(result.into_iter().map(|m| m.into_feedback()).collect())
    }

    pub async fn list_feedback_impl(&self, limit: Option<u64>) -> Result<Vec<Feedback>> {
        use feedbacks::{Column, Entity};

        let mut select = Entity::find()
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id);
        if let Some(limit) = limit {
            select = select.limit(limit);
        }
        let result = select
            .all(&self.db)
            .await
            .map_err(db_err("查询课程反馈失败"))?;
        Ok(result.into_iter().map(|m| m.into_feedback()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::super::courses::tests::{course_input, create_member};
    use super::*;
    use crate::models::accounts::entities::Role;
    use crate::storage::Storage;

    fn rating(value: i32, comment: &str) -> RatingInput {
        RatingInput {
            rating: value,
            comment: comment.to_string(),
        }
    }

    #[tokio::test]
    async fn test_trainer_rating_upsert_keeps_single_row() {
        let storage = SeaOrmStorage::in_memory().await.expect("storage");
        let trainer = create_member(&storage, "trainer1", Role::Trainer).await;
        let student = create_member(&storage, "student1", Role::Student).await;

        let first = storage
            .upsert_trainer_rating(trainer, student, rating(3, ""))
            .await
            .expect("first");
        assert!(first.comment.is_none());
        let second = storage
            .upsert_trainer_rating(trainer, student, rating(5, "Great"))
            .await
            .expect("second");
        assert_eq!(first.id, second.id);
        assert_eq!(second.rating, 5);

        let all = storage.list_trainer_ratings(trainer).await.expect("list");
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].comment.as_deref(), Some("Great"));
    }

    #[tokio::test]
    async fn test_feedback_upsert_and_listing() {
        let storage = SeaOrmStorage::in_memory().await.expect("storage");
        let trainer = create_member(&storage, "trainer1", Role::Trainer).await;
        let student = create_member(&storage, "student1", Role::Student).await;
        let course = storage
            .create_course(course_input("Feedback", trainer))
            .await
            .expect("course");

        storage
            .upsert_feedback(student, course.id, rating(4, "Good"))
            .await
            .expect("feedback");
        storage
            .upsert_feedback(student, course.id, rating(2, "Changed my mind"))
            .await
            .expect("update feedback");

        let feedback = storage
            .get_feedback(student, course.id)
            .await
            .expect("get")
            .expect("exists");
        assert_eq!(feedback.rating, 2);
        assert_eq!(storage.list_course_feedback(course.id).await.expect("list").len(), 1);
        assert_eq!(storage.list_feedback(Some(5)).await.expect("latest").len(), 1);
    }
}
