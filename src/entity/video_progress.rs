//! 视频学习进度实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "video_progress")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub video_id: i64,
    pub progress_percentage: i32,
    pub completed: bool,
    pub time_spent_seconds: i64,
    pub last_watched: i64,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::course_videos::Entity",
        from = "Column::VideoId",
        to = "super::course_videos::Column::Id"
    )]
    Video,
}

impl Related<super::course_videos::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Video.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_progress(self) -> crate::models::learning::progress::VideoProgress {
        use super::to_datetime;

        crate::models::learning::progress::VideoProgress {
            id: self.id,
            student_id: self.student_id,
            video_id: self.video_id,
            progress_percentage: self.progress_percentage,
            completed: self.completed,
            time_spent_seconds: self.time_spent_seconds,
            last_watched: to_datetime(self.last_watched),
            created_at: to_datetime(self.created_at),
        }
    }
}
