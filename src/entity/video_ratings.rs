use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "video_ratings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub video_id: i64,
    pub student_id: i64,
    pub rating: i32,
    #[sea_orm(column_type = "Text", nullable)]
    pub comment: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
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
    pub fn into_rating(self) -> crate::models::learning::ratings::VideoRating {
        use super::to_datetime;

        crate::models::learning::ratings::VideoRating {
            id: self.id,
            video_id: self.video_id,
            student_id: self.student_id,
            rating: self.rating,
            comment: self.comment,
            created_at: to_datetime(self.created_at),
            updated_at: to_datetime(self.updated_at),
        }
    }
}
