//! 课程实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "courses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    #[sea_orm(unique)]
    pub slug: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub category: String,
    pub level: String,
    pub duration: String,
    #[sea_orm(column_type = "Text")]
    pub requirements: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    #[sea_orm(column_type = "Double")]
    pub list_price: f64,
    #[sea_orm(column_type = "Double")]
    pub discount: f64,
    #[sea_orm(column_type = "Double")]
    pub price: f64,
    pub thumbnail: Option<String>,
    pub featured_video: Option<String>,
    pub instructor_id: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::InstructorId",
        to = "super::accounts::Column::Id"
    )]
    Instructor,
    #[sea_orm(has_many = "super::course_videos::Entity")]
    Videos,
    #[sea_orm(has_many = "super::enrollments::Entity")]
    Enrollments,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Instructor.def()
    }
}

impl Related<super::course_videos::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Videos.def()
    }
}

impl Related<super::enrollments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_course(self) -> crate::models::catalog::entities::Course {
        use super::to_datetime;
        use crate::models::catalog::entities::Course;

        Course {
            id: self.id,
            title: self.title,
            slug: self.slug,
            description: self.description,
            category: self.category,
            level: self.level,
            duration: self.duration,
            requirements: self.requirements,
            content: self.content,
            list_price: self.list_price,
            discount: self.discount,
            price: self.price,
            thumbnail: self.thumbnail,
            featured_video: self.featured_video,
            instructor_id: self.instructor_id,
            created_at: to_datetime(self.created_at),
            updated_at: to_datetime(self.updated_at),
        }
    }
}
