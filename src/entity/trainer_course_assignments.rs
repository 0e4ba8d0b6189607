//! 教练-课程分配实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "trainer_course_assignments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub trainer_id: i64,
    pub course_id: i64,
    pub assigned_by: Option<i64>,
    pub assigned_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::courses::Entity",
        from = "Column::CourseId",
        to = "super::courses::Column::Id"
    )]
    Course,
}

impl Related<super::courses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_assignment(self) -> crate::models::catalog::entities::TrainerAssignment {
        crate::models::catalog::entities::TrainerAssignment {
            id: self.id,
            trainer_id: self.trainer_id,
            course_id: self.course_id,
            assigned_by: self.assigned_by,
            assigned_at: super::to_datetime(self.assigned_at),
        }
    }
}
