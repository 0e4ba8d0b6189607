use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "trainer_contacts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub trainer_id: i64,
    pub whatsapp: Option<String>,
    pub microsoft_teams: Option<String>,
    pub skype: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_contact(self) -> crate::models::catalog::entities::TrainerContact {
        crate::models::catalog::entities::TrainerContact {
            id: self.id,
            trainer_id: self.trainer_id,
            whatsapp: self.whatsapp,
            microsoft_teams: self.microsoft_teams,
            skype: self.skype,
            email: self.email,
            phone: self.phone,
            updated_at: super::to_datetime(self.updated_at),
        }
    }
}
