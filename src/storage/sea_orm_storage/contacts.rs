use super::{SeaOrmStorage, db_err};
use crate::entity::trainer_contacts::{ActiveModel, Column, Entity as TrainerContacts};
use crate::errors::Result;
use crate::models::catalog::{entities::TrainerContact, requests::ContactForm};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};

impl SeaOrmStorage {
    pub async fn get_trainer_contact_impl(&self, trainer_id: i64) -> Result<Option<TrainerContact>> {
        let result = TrainerContacts::find()
            .filter(Column::TrainerId.eq(trainer_id))
            .one(&self.db)
            .await
            .map_err(db_err("查询教练联系方式失败"))?;
        Ok(result.map(|m| m.into_contact()))
    }

    /// 写入联系方式，空白字段存为 NULL
    pub async fn upsert_trainer_contact_impl(
        &self,
        trainer_id: i64,
        contact: ContactForm,
    ) -> Result<TrainerContact> {
        let contact = contact.normalized();
        let now = chrono::Utc::now().timestamp();

        let existing = TrainerContacts::find()
            .filter(Column::TrainerId.eq(trainer_id))
            .one(&self.db)
            .await
            .map_err(db_err("查询教练联系方式失败"))?;

        let saved = match existing {
            Some(model) => {
                let mut model: ActiveModel = model.into();
                model.whatsapp = Set(contact.whatsapp);
                model.microsoft_teams = Set(contact.microsoft_teams);
                model.skype = Set(contact.skype);
                model.email = Set(contact.email);
                model.phone = Set(contact.phone);
                model.updated_at = Set(now);
                model.update(&self.db).await
            }
            None => {
                ActiveModel {
                    trainer_id: Set(trainer_id),
                    whatsapp: Set(contact.whatsapp),
                    microsoft_teams: Set(contact.microsoft_teams),
                    skype: Set(contact.skype),
                    email: Set(contact.email),
                    phone: Set(contact.phone),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(&self.db)
                .await
            }
        }
        .map_err(db_err("保存教练联系方式失败"))?;

        Ok(saved.into_contact())
    }

    pub async fn delete_trainer_contact_impl(&self, trainer_id: i64) -> Result<bool> {
        let result = TrainerContacts::delete_many()
            .filter(Column::TrainerId.eq(trainer_id))
            .exec(&self.db)
            .await
            .map_err(db_err("删除教练联系方式失败"))?;
        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::courses::tests::create_member;
    use super::*;
    use crate::models::accounts::entities::Role;
    use crate::storage::Storage;

    #[tokio::test]
    async fn test_contact_upsert_and_delete() {
        let storage = SeaOrmStorage::in_memory().await.expect("storage");
        let trainer = create_member(&storage, "trainer1", Role::Trainer).await;

        let created = storage
            .upsert_trainer_contact(
                trainer,
                ContactForm {
                    whatsapp: Some("+91 12345".into()),
                    skype: Some("   ".into()),
                    ..Default::default()
                },
            )
            .await
            .expect("create");
        assert_eq!(created.whatsapp.as_deref(), Some("+91 12345"));
        assert!(created.skype.is_none());

        let updated = storage
            .upsert_trainer_contact(
                trainer,
                ContactForm {
                    email: Some("coach@example.com".into()),
                    ..Default::default()
                },
            )
            .await
            .expect("update");
        assert_eq!(updated.id, created.id);
        assert!(updated.whatsapp.is_none());
        assert_eq!(updated.email.as_deref(), Some("coach@example.com"));

        assert!(storage.delete_trainer_contact(trainer).await.expect("delete"));
        assert!(!storage.delete_trainer_contact(trainer).await.expect("nothing left"));
        assert!(storage.get_trainer_contact(trainer).await.expect("get").is_none());
    }
}
