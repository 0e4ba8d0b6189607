use super::{SeaOrmStorage, db_err};
use crate::entity::accounts::{ActiveModel, Column, Entity as Accounts};
use crate::entity::profiles::{
    ActiveModel as ProfileActiveModel, Column as ProfileColumn, Entity as Profiles,
};
use crate::entity::{trainer_contacts, trainer_course_assignments, trainer_ratings};
use crate::errors::{LmsError, Result};
use crate::models::accounts::{
    entities::{Account, Location, Member, Profile, Role},
    requests::{AccountUpdate, NewAccount},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建账号和资料，两者在同一事务中写入
    pub async fn create_account_impl(&self, req: NewAccount) -> Result<Member> {
        let now = chrono::Utc::now().timestamp();
        let txn = self.db.begin().await.map_err(db_err("开启事务失败"))?;

        let account = ActiveModel {
            username: Set(req.username),
            email: Set(req.email),
            password_hash: Set(req.password_hash),
            first_name: Set(req.first_name),
            last_name: Set(req.last_name),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(db_err("创建账号失败"))?;

        let profile = ProfileActiveModel {
            account_id: Set(account.id),
            role: Set(req.role.to_string()),
            country: Set(req.location.country),
            state: Set(req.location.state),
            district: Set(req.location.district),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(db_err("创建账号资料失败"))?;

        txn.commit().await.map_err(db_err("提交事务失败"))?;

        Ok(Member {
            account: account.into_account(),
            profile: profile.into_profile(),
        })
    }

    pub async fn count_accounts_impl(&self) -> Result<u64> {
        Accounts::find()
            .count(&self.db)
            .await
            .map_err(db_err("统计账号失败"))
    }

    pub async fn get_account_by_id_impl(&self, id: i64) -> Result<Option<Account>> {
        let result = Accounts::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err("查询账号失败"))?;

        Ok(result.map(|m| m.into_account()))
    }

    /// 通过用户名或邮箱获取账号
    pub async fn get_account_by_login_impl(&self, identifier: &str) -> Result<Option<Account>> {
        let result = Accounts::find()
            .filter(
                Condition::any()
                    .add(Column::Username.eq(identifier))
                    .add(Column::Email.eq(identifier)),
            )
            .one(&self.db)
            .await
            .map_err(db_err("查询账号失败"))?;

        Ok(result.map(|m| m.into_account()))
    }

    pub async fn list_accounts_by_ids_impl(&self, ids: &[i64]) -> Result<Vec<Account>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let result = Accounts::find()
            .filter(Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(db_err("批量查询账号失败"))?;

        Ok(result.into_iter().map(|m| m.into_account()).collect())
    }

    pub async fn username_exists_impl(&self, username: &str) -> Result<bool> {
        let count = Accounts::find()
            .filter(Column::Username.eq(username))
            .count(&self.db)
            .await
            .map_err(db_err("查询用户名失败"))?;
        Ok(count > 0)
    }

    pub async fn email_exists_impl(&self, email: &str, exclude_id: Option<i64>) -> Result<bool> {
        let mut select = Accounts::find().filter(Column::Email.eq(email));
        if let Some(id) = exclude_id {
            select = select.filter(Column::Id.ne(id));
        }
        let count = select
            .count(&self.db)
            .await
            .map_err(db_err("查询邮箱失败"))?;
        Ok(count > 0)
    }

    pub async fn update_last_login_impl(&self, id: i64) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();
        let result = Accounts::update_many()
            .col_expr(Column::LastLogin, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(db_err("更新最后登录时间失败"))?;
        Ok(result.rows_affected > 0)
    }

    pub async fn update_account_impl(
        &self,
        id: i64,
        update: AccountUpdate,
    ) -> Result<Option<Account>> {
        let Some(existing) = Accounts::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err("查询账号失败"))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        if let Some(first_name) = update.first_name {
            model.first_name = Set(first_name);
        }
        if let Some(last_name) = update.last_name {
            model.last_name = Set(last_name);
        }
        if let Some(email) = update.email {
            model.email = Set(email);
        }
        if let Some(password_hash) = update.password_hash {
            model.password_hash = Set(password_hash);
        }
        model.updated_at = Set(chrono::Utc::now().timestamp());

        let updated = model
            .update(&self.db)
            .await
            .map_err(db_err("更新账号失败"))?;
        Ok(Some(updated.into_account()))
    }

    /// 删除教练：名下课程（级联）、分配、联系方式、评分、资料、账号
    pub async fn delete_trainer_cascade_impl(&self, trainer_id: i64) -> Result<bool> {
        let txn = self.db.begin().await.map_err(db_err("开启事务失败"))?;

        if Accounts::find_by_id(trainer_id)
            .one(&txn)
            .await
            .map_err(db_err("查询账号失败"))?
            .is_none()
        {
            return Ok(false);
        }

        let owned_courses: Vec<i64> = crate::entity::courses::Entity::find()
            .filter(crate::entity::courses::Column::InstructorId.eq(trainer_id))
            .all(&txn)
            .await
            .map_err(db_err("查询教练课程失败"))?
            .into_iter()
            .map(|c| c.id)
            .collect();
        Self::delete_courses_in(&txn, &owned_courses).await?;

        trainer_course_assignments::Entity::delete_many()
            .filter(trainer_course_assignments::Column::TrainerId.eq(trainer_id))
            .exec(&txn)
            .await
            .map_err(db_err("删除教练分配失败"))?;
        trainer_contacts::Entity::delete_many()
            .filter(trainer_contacts::Column::TrainerId.eq(trainer_id))
            .exec(&txn)
            .await
            .map_err(db_err("删除教练联系方式失败"))?;
        trainer_ratings::Entity::delete_many()
            .filter(trainer_ratings::Column::TrainerId.eq(trainer_id))
            .exec(&txn)
            .await
            .map_err(db_err("删除教练评分失败"))?;
        Profiles::delete_many()
            .filter(ProfileColumn::AccountId.eq(trainer_id))
            .exec(&txn)
            .await
            .map_err(db_err("删除账号资料失败"))?;
        let result = Accounts::delete_by_id(trainer_id)
            .exec(&txn)
            .await
            .map_err(db_err("删除账号失败"))?;

        txn.commit().await.map_err(db_err("提交事务失败"))?;
        Ok(result.rows_affected > 0)
    }

    pub async fn get_member_impl(&self, id: i64) -> Result<Option<Member>> {
        let Some(account) = self.get_account_by_id_impl(id).await? else {
            return Ok(None);
        };
        let profile = self.ensure_profile_impl(id).await?;
        Ok(Some(Member { account, profile }))
    }

    pub async fn list_members_by_role_impl(&self, role: Role) -> Result<Vec<Member>> {
        let rows = Accounts::find()
            .find_also_related(Profiles)
            .filter(ProfileColumn::Role.eq(role.to_string()))
            .order_by_asc(Column::Username)
            .all(&self.db)
            .await
            .map_err(db_err("按角色查询账号失败"))?;

        Ok(rows
            .into_iter()
            .filter_map(|(account, profile)| {
                profile.map(|p| Member {
                    account: account.into_account(),
                    profile: p.into_profile(),
                })
            })
            .collect())
    }

    pub async fn count_by_role_impl(&self, role: Role) -> Result<u64> {
        Profiles::find()
            .filter(ProfileColumn::Role.eq(role.to_string()))
            .count(&self.db)
            .await
            .map_err(db_err("按角色统计账号失败"))
    }

    /// 读取资料，不存在时以学生角色创建
    ///
    /// 并发首次访问时，唯一索引保证只有一条资料，插入冲突的一方重新读取即可。
    pub async fn ensure_profile_impl(&self, account_id: i64) -> Result<Profile> {
        if let Some(profile) = self.find_profile(account_id).await? {
            return Ok(profile);
        }

        let now = chrono::Utc::now().timestamp();
        let insert = ProfileActiveModel {
            account_id: Set(account_id),
            role: Set(Role::Student.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(db_err("创建账号资料失败"));

        match insert {
            Ok(model) => Ok(model.into_profile()),
            Err(LmsError::Conflict(_)) => self
                .find_profile(account_id)
                .await?
                .ok_or_else(|| LmsError::not_found(format!("账号资料不存在: {account_id}"))),
            Err(e) => Err(e),
        }
    }

    async fn find_profile(&self, account_id: i64) -> Result<Option<Profile>> {
        let result = Profiles::find()
            .filter(ProfileColumn::AccountId.eq(account_id))
            .one(&self.db)
            .await
            .map_err(db_err("查询账号资料失败"))?;
        Ok(result.map(|m| m.into_profile()))
    }

    pub async fn update_profile_location_impl(
        &self,
        account_id: i64,
        location: Location,
    ) -> Result<Option<Profile>> {
        let Some(existing) = Profiles::find()
            .filter(ProfileColumn::AccountId.eq(account_id))
            .one(&self.db)
            .await
            .map_err(db_err("查询账号资料失败"))?
        else {
            return Ok(None);
        };

        let mut model: ProfileActiveModel = existing.into();
        model.country = Set(location.country);
        model.state = Set(location.state);
        model.district = Set(location.district);
        model.updated_at = Set(chrono::Utc::now().timestamp());

        let updated = model
            .update(&self.db)
            .await
            .map_err(db_err("更新账号资料失败"))?;
        Ok(Some(updated.into_profile()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Storage;

    fn new_account(username: &str, role: Role) -> NewAccount {
        NewAccount {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: "hash".to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            role,
            location: Location::default(),
        }
    }

    #[tokio::test]
    async fn test_create_account_with_profile() {
        let storage = SeaOrmStorage::in_memory().await.expect("storage");
        let member = storage
            .create_account(new_account("alice", Role::Trainer))
            .await
            .expect("create");

        assert_eq!(member.role(), Role::Trainer);
        assert_eq!(member.profile.account_id, member.id());
        assert!(storage.username_exists("alice").await.expect("exists"));
        assert!(
            !storage
                .email_exists("alice@example.com", Some(member.id()))
                .await
                .expect("exists")
        );
        assert_eq!(storage.count_by_role(Role::Trainer).await.expect("count"), 1);

        let by_email = storage
            .get_account_by_login("alice@example.com")
            .await
            .expect("lookup");
        assert_eq!(by_email.map(|a| a.id), Some(member.id()));
    }

    #[tokio::test]
    async fn test_duplicate_username_is_conflict() {
        let storage = SeaOrmStorage::in_memory().await.expect("storage");
        storage
            .create_account(new_account("bobby", Role::Student))
            .await
            .expect("create");

        let mut dup = new_account("bobby", Role::Student);
        dup.email = "other@example.com".into();
        let err = storage.create_account(dup).await.expect_err("duplicate");
        assert!(matches!(err, LmsError::Conflict(_)));
        assert_eq!(storage.count_accounts().await.expect("count"), 1);
    }

    #[tokio::test]
    async fn test_ensure_profile_is_idempotent() {
        let storage = SeaOrmStorage::in_memory().await.expect("storage");
        let member = storage
            .create_account(new_account("carol", Role::Student))
            .await
            .expect("create");

        // 模拟没有资料的旧账号
        Profiles::delete_many()
            .exec(&storage.db)
            .await
            .expect("delete profile");

        let first = storage.ensure_profile(member.id()).await.expect("first");
        let second = storage.ensure_profile(member.id()).await.expect("second");
        assert_eq!(first.id, second.id);
        assert_eq!(first.role, Role::Student);
        assert_eq!(storage.count_by_role(Role::Student).await.expect("count"), 1);
    }

    #[tokio::test]
    async fn test_update_account_and_location() {
        let storage = SeaOrmStorage::in_memory().await.expect("storage");
        let member = storage
            .create_account(new_account("daniel", Role::Trainer))
            .await
            .expect("create");

        let updated = storage
            .update_account(
                member.id(),
                AccountUpdate {
                    first_name: Some("Dan".into()),
                    ..Default::default()
                },
            )
            .await
            .expect("update")
            .expect("exists");
        assert_eq!(updated.first_name, "Dan");
        assert_eq!(updated.last_name, "User");

        let profile = storage
            .update_profile_location(
                member.id(),
                Location {
                    country: Some("India".into()),
                    state: Some("Kerala".into()),
                    district: None,
                },
            )
            .await
            .expect("update location")
            .expect("profile");
        assert_eq!(profile.state.as_deref(), Some("Kerala"));

        assert!(storage.update_last_login(member.id()).await.expect("login"));
        assert!(
            storage
                .update_account(9999, AccountUpdate::default())
                .await
                .expect("missing")
                .is_none()
        );
    }
}
