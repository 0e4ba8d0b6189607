use super::{SeaOrmStorage, db_err};
use crate::entity::countries::{
    ActiveModel as CountryActiveModel, Column as CountryColumn, Entity as Countries,
};
use crate::entity::districts::{
    ActiveModel as DistrictActiveModel, Column as DistrictColumn, Entity as Districts,
};
use crate::entity::states::{
    ActiveModel as StateActiveModel, Column as StateColumn, Entity as States,
};
use crate::errors::Result;
use crate::models::locations::{CountrySeed, District, LocationOption, State};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

impl SeaOrmStorage {
    pub async fn list_countries_impl(&self) -> Result<Vec<LocationOption>> {
        let result = Countries::find()
            .order_by_asc(CountryColumn::Name)
            .all(&self.db)
            .await
            .map_err(db_err("查询国家列表失败"))?;
        Ok(result.into_iter().map(|m| m.into_option()).collect())
    }

    pub async fn list_states_impl(&self, country_id: i64) -> Result<Vec<LocationOption>> {
        let result = States::find()
            .filter(StateColumn::CountryId.eq(country_id))
            .order_by_asc(StateColumn::Name)
            .all(&self.db)
            .await
            .map_err(db_err("查询省份列表失败"))?;
        Ok(result
            .into_iter()
            .map(|m| LocationOption {
                id: m.id,
                name: m.name,
            })
            .collect())
    }

    pub async fn list_districts_impl(&self, state_id: i64) -> Result<Vec<LocationOption>> {
        let result = Districts::find()
            .filter(DistrictColumn::StateId.eq(state_id))
            .order_by_asc(DistrictColumn::Name)
            .all(&self.db)
            .await
            .map_err(db_err("查询区县列表失败"))?;
        Ok(result
            .into_iter()
            .map(|m| LocationOption {
                id: m.id,
                name: m.name,
            })
            .collect())
    }

    pub async fn get_country_impl(&self, id: i64) -> Result<Option<LocationOption>> {
        let result = Countries::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err("查询国家失败"))?;
        Ok(result.map(|m| m.into_option()))
    }

    pub async fn get_state_impl(&self, id: i64) -> Result<Option<State>> {
        let result = States::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err("查询省份失败"))?;
        Ok(result.map(|m| m.into_state()))
    }

    pub async fn get_district_impl(&self, id: i64) -> Result<Option<District>> {
        let result = Districts::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err("查询区县失败"))?;
        Ok(result.map(|m| m.into_district()))
    }

    pub async fn count_countries_impl(&self) -> Result<u64> {
        Countries::find()
            .count(&self.db)
            .await
            .map_err(db_err("统计国家失败"))
    }

    /// 导入地区数据，按名称去重
    pub async fn seed_locations_impl(&self, countries: Vec<CountrySeed>) -> Result<u64> {
        let txn = self.db.begin().await.map_err(db_err("开启事务失败"))?;
        let mut inserted = 0u64;

        for country in countries {
            let existing = Countries::find()
                .filter(CountryColumn::Name.eq(country.name.as_str()))
                .one(&txn)
                .await
                .map_err(db_err("查询国家失败"))?;
            let country_id = match existing {
                Some(model) => model.id,
                None => {
                    inserted += 1;
                    CountryActiveModel {
                        name: Set(country.name),
                        ..Default::default()
                    }
                    .insert(&txn)
                    .await
                    .map_err(db_err("导入国家失败"))?
                    .id
                }
            };

            for state in country.states {
                let existing = States::find()
                    .filter(StateColumn::CountryId.eq(country_id))
                    .filter(StateColumn::Name.eq(state.name.as_str()))
                    .one(&txn)
                    .await
                    .map_err(db_err("查询省份失败"))?;
                let state_id = match existing {
                    Some(model) => model.id,
                    None => {
                        StateActiveModel {
                            country_id: Set(country_id),
                            name: Set(state.name),
                            ..Default::default()
                        }
                        .insert(&txn)
                        .await
                        .map_err(db_err("导入省份失败"))?
                        .id
                    }
                };

                for district in state.districts {
                    let exists = Districts::find()
                        .filter(DistrictColumn::StateId.eq(state_id))
                        .filter(DistrictColumn::Name.eq(district.as_str()))
                        .count(&txn)
                        .await
                        .map_err(db_err("查询区县失败"))?
                        > 0;
                    if !exists {
                        DistrictActiveModel {
                            state_id: Set(state_id),
                            name: Set(district),
                            ..Default::default()
                        }
                        .insert(&txn)
                        .await
                        .map_err(db_err("导入区县失败"))?;
                    }
                }
            }
        }

        txn.commit().await.map_err(db_err("提交事务失败"))?;
        Ok(inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::locations::StateSeed;
    use crate::storage::Storage;

    fn seed() -> Vec<CountrySeed> {
        vec![CountrySeed {
            name: "India".into(),
            states: vec![
                StateSeed {
                    name: "Kerala".into(),
                    districts: vec!["Kochi".into(), "Alappuzha".into()],
                },
                StateSeed {
                    name: "Goa".into(),
                    districts: vec![],
                },
            ],
        }]
    }

    #[tokio::test]
    async fn test_seed_and_cascade_lookup() {
        let storage = SeaOrmStorage::in_memory().await.expect("storage");
        assert_eq!(storage.seed_locations(seed()).await.expect("seed"), 1);
        // 重复导入不会产生重复数据
        assert_eq!(storage.seed_locations(seed()).await.expect("reseed"), 0);

        let countries = storage.list_countries().await.expect("countries");
        assert_eq!(countries.len(), 1);

        let states = storage.list_states(countries[0].id).await.expect("states");
        let names: Vec<_> = states.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Goa", "Kerala"]);

        let kerala = states.iter().find(|s| s.name == "Kerala").expect("kerala");
        let districts = storage.list_districts(kerala.id).await.expect("districts");
        let names: Vec<_> = districts.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Alappuzha", "Kochi"]);

        let district = storage
            .get_district(districts[0].id)
            .await
            .expect("district")
            .expect("exists");
        assert_eq!(district.state_id, kerala.id);
        assert!(storage.list_states(9999).await.expect("empty").is_empty());
    }
}
