use super::{SeaOrmStorage, db_err};
use crate::entity::courses::{ActiveModel, Column, Entity as Courses};
use crate::entity::{
    course_videos, enrollments, feedbacks, payments, trainer_course_assignments, video_progress,
    video_ratings,
};
use crate::errors::Result;
use crate::models::{
    PaginatedResponse, PaginationInfo,
    catalog::{entities::Course, requests::CourseInput, responses::CourseListResponse},
};
use crate::utils::{escape_like_pattern, pricing::final_price, slug::slugify};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
    sea_query::{Expr, ExprTrait, Func},
};

impl SeaOrmStorage {
    /// 创建课程，slug 与折后价在写入时计算
    pub async fn create_course_impl(&self, input: CourseInput) -> Result<Course> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            slug: Set(slugify(&input.title)),
            price: Set(final_price(input.list_price, input.discount)),
            title: Set(input.title),
            description: Set(input.description),
            category: Set(input.category),
            level: Set(input.level),
            duration: Set(input.duration),
            requirements: Set(input.requirements),
            content: Set(input.content),
            list_price: Set(input.list_price),
            discount: Set(input.discount),
            thumbnail: Set(input.thumbnail),
            featured_video: Set(input.featured_video),
            instructor_id: Set(input.instructor_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(db_err("创建课程失败"))?;
        Ok(result.into_course())
    }

    /// 更新课程，slug 随标题重新生成
    pub async fn update_course_impl(
        &self,
        course_id: i64,
        input: CourseInput,
    ) -> Result<Option<Course>> {
        let Some(existing) = Courses::find_by_id(course_id)
            .one(&self.db)
            .await
            .map_err(db_err("查询课程失败"))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        model.slug = Set(slugify(&input.title));
        model.price = Set(final_price(input.list_price, input.discount));
        model.title = Set(input.title);
        model.description = Set(input.description);
        model.category = Set(input.category);
        model.level = Set(input.level);
        model.duration = Set(input.duration);
        model.requirements = Set(input.requirements);
        model.content = Set(input.content);
        model.list_price = Set(input.list_price);
        model.discount = Set(input.discount);
        model.thumbnail = Set(input.thumbnail);
        model.featured_video = Set(input.featured_video);
        model.instructor_id = Set(input.instructor_id);
        model.updated_at = Set(chrono::Utc::now().timestamp());

        let updated = model
            .update(&self.db)
            .await
            .map_err(db_err("更新课程失败"))?;
        Ok(Some(updated.into_course()))
    }

    pub async fn delete_course_cascade_impl(&self, course_id: i64) -> Result<bool> {
        let txn = self.db.begin().await.map_err(db_err("开启事务失败"))?;
        let exists = Courses::find_by_id(course_id)
            .one(&txn)
            .await
            .map_err(db_err("查询课程失败"))?
            .is_some();
        if !exists {
            return Ok(false);
        }

        Self::delete_courses_in(&txn, &[course_id]).await?;
        txn.commit().await.map_err(db_err("提交事务失败"))?;
        Ok(true)
    }

    /// 删除课程及其全部从属数据，调用方负责事务
    pub(super) async fn delete_courses_in<C>(conn: &C, course_ids: &[i64]) -> Result<()>
    where
        C: ConnectionTrait,
    {
        if course_ids.is_empty() {
            return Ok(());
        }
        let ids = course_ids.to_vec();

        let video_ids: Vec<i64> = course_videos::Entity::find()
            .filter(course_videos::Column::CourseId.is_in(ids.clone()))
            .all(conn)
            .await
            .map_err(db_err("查询课程视频失败"))?
            .into_iter()
            .map(|v| v.id)
            .collect();

        if !video_ids.is_empty() {
            video_progress::Entity::delete_many()
                .filter(video_progress::Column::VideoId.is_in(video_ids.clone()))
                .exec(conn)
                .await
                .map_err(db_err("删除学习进度失败"))?;
            video_ratings::Entity::delete_many()
                .filter(video_ratings::Column::VideoId.is_in(video_ids))
                .exec(conn)
                .await
                .map_err(db_err("删除视频评分失败"))?;
        }

        course_videos::Entity::delete_many()
            .filter(course_videos::Column::CourseId.is_in(ids.clone()))
            .exec(conn)
            .await
            .map_err(db_err("删除课程视频失败"))?;
        enrollments::Entity::delete_many()
            .filter(enrollments::Column::CourseId.is_in(ids.clone()))
            .exec(conn)
            .await
            .map_err(db_err("删除选课记录失败"))?;
        trainer_course_assignments::Entity::delete_many()
            .filter(trainer_course_assignments::Column::CourseId.is_in(ids.clone()))
            .exec(conn)
            .await
            .map_err(db_err("删除教练分配失败"))?;
        payments::Entity::delete_many()
            .filter(payments::Column::CourseId.is_in(ids.clone()))
            .exec(conn)
            .await
            .map_err(db_err("删除支付申请失败"))?;
        feedbacks::Entity::delete_many()
            .filter(feedbacks::Column::CourseId.is_in(ids.clone()))
            .exec(conn)
            .await
            .map_err(db_err("删除课程反馈失败"))?;
        Courses::delete_many()
            .filter(Column::Id.is_in(ids))
            .exec(conn)
            .await
            .map_err(db_err("删除课程失败"))?;

        Ok(())
    }

    pub async fn get_course_impl(&self, course_id: i64) -> Result<Option<Course>> {
        let result = Courses::find_by_id(course_id)
            .one(&self.db)
            .await
            .map_err(db_err("查询课程失败"))?;
        Ok(result.map(|m| m.into_course()))
    }

    pub async fn get_course_by_slug_impl(
        &self,
        instructor_id: i64,
        slug: &str,
    ) -> Result<Option<Course>> {
        let result = Courses::find()
            .filter(Column::InstructorId.eq(instructor_id))
            .filter(Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(db_err("查询课程失败"))?;
        Ok(result.map(|m| m.into_course()))
    }

    /// 分页列出课程
    pub async fn list_courses_impl(
        &self,
        search: Option<String>,
        page: u64,
        size: u64,
    ) -> Result<CourseListResponse> {
        let mut select = Courses::find();

        // 搜索条件
        if let Some(ref search) = search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::Title.contains(&escaped))
                    .add(Column::Description.contains(&escaped))
                    .add(Column::Category.contains(&escaped)),
            );
        }

        let paginator = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(db_err("查询课程总数失败"))?;
        let items = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(db_err("查询课程列表失败"))?
            .into_iter()
            .map(|m| m.into_course())
            .collect();

        Ok(PaginatedResponse {
            items,
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    pub async fn list_latest_courses_impl(&self, limit: u64) -> Result<Vec<Course>> {
        let result = Courses::find()
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(db_err("查询最新课程失败"))?;
        Ok(result.into_iter().map(|m| m.into_course()).collect())
    }

    /// 按分类列出课程（不区分大小写）
    pub async fn list_courses_by_category_impl(&self, category: &str) -> Result<Vec<Course>> {
        let result = Courses::find()
            .filter(Expr::expr(Func::lower(Expr::col(Column::Category))).eq(category.to_lowercase()))
            .order_by_desc(Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err("按分类查询课程失败"))?;
        Ok(result.into_iter().map(|m| m.into_course()).collect())
    }

    /// 同分类的其他课程
    pub async fn list_related_courses_impl(
        &self,
        course_id: i64,
        category: &str,
        limit: u64,
    ) -> Result<Vec<Course>> {
        let result = Courses::find()
            .filter(Column::Category.eq(category))
            .filter(Column::Id.ne(course_id))
            .order_by_desc(Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(db_err("查询相关课程失败"))?;
        Ok(result.into_iter().map(|m| m.into_course()).collect())
    }

    pub async fn list_all_courses_impl(&self) -> Result<Vec<Course>> {
        let result = Courses::find()
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err("查询课程列表失败"))?;
        Ok(result.into_iter().map(|m| m.into_course()).collect())
    }

    pub async fn list_courses_by_instructor_impl(&self, instructor_id: i64) -> Result<Vec<Course>> {
        let result = Courses::find()
            .filter(Column::InstructorId.eq(instructor_id))
            .order_by_desc(Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err("查询讲师课程失败"))?;
        Ok(result.into_iter().map(|m| m.into_course()).collect())
    }

    pub async fn list_courses_by_ids_impl(&self, ids: &[i64]) -> Result<Vec<Course>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let result = Courses::find()
            .filter(Column::Id.is_in(ids.iter().copied()))
            .order_by_asc(Column::Title)
            .all(&self.db)
            .await
            .map_err(db_err("批量查询课程失败"))?;
        Ok(result.into_iter().map(|m| m.into_course()).collect())
    }

    pub async fn count_courses_impl(&self) -> Result<u64> {
        Courses::find()
            .count(&self.db)
            .await
            .map_err(db_err("统计课程失败"))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::errors::LmsError;
    use crate::models::accounts::{
        entities::{Location, Role},
        requests::NewAccount,
    };
    use crate::storage::Storage;

    pub(crate) async fn create_member(storage: &SeaOrmStorage, username: &str, role: Role) -> i64 {
        storage
            .create_account(NewAccount {
                username: username.to_string(),
                email: format!("{username}@example.com"),
                password_hash: "hash".into(),
                first_name: String::new(),
                last_name: String::new(),
                role,
                location: Location::default(),
            })
            .await
            .expect("create account")
            .id()
    }

    pub(crate) fn course_input(title: &str, instructor_id: i64) -> CourseInput {
        CourseInput {
            title: title.to_string(),
            description: "desc".into(),
            category: "Programming".into(),
            level: "Beginner".into(),
            duration: "10 Hours".into(),
            requirements: "laptop, internet".into(),
            content: "basics, advanced".into(),
            list_price: 100.0,
            discount: 20.0,
            thumbnail: None,
            featured_video: None,
            instructor_id,
        }
    }

    #[tokio::test]
    async fn test_create_course_computes_slug_and_price() {
        let storage = SeaOrmStorage::in_memory().await.expect("storage");
        let trainer = create_member(&storage, "trainer1", Role::Trainer).await;

        let course = storage
            .create_course(course_input("Intro to Rust", trainer))
            .await
            .expect("create");
        assert_eq!(course.slug, "intro-to-rust");
        assert_eq!(course.price, 80.0);
        assert_eq!(course.list_price, 100.0);

        let mut input = course_input("Advanced Rust", trainer);
        input.discount = 0.0;
        let updated = storage
            .update_course(course.id, input)
            .await
            .expect("update")
            .expect("exists");
        assert_eq!(updated.slug, "advanced-rust");
        assert_eq!(updated.price, 100.0);

        let by_slug = storage
            .get_course_by_slug(trainer, "advanced-rust")
            .await
            .expect("lookup");
        assert_eq!(by_slug.map(|c| c.id), Some(course.id));
        assert!(
            storage
                .get_course_by_slug(trainer, "intro-to-rust")
                .await
                .expect("old slug")
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_duplicate_title_conflicts_on_slug() {
        let storage = SeaOrmStorage::in_memory().await.expect("storage");
        let trainer = create_member(&storage, "trainer1", Role::Trainer).await;
        storage
            .create_course(course_input("Same Title", trainer))
            .await
            .expect("first");
        let err = storage
            .create_course(course_input("Same  title", trainer))
            .await
            .expect_err("slug conflict");
        assert!(matches!(err, LmsError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_category_and_search() {
        let storage = SeaOrmStorage::in_memory().await.expect("storage");
        let trainer = create_member(&storage, "trainer1", Role::Trainer).await;
        let rust = storage
            .create_course(course_input("Rust Basics", trainer))
            .await
            .expect("rust");
        storage
            .create_course(course_input("Go Basics", trainer))
            .await
            .expect("go");
        let mut design = course_input("Design 101", trainer);
        design.category = "Design".into();
        storage.create_course(design).await.expect("design");

        let programming = storage
            .list_courses_by_category("programming")
            .await
            .expect("category");
        assert_eq!(programming.len(), 2);

        let related = storage
            .list_related_courses(rust.id, &rust.category, 3)
            .await
            .expect("related");
        assert_eq!(related.len(), 1);
        assert_eq!(related[0].title, "Go Basics");

        let found = storage
            .list_courses(Some("rust".into()), 1, 10)
            .await
            .expect("search");
        assert_eq!(found.pagination.total, 1);
        assert_eq!(found.items[0].id, rust.id);

        let page = storage.list_courses(None, 2, 2).await.expect("page 2");
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.pagination.total_pages, 2);
    }

    #[tokio::test]
    async fn test_category_lookup_ignores_case() {
        let storage = SeaOrmStorage::in_memory().await.expect("storage");
        let trainer = create_member(&storage, "trainer1", Role::Trainer).await;
        let mut input = course_input("Lowercase Category", trainer);
        input.category = "programming".into();
        let course = storage.create_course(input).await.expect("create");

        let upper = storage
            .list_courses_by_category("PROGRAMMING")
            .await
            .expect("category");
        assert_eq!(upper.iter().map(|c| c.id).collect::<Vec<_>>(), vec![course.id]);

        let none = storage
            .list_courses_by_category("design")
            .await
            .expect("category");
        assert!(none.is_empty());
    }
}
