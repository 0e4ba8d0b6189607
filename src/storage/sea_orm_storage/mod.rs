//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod accounts;
mod assignments;
mod contacts;
mod courses;
mod enrollments;
mod locations;
mod payments;
mod progress;
mod ratings;
mod videos;

use crate::config::AppConfig;
use crate::errors::{LmsError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

/// 数据库错误附加上下文，唯一约束冲突保持为 Conflict
pub(crate) fn db_err(context: &'static str) -> impl Fn(DbErr) -> LmsError {
    move |e| match LmsError::from(e) {
        LmsError::Conflict(detail) => LmsError::conflict(format!("{context}: {detail}")),
        other => LmsError::database_operation(format!("{context}: {}", other.message())),
    }
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, config.database.pool_size, config.database.timeout)
                .await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        Self::migrate(&db).await?;
        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// 内存 SQLite，单连接保证所有查询看到同一个数据库
    pub async fn in_memory() -> Result<Self> {
        let db = Self::connect_sqlite("sqlite::memory:", 1, 5).await?;
        Self::migrate(&db).await?;
        Ok(Self { db })
    }

    async fn migrate(db: &DatabaseConnection) -> Result<()> {
        Migrator::up(db, None)
            .await
            .map_err(|e| LmsError::database_operation(format!("数据库迁移失败: {e}")))
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(
        url: &str,
        pool_size: u32,
        timeout_secs: u64,
    ) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let in_memory = url.contains(":memory:");
        let mut opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| LmsError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory");
        if !in_memory {
            opt = opt
                .journal_mode(SqliteJournalMode::Wal)
                .pragma("mmap_size", "536870912")
                .pragma("wal_autocheckpoint", "1000");
        }

        let mut pool = SqlitePoolOptions::new()
            .max_connections(pool_size.max(1))
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(timeout_secs));
        if in_memory {
            // 连接关闭后内存数据库即消失
            pool = pool.idle_timeout(None).max_lifetime(None);
        } else {
            pool = pool.idle_timeout(Duration::from_secs(300));
        }

        let pool = pool
            .connect_with(opt)
            .await
            .map_err(|e| LmsError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| LmsError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(LmsError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

// Storage trait 实现
use crate::models::{
    accounts::{
        entities::{Account, Location, Member, Profile, Role},
        requests::{AccountUpdate, NewAccount},
    },
    catalog::{
        entities::{Course, CourseVideo, TrainerAssignment, TrainerContact},
        requests::{ContactForm, CourseInput, VideoInput},
        responses::CourseListResponse,
    },
    learning::{
        enrollments::Enrollment,
        payments::{NewPayment, Payment, PaymentAction, PaymentDecision},
        progress::{ProgressReport, VideoProgress},
        ratings::{Feedback, RatingInput, TrainerRating, VideoRating},
    },
    locations::{CountrySeed, District, LocationOption, State},
};
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 账号模块
    async fn create_account(&self, account: NewAccount) -> Result<Member> {
        self.create_account_impl(account).await
    }

    async fn count_accounts(&self) -> Result<u64> {
        self.count_accounts_impl().await
    }

    async fn get_account_by_id(&self, id: i64) -> Result<Option<Account>> {
        self.get_account_by_id_impl(id).await
    }

    async fn get_account_by_login(&self, identifier: &str) -> Result<Option<Account>> {
        self.get_account_by_login_impl(identifier).await
    }

    async fn list_accounts_by_ids(&self, ids: &[i64]) -> Result<Vec<Account>> {
        self.list_accounts_by_ids_impl(ids).await
    }

    async fn username_exists(&self, username: &str) -> Result<bool> {
        self.username_exists_impl(username).await
    }

    async fn email_exists(&self, email: &str, exclude_id: Option<i64>) -> Result<bool> {
        self.email_exists_impl(email, exclude_id).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn update_account(&self, id: i64, update: AccountUpdate) -> Result<Option<Account>> {
        self.update_account_impl(id, update).await
    }

    async fn delete_trainer_cascade(&self, trainer_id: i64) -> Result<bool> {
        self.delete_trainer_cascade_impl(trainer_id).await
    }

    async fn get_member(&self, id: i64) -> Result<Option<Member>> {
        self.get_member_impl(id).await
    }

    async fn list_members_by_role(&self, role: Role) -> Result<Vec<Member>> {
        self.list_members_by_role_impl(role).await
    }

    async fn count_by_role(&self, role: Role) -> Result<u64> {
        self.count_by_role_impl(role).await
    }

    async fn ensure_profile(&self, account_id: i64) -> Result<Profile> {
        self.ensure_profile_impl(account_id).await
    }

    async fn update_profile_location(
        &self,
        account_id: i64,
        location: Location,
    ) -> Result<Option<Profile>> {
        self.update_profile_location_impl(account_id, location)
            .await
    }

    // 地区模块
    async fn list_countries(&self) -> Result<Vec<LocationOption>> {
        self.list_countries_impl().await
    }

    async fn list_states(&self, country_id: i64) -> Result<Vec<LocationOption>> {
        self.list_states_impl(country_id).await
    }

    async fn list_districts(&self, state_id: i64) -> Result<Vec<LocationOption>> {
        self.list_districts_impl(state_id).await
    }

    async fn get_country(&self, id: i64) -> Result<Option<LocationOption>> {
        self.get_country_impl(id).await
    }

    async fn get_state(&self, id: i64) -> Result<Option<State>> {
        self.get_state_impl(id).await
    }

    async fn get_district(&self, id: i64) -> Result<Option<District>> {
        self.get_district_impl(id).await
    }

    async fn count_countries(&self) -> Result<u64> {
        self.count_countries_impl().await
    }

    async fn seed_locations(&self, countries: Vec<CountrySeed>) -> Result<u64> {
        self.seed_locations_impl(countries).await
    }

    // 课程模块
    async fn create_course(&self, course: CourseInput) -> Result<Course> {
        self.create_course_impl(course).await
    }

    async fn update_course(&self, course_id: i64, course: CourseInput) -> Result<Option<Course>> {
        self.update_course_impl(course_id, course).await
    }

    async fn delete_course_cascade(&self, course_id: i64) -> Result<bool> {
        self.delete_course_cascade_impl(course_id).await
    }

    async fn get_course(&self, course_id: i64) -> Result<Option<Course>> {
        self.get_course_impl(course_id).await
    }

    async fn get_course_by_slug(&self, instructor_id: i64, slug: &str) -> Result<Option<Course>> {
        self.get_course_by_slug_impl(instructor_id, slug).await
    }

    async fn list_courses(
        &self,
        search: Option<String>,
        page: u64,
        size: u64,
    ) -> Result<CourseListResponse> {
        self.list_courses_impl(search, page, size).await
    }

    async fn list_latest_courses(&self, limit: u64) -> Result<Vec<Course>> {
        self.list_latest_courses_impl(limit).await
    }

    async fn list_courses_by_category(&self, category: &str) -> Result<Vec<Course>> {
        self.list_courses_by_category_impl(category).await
    }

    async fn list_related_courses(
        &self,
        course_id: i64,
        category: &str,
        limit: u64,
    ) -> Result<Vec<Course>> {
        self.list_related_courses_impl(course_id, category, limit)
            .await
    }

    async fn list_all_courses(&self) -> Result<Vec<Course>> {
        self.list_all_courses_impl().await
    }

    async fn list_courses_by_instructor(&self, instructor_id: i64) -> Result<Vec<Course>> {
        self.list_courses_by_instructor_impl(instructor_id).await
    }

    async fn list_courses_by_ids(&self, ids: &[i64]) -> Result<Vec<Course>> {
        self.list_courses_by_ids_impl(ids).await
    }

    async fn count_courses(&self) -> Result<u64> {
        self.count_courses_impl().await
    }

    // 视频模块
    async fn create_video(&self, course_id: i64, video: VideoInput) -> Result<CourseVideo> {
        self.create_video_impl(course_id, video).await
    }

    async fn update_video(&self, video_id: i64, video: VideoInput) -> Result<Option<CourseVideo>> {
        self.update_video_impl(video_id, video).await
    }

    async fn delete_video_cascade(&self, video_id: i64) -> Result<bool> {
        self.delete_video_cascade_impl(video_id).await
    }

    async fn get_video(&self, video_id: i64) -> Result<Option<CourseVideo>> {
        self.get_video_impl(video_id).await
    }

    async fn list_videos_by_ids(&self, ids: &[i64]) -> Result<Vec<CourseVideo>> {
        self.list_videos_by_ids_impl(ids).await
    }

    async fn list_course_videos(&self, course_id: i64) -> Result<Vec<CourseVideo>> {
        self.list_course_videos_impl(course_id).await
    }

    async fn count_course_videos(&self, course_id: i64) -> Result<u64> {
        self.count_course_videos_impl(course_id).await
    }

    // 教练分配模块
    async fn assign_trainer(
        &self,
        trainer_id: i64,
        course_id: i64,
        assigned_by: Option<i64>,
    ) -> Result<Option<TrainerAssignment>> {
        self.assign_trainer_impl(trainer_id, course_id, assigned_by)
            .await
    }

    async fn get_assignment(&self, assignment_id: i64) -> Result<Option<TrainerAssignment>> {
        self.get_assignment_impl(assignment_id).await
    }

    async fn delete_assignment(&self, assignment_id: i64) -> Result<bool> {
        self.delete_assignment_impl(assignment_id).await
    }

    async fn is_trainer_assigned(&self, trainer_id: i64, course_id: i64) -> Result<bool> {
        self.is_trainer_assigned_impl(trainer_id, course_id).await
    }

    async fn list_assignments(&self) -> Result<Vec<TrainerAssignment>> {
        self.list_assignments_impl().await
    }

    async fn list_trainer_assignments(&self, trainer_id: i64) -> Result<Vec<TrainerAssignment>> {
        self.list_trainer_assignments_impl(trainer_id).await
    }

    async fn list_course_trainer_ids(&self, course_id: i64) -> Result<Vec<i64>> {
        self.list_course_trainer_ids_impl(course_id).await
    }

    // 联系方式模块
    async fn get_trainer_contact(&self, trainer_id: i64) -> Result<Option<TrainerContact>> {
        self.get_trainer_contact_impl(trainer_id).await
    }

    async fn upsert_trainer_contact(
        &self,
        trainer_id: i64,
        contact: ContactForm,
    ) -> Result<TrainerContact> {
        self.upsert_trainer_contact_impl(trainer_id, contact).await
    }

    async fn delete_trainer_contact(&self, trainer_id: i64) -> Result<bool> {
        self.delete_trainer_contact_impl(trainer_id).await
    }

    // 选课模块
    async fn is_enrolled(&self, student_id: i64, course_id: i64) -> Result<bool> {
        self.is_enrolled_impl(student_id, course_id).await
    }

    async fn list_student_enrollments(&self, student_id: i64) -> Result<Vec<Enrollment>> {
        self.list_student_enrollments_impl(student_id).await
    }

    async fn list_course_enrollments(&self, course_id: i64) -> Result<Vec<Enrollment>> {
        self.list_course_enrollments_impl(course_id).await
    }

    async fn list_latest_enrollments(&self, limit: u64) -> Result<Vec<Enrollment>> {
        self.list_latest_enrollments_impl(limit).await
    }

    async fn count_enrollments(&self) -> Result<u64> {
        self.count_enrollments_impl().await
    }

    async fn count_course_students(&self, course_id: i64) -> Result<u64> {
        self.count_course_students_impl(course_id).await
    }

    async fn count_distinct_students(&self, course_ids: &[i64]) -> Result<u64> {
        self.count_distinct_students_impl(course_ids).await
    }

    // 支付模块
    async fn has_pending_payment(&self, student_id: i64, course_id: i64) -> Result<bool> {
        self.has_pending_payment_impl(student_id, course_id).await
    }

    async fn create_payment(&self, payment: NewPayment) -> Result<Payment> {
        self.create_payment_impl(payment).await
    }

    async fn get_payment(&self, payment_id: i64) -> Result<Option<Payment>> {
        self.get_payment_impl(payment_id).await
    }

    async fn list_student_payments(&self, student_id: i64) -> Result<Vec<Payment>> {
        self.list_student_payments_impl(student_id).await
    }

    async fn list_all_payments(&self) -> Result<Vec<Payment>> {
        self.list_all_payments_impl().await
    }

    async fn decide_payment(
        &self,
        payment_id: i64,
        approver_id: i64,
        action: PaymentAction,
        notes: Option<String>,
    ) -> Result<PaymentDecision> {
        self.decide_payment_impl(payment_id, approver_id, action, notes)
            .await
    }

    // 学习进度模块
    async fn update_video_progress(
        &self,
        student_id: i64,
        video_id: i64,
        report: ProgressReport,
    ) -> Result<VideoProgress> {
        self.update_video_progress_impl(student_id, video_id, report)
            .await
    }

    async fn list_student_progress_for_course(
        &self,
        student_id: i64,
        course_id: i64,
    ) -> Result<Vec<VideoProgress>> {
        self.list_student_progress_for_course_impl(student_id, course_id)
            .await
    }

    async fn list_progress_for_course(&self, course_id: i64) -> Result<Vec<VideoProgress>> {
        self.list_progress_for_course_impl(course_id).await
    }

    // 评分与反馈模块
    async fn upsert_trainer_rating(
        &self,
        trainer_id: i64,
        student_id: i64,
        rating: RatingInput,
    ) -> Result<TrainerRating> {
        self.upsert_trainer_rating_impl(trainer_id, student_id, rating)
            .await
    }

    async fn get_trainer_rating(
        &self,
        trainer_id: i64,
        student_id: i64,
    ) -> Result<Option<TrainerRating>> {
        self.get_trainer_rating_impl(trainer_id, student_id).await
    }

    async fn list_trainer_ratings(&self, trainer_id: i64) -> Result<Vec<TrainerRating>> {
        self.list_trainer_ratings_impl(trainer_id).await
    }

    async fn list_latest_trainer_ratings(&self, limit: u64) -> Result<Vec<TrainerRating>> {
        self.list_latest_trainer_ratings_impl(limit).await
    }

    async fn upsert_video_rating(
        &self,
        video_id: i64,
        student_id: i64,
        rating: RatingInput,
    ) -> Result<VideoRating> {
        self.upsert_video_rating_impl(video_id, student_id, rating)
            .await
    }

    async fn get_video_rating(
        &self,
        video_id: i64,
        student_id: i64,
    ) -> Result<Option<VideoRating>> {
        self.get_video_rating_impl(video_id, student_id).await
    }

    async fn list_student_video_ratings_for_course(
        &self,
        student_id: i64,
        course_id: i64,
    ) -> Result<Vec<VideoRating>> {
        self.list_student_video_ratings_for_course_impl(student_id, course_id)
            .await
    }

    async fn list_latest_video_ratings(&self, limit: u64) -> Result<Vec<VideoRating>> {
        self.list_latest_video_ratings_impl(limit).await
    }

    async fn upsert_feedback(
        &self,
        student_id: i64,
        course_id: i64,
        feedback: RatingInput,
    ) -> Result<Feedback> {
        self.upsert_feedback_impl(student_id, course_id, feedback)
            .await
    }

    async fn get_feedback(&self, student_id: i64, course_id: i64) -> Result<Option<Feedback>> {
        self.get_feedback_impl(student_id, course_id).await
    }

    async fn list_course_feedback(&self, course_id: i64) -> Result<Vec<Feedback>> {
        self.list_course_feedback_impl(course_id).await
    }

    async fn list_feedback(&self, limit: Option<u64>) -> Result<Vec<Feedback>> {
        self.list_feedback_impl(limit).await
    }

    async fn trainer_reachable_by_student(
        &self,
        trainer_id: i64,
        student_id: i64,
    ) -> Result<bool> {
        self.trainer_reachable_by_student_impl(trainer_id, student_id)
            .await
    }
}
