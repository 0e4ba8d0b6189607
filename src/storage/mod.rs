use std::sync::Arc;

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

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 账号管理方法
    // 创建账号及其资料（同一事务）
    async fn create_account(&self, account: NewAccount) -> Result<Member>;
    // 账号总数
    async fn count_accounts(&self) -> Result<u64>;
    // 通过ID获取账号
    async fn get_account_by_id(&self, id: i64) -> Result<Option<Account>>;
    // 通过用户名或邮箱获取账号
    async fn get_account_by_login(&self, identifier: &str) -> Result<Option<Account>>;
    // 批量获取账号
    async fn list_accounts_by_ids(&self, ids: &[i64]) -> Result<Vec<Account>>;
    // 用户名是否已存在
    async fn username_exists(&self, username: &str) -> Result<bool>;
    // 邮箱是否已被其他账号使用
    async fn email_exists(&self, email: &str, exclude_id: Option<i64>) -> Result<bool>;
    // 更新最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // 更新账号信息
    async fn update_account(&self, id: i64, update: AccountUpdate) -> Result<Option<Account>>;
    // 删除教练及其全部关联数据
    async fn delete_trainer_cascade(&self, trainer_id: i64) -> Result<bool>;
    // 账号 + 资料
    async fn get_member(&self, id: i64) -> Result<Option<Member>>;
    // 按角色列出
    async fn list_members_by_role(&self, role: Role) -> Result<Vec<Member>>;
    // 按角色计数
    async fn count_by_role(&self, role: Role) -> Result<u64>;

    /// 资料管理方法
    // 确保账号存在资料，不存在时以学生角色创建（幂等）
    async fn ensure_profile(&self, account_id: i64) -> Result<Profile>;
    // 更新地址
    async fn update_profile_location(
        &self,
        account_id: i64,
        location: Location,
    ) -> Result<Option<Profile>>;

    /// 地区参考数据
    async fn list_countries(&self) -> Result<Vec<LocationOption>>;
    async fn list_states(&self, country_id: i64) -> Result<Vec<LocationOption>>;
    async fn list_districts(&self, state_id: i64) -> Result<Vec<LocationOption>>;
    async fn get_country(&self, id: i64) -> Result<Option<LocationOption>>;
    async fn get_state(&self, id: i64) -> Result<Option<State>>;
    async fn get_district(&self, id: i64) -> Result<Option<District>>;
    async fn count_countries(&self) -> Result<u64>;
    // 导入参考数据，已存在的条目跳过，返回新增国家数
    async fn seed_locations(&self, countries: Vec<CountrySeed>) -> Result<u64>;

    /// 课程管理方法
    async fn create_course(&self, course: CourseInput) -> Result<Course>;
    async fn update_course(&self, course_id: i64, course: CourseInput) -> Result<Option<Course>>;
    // 删除课程及视频、进度、评分、选课、分配、支付、反馈
    async fn delete_course_cascade(&self, course_id: i64) -> Result<bool>;
    async fn get_course(&self, course_id: i64) -> Result<Option<Course>>;
    async fn get_course_by_slug(&self, instructor_id: i64, slug: &str) -> Result<Option<Course>>;
    // 分页列出课程，可按标题/描述/分类搜索
    async fn list_courses(
        &self,
        search: Option<String>,
        page: u64,
        size: u64,
    ) -> Result<CourseListResponse>;
    async fn list_latest_courses(&self, limit: u64) -> Result<Vec<Course>>;
    // 分类不区分大小写
    async fn list_courses_by_category(&self, category: &str) -> Result<Vec<Course>>;
    async fn list_related_courses(
        &self,
        course_id: i64,
        category: &str,
        limit: u64,
    ) -> Result<Vec<Course>>;
    async fn list_all_courses(&self) -> Result<Vec<Course>>;
    async fn list_courses_by_instructor(&self, instructor_id: i64) -> Result<Vec<Course>>;
    async fn list_courses_by_ids(&self, ids: &[i64]) -> Result<Vec<Course>>;
    async fn count_courses(&self) -> Result<u64>;

    /// 课程视频
    async fn create_video(&self, course_id: i64, video: VideoInput) -> Result<CourseVideo>;
    async fn update_video(&self, video_id: i64, video: VideoInput) -> Result<Option<CourseVideo>>;
    // 删除视频及其进度和评分
    async fn delete_video_cascade(&self, video_id: i64) -> Result<bool>;
    async fn get_video(&self, video_id: i64) -> Result<Option<CourseVideo>>;
    async fn list_videos_by_ids(&self, ids: &[i64]) -> Result<Vec<CourseVideo>>;
    // 按顺序号、创建时间排列
    async fn list_course_videos(&self, course_id: i64) -> Result<Vec<CourseVideo>>;
    async fn count_course_videos(&self, course_id: i64) -> Result<u64>;

    /// 教练分配
    // 已分配时返回 None
    async fn assign_trainer(
        &self,
        trainer_id: i64,
        course_id: i64,
        assigned_by: Option<i64>,
    ) -> Result<Option<TrainerAssignment>>;
    async fn get_assignment(&self, assignment_id: i64) -> Result<Option<TrainerAssignment>>;
    async fn delete_assignment(&self, assignment_id: i64) -> Result<bool>;
    async fn is_trainer_assigned(&self, trainer_id: i64, course_id: i64) -> Result<bool>;
    async fn list_assignments(&self) -> Result<Vec<TrainerAssignment>>;
    async fn list_trainer_assignments(&self, trainer_id: i64) -> Result<Vec<TrainerAssignment>>;
    async fn list_course_trainer_ids(&self, course_id: i64) -> Result<Vec<i64>>;

    /// 教练联系方式
    async fn get_trainer_contact(&self, trainer_id: i64) -> Result<Option<TrainerContact>>;
    async fn upsert_trainer_contact(
        &self,
        trainer_id: i64,
        contact: ContactForm,
    ) -> Result<TrainerContact>;
    async fn delete_trainer_contact(&self, trainer_id: i64) -> Result<bool>;

    /// 选课
    async fn is_enrolled(&self, student_id: i64, course_id: i64) -> Result<bool>;
    async fn list_student_enrollments(&self, student_id: i64) -> Result<Vec<Enrollment>>;
    async fn list_course_enrollments(&self, course_id: i64) -> Result<Vec<Enrollment>>;
    async fn list_latest_enrollments(&self, limit: u64) -> Result<Vec<Enrollment>>;
    async fn count_enrollments(&self) -> Result<u64>;
    async fn count_course_students(&self, course_id: i64) -> Result<u64>;
    // 多门课程的去重学生数
    async fn count_distinct_students(&self, course_ids: &[i64]) -> Result<u64>;

    /// 购买申请
    async fn has_pending_payment(&self, student_id: i64, course_id: i64) -> Result<bool>;
    async fn create_payment(&self, payment: NewPayment) -> Result<Payment>;
    async fn get_payment(&self, payment_id: i64) -> Result<Option<Payment>>;
    async fn list_student_payments(&self, student_id: i64) -> Result<Vec<Payment>>;
    async fn list_all_payments(&self) -> Result<Vec<Payment>>;
    // 审批申请，批准时在同一事务内创建选课记录
    async fn decide_payment(
        &self,
        payment_id: i64,
        approver_id: i64,
        action: PaymentAction,
        notes: Option<String>,
    ) -> Result<PaymentDecision>;

    /// 学习进度
    async fn update_video_progress(
        &self,
        student_id: i64,
        video_id: i64,
        report: ProgressReport,
    ) -> Result<VideoProgress>;
    async fn list_student_progress_for_course(
        &self,
        student_id: i64,
        course_id: i64,
    ) -> Result<Vec<VideoProgress>>;
    async fn list_progress_for_course(&self, course_id: i64) -> Result<Vec<VideoProgress>>;

    /// 评分与反馈
    async fn upsert_trainer_rating(
        &self,
        trainer_id: i64,
        student_id: i64,
        rating: RatingInput,
    ) -> Result<TrainerRating>;
    async fn get_trainer_rating(
        &self,
        trainer_id: i64,
        student_id: i64,
    ) -> Result<Option<TrainerRating>>;
    async fn list_trainer_ratings(&self, trainer_id: i64) -> Result<Vec<TrainerRating>>;
    async fn list_latest_trainer_ratings(&self, limit: u64) -> Result<Vec<TrainerRating>>;
    async fn upsert_video_rating(
        &self,
        video_id: i64,
        student_id: i64,
        rating: RatingInput,
    ) -> Result<VideoRating>;
    async fn get_video_rating(&self, video_id: i64, student_id: i64)
    -> Result<Option<VideoRating>>;
    async fn list_student_video_ratings_for_course(
        &self,
        student_id: i64,
        course_id: i64,
    ) -> Result<Vec<VideoRating>>;
    async fn list_latest_video_ratings(&self, limit: u64) -> Result<Vec<VideoRating>>;
    async fn upsert_feedback(
        &self,
        student_id: i64,
        course_id: i64,
        feedback: RatingInput,
    ) -> Result<Feedback>;
    async fn get_feedback(&self, student_id: i64, course_id: i64) -> Result<Option<Feedback>>;
    async fn list_course_feedback(&self, course_id: i64) -> Result<Vec<Feedback>>;
    // 按时间倒序，limit 为 None 时返回全部
    async fn list_feedback(&self, limit: Option<u64>) -> Result<Vec<Feedback>>;

    // 教练是否为该学生已选课程的讲师或分配教练
    async fn trainer_reachable_by_student(&self, trainer_id: i64, student_id: i64)
    -> Result<bool>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
