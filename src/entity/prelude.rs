//! 预导入模块，方便使用

pub use super::accounts::{
    ActiveModel as AccountActiveModel, Entity as Accounts, Model as AccountModel,
};
pub use super::countries::{
    ActiveModel as CountryActiveModel, Entity as Countries, Model as CountryModel,
};
pub use super::course_videos::{
    ActiveModel as CourseVideoActiveModel, Entity as CourseVideos, Model as CourseVideoModel,
};
pub use super::courses::{ActiveModel as CourseActiveModel, Entity as Courses, Model as CourseModel};
pub use super::districts::{
    ActiveModel as DistrictActiveModel, Entity as Districts, Model as DistrictModel,
};
pub use super::enrollments::{
    ActiveModel as EnrollmentActiveModel, Entity as Enrollments, Model as EnrollmentModel,
};
pub use super::feedbacks::{
    ActiveModel as FeedbackActiveModel, Entity as Feedbacks, Model as FeedbackModel,
};
pub use super::payments::{
    ActiveModel as PaymentActiveModel, Entity as Payments, Model as PaymentModel,
};
pub use super::profiles::{
    ActiveModel as ProfileActiveModel, Entity as Profiles, Model as ProfileModel,
};
pub use super::states::{ActiveModel as StateActiveModel, Entity as States, Model as StateModel};
pub use super::trainer_contacts::{
    ActiveModel as TrainerContactActiveModel, Entity as TrainerContacts,
    Model as TrainerContactModel,
};
pub use super::trainer_course_assignments::{
    ActiveModel as AssignmentActiveModel, Entity as TrainerCourseAssignments,
    Model as AssignmentModel,
};
pub use super::trainer_ratings::{
    ActiveModel as TrainerRatingActiveModel, Entity as TrainerRatings, Model as TrainerRatingModel,
};
pub use super::video_progress::{
    ActiveModel as VideoProgressActiveModel, Entity as VideoProgress, Model as VideoProgressModel,
};
pub use super::video_ratings::{
    ActiveModel as VideoRatingActiveModel, Entity as VideoRatings, Model as VideoRatingModel,
};
