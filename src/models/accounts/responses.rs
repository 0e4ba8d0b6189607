use serde::Serialize;
use ts_rs::TS;

use super::entities::{Member, Profile};
use crate::models::catalog::Course;
use crate::models::locations::LocationOption;

// 登录响应
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "account.ts")]
pub struct LoginResponse {
    pub access_token: String,
    pub expires_in: i64,
    pub redirect_to: String,
    pub member: Member,
}

// 完善资料页面
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "account.ts")]
pub struct CompleteProfileView {
    pub countries: Vec<LocationOption>,
    pub profile: Profile,
}

// 旧版资料页
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "account.ts")]
pub struct ProfileView {
    pub member: Member,
}

// 旧版课程列表（已选 / 已上传）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "account.ts")]
pub struct MyCoursesView {
    pub courses: Vec<Course>,
}
