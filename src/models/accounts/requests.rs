use serde::Deserialize;
use ts_rs::TS;

use super::entities::{Location, Role};

// 注册表单
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "account.ts")]
pub struct SignupForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password_confirm: Option<String>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

// 登录表单（用户名或邮箱）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "account.ts")]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

// 完善资料表单：国家/省/区县 ID，均可选
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "account.ts")]
pub struct CompleteProfileForm {
    #[serde(default, deserialize_with = "crate::utils::form::empty_string_as_none")]
    pub country: Option<i64>,
    #[serde(default, deserialize_with = "crate::utils::form::empty_string_as_none")]
    pub state: Option<i64>,
    #[serde(default, deserialize_with = "crate::utils::form::empty_string_as_none")]
    pub district: Option<i64>,
}

// 管理员添加教练
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "account.ts")]
pub struct AddTrainerForm {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

// 管理员编辑教练，缺省字段保持原值
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "account.ts")]
pub struct EditTrainerForm {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub country: Option<String>,
    pub state: Option<String>,
    pub district: Option<String>,
}

/// 新建账号（连同资料）的存储层输入
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub location: Location,
}

/// 账号更新的存储层输入，None 表示不修改
#[derive(Debug, Clone, Default)]
pub struct AccountUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}
