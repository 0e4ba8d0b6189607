use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 用户角色（互斥）
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "account.ts")]
pub enum Role {
    Manager, // 管理员
    Trainer, // 教练
    Student, // 学生
}

impl Role {
    pub const MANAGER: &'static str = "manager";
    pub const TRAINER: &'static str = "trainer";
    pub const STUDENT: &'static str = "student";

    pub fn manager_roles() -> &'static [Role] {
        &[Self::Manager]
    }
    pub fn trainer_roles() -> &'static [Role] {
        &[Self::Trainer]
    }
    pub fn student_roles() -> &'static [Role] {
        &[Self::Student]
    }
    pub fn staff_roles() -> &'static [Role] {
        &[Self::Manager, Self::Trainer]
    }
    pub fn all_roles() -> &'static [Role] {
        &[Self::Manager, Self::Trainer, Self::Student]
    }

    /// 从旧数据的三个布尔标志推断角色，优先级 Manager > Trainer > Student
    pub fn from_flags(is_manager: bool, is_trainer: bool, _is_student: bool) -> Self {
        if is_manager {
            Role::Manager
        } else if is_trainer {
            Role::Trainer
        } else {
            Role::Student
        }
    }

    /// 该角色的首页
    pub fn dashboard_path(self) -> &'static str {
        match self {
            Role::Manager => "/manager/dashboard/",
            Role::Trainer => "/trainer/dashboard/",
            Role::Student => "/student/dashboard/",
        }
    }

    /// 展示用名称
    pub fn label(self) -> &'static str {
        match self {
            Role::Manager => "Manager",
            Role::Trainer => "Trainer",
            Role::Student => "Student",
        }
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<Role>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的用户角色: '{s}'. 支持的角色: manager, trainer, student"
            ))
        })
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Manager => write!(f, "{}", Role::MANAGER),
            Role::Trainer => write!(f, "{}", Role::TRAINER),
            Role::Student => write!(f, "{}", Role::STUDENT),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Role::MANAGER => Ok(Role::Manager),
            Role::TRAINER => Ok(Role::Trainer),
            Role::STUDENT => Ok(Role::Student),
            _ => Err(format!("Invalid role: {s}")),
        }
    }
}

// 账号
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "account.ts")]
pub struct Account {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing, default)] // 不序列化到JSON响应中
    #[ts(skip)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub last_login: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Account {
    /// 姓名，为空时退回用户名
    pub fn full_name(&self) -> String {
        let name = format!("{} {}", self.first_name, self.last_name);
        let name = name.trim();
        if name.is_empty() {
            self.username.clone()
        } else {
            name.to_string()
        }
    }

    pub fn summary(&self) -> AccountSummary {
        AccountSummary {
            id: self.id,
            username: self.username.clone(),
            full_name: self.full_name(),
            email: self.email.clone(),
        }
    }
}

// 账号资料（每个账号一条）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "account.ts")]
pub struct Profile {
    pub id: i64,
    pub account_id: i64,
    pub role: Role,
    pub country: Option<String>,
    pub state: Option<String>,
    pub district: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 账号 + 资料
///
/// 认证中间件会把当前登录用户以该类型放入请求扩展。
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "account.ts")]
pub struct Member {
    pub account: Account,
    pub profile: Profile,
}

pub type CurrentUser = Member;

impl Member {
    pub fn id(&self) -> i64 {
        self.account.id
    }

    pub fn role(&self) -> Role {
        self.profile.role
    }
}

// 列表展示用的账号摘要
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "account.ts")]
pub struct AccountSummary {
    pub id: i64,
    pub username: String,
    pub full_name: String,
    pub email: String,
}

/// 资料中的地址（名称快照）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "account.ts")]
pub struct Location {
    pub country: Option<String>,
    pub state: Option<String>,
    pub district: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_priority_from_flags() {
        assert_eq!(Role::from_flags(true, true, true), Role::Manager);
        assert_eq!(Role::from_flags(false, true, true), Role::Trainer);
        assert_eq!(Role::from_flags(false, false, true), Role::Student);
        // 没有任何标志时默认学生
        assert_eq!(Role::from_flags(false, false, false), Role::Student);
    }

    #[test]
    fn test_role_round_trip_and_dashboard() {
        for role in Role::all_roles() {
            assert_eq!(role.to_string().parse::<Role>(), Ok(*role));
        }
        assert_eq!(Role::Trainer.dashboard_path(), "/trainer/dashboard/");
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_full_name_falls_back_to_username() {
        let now = chrono::Utc::now();
        let mut account = Account {
            id: 1,
            username: "alice_01".into(),
            email: "alice@example.com".into(),
            password_hash: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            last_login: None,
            created_at: now,
            updated_at: now,
        };
        assert_eq!(account.full_name(), "alice_01");

        account.first_name = "Alice".into();
        assert_eq!(account.full_name(), "Alice");
    }
}
