/// 存储层调用失败时直接返回 500 响应
macro_rules! try_or_500 {
    ($expr:expr, $context:literal) => {
        match $expr {
            Ok(value) => value,
            Err(e) => return Ok($crate::utils::server_error($context, e)),
        }
    };
}

/// 取出当前登录用户，缺失时跳转登录页
macro_rules! require_member {
    ($request:expr) => {
        match $crate::services::common::current_member($request) {
            Ok(member) => member,
            Err(response) => return Ok(response),
        }
    };
}

pub mod auth;
pub mod common;
pub mod managers;
pub mod profile;
pub mod public;
pub mod students;
pub mod trainers;

pub use auth::AuthService;
pub use managers::ManagerService;
pub use profile::ProfileService;
pub use public::PublicService;
pub use students::StudentService;
pub use trainers::TrainerService;
