//! 业务数据模型
//!
//! `entity` 模块是数据库表结构，这里是服务层和接口层使用的业务实体、
//! 表单和页面视图模型。

pub mod accounts;
pub mod catalog;
pub mod common;
pub mod dashboards;
pub mod learning;
pub mod locations;

pub use common::*;

use serde::Serialize;
use ts_rs::TS;

/// 接口响应中的业务错误码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "api.ts")]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用 1xxx
    BadRequest = 1000,
    NotFound = 1004,
    Forbidden = 1003,
    Conflict = 1009,
    ValidationFailed = 1022,
    RateLimitExceeded = 1029,
    InternalServerError = 1500,

    // 认证 2xxx
    Unauthorized = 2000,
    AuthFailed = 2001,
    RoleNotAllowed = 2003,

    // 账号 3xxx
    RegisterFailed = 3000,
    UserNameInvalid = 3001,
    UserEmailInvalid = 3002,
    UserPasswordInvalid = 3003,
    UserNameAlreadyExists = 3004,
    UserEmailAlreadyExists = 3005,
    UserNotFound = 3006,
    NotATrainer = 3007,
    LocationNotFound = 3008,

    // 课程 4xxx
    CourseNotFound = 4000,
    CourseSlugConflict = 4001,
    VideoNotFound = 4002,
    AssignmentNotFound = 4003,
    TrainerAlreadyAssigned = 4004,
    TrainerNotAssigned = 4005,
    ContactNotFound = 4006,

    // 选课与支付 5xxx
    NotEnrolled = 5000,
    AlreadyEnrolled = 5001,
    PaymentAlreadyRequested = 5002,
    PaymentNotFound = 5003,
    PaymentAlreadyProcessed = 5004,

    // 进度与评分 6xxx
    ProgressUpdateFailed = 6000,
    RatingInvalid = 6001,
    TrainerNotReachable = 6002,

    // 文件 7xxx
    FileUploadFailed = 7000,
    FileTypeNotAllowed = 7001,
    FileSizeExceeded = 7002,
}

impl ErrorCode {
    pub fn code(self) -> i32 {
        self as i32
    }
}

/// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::ErrorCode;

    #[test]
    fn test_error_code_ranges() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert!((1000..2000).contains(&ErrorCode::InternalServerError.code()));
        assert!((2000..3000).contains(&ErrorCode::Unauthorized.code()));
        assert!((3000..4000).contains(&ErrorCode::NotATrainer.code()));
        assert!((4000..5000).contains(&ErrorCode::CourseNotFound.code()));
        assert!((5000..6000).contains(&ErrorCode::PaymentAlreadyRequested.code()));
        assert!((6000..7000).contains(&ErrorCode::RatingInvalid.code()));
        assert!((7000..8000).contains(&ErrorCode::FileTypeNotAllowed.code()));
    }
}
