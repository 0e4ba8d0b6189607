//! 页面提示消息
//!
//! 表单提交后以重定向 + 一次性提示的方式返回，提示内容放在 flash cookie 中，
//! 下一次读取页面时取出并清除。

use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "notice.ts")]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "notice.ts")]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message)
    }
}

/// 页面视图：视图数据 + 待展示的提示
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "notice.ts")]
pub struct Page<T: TS> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
    pub view: T,
}

/// 重定向响应体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "notice.ts")]
pub struct RedirectPayload {
    pub redirect_to: String,
    pub level: NoticeLevel,
}
