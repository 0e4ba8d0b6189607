//! 存储层、缓存层和启动流程共用的错误类型
//!
//! 页面处理函数不直接返回 `LmsError`，而是转换成通知或 500 响应。

use std::fmt;

/// 每个变体带错误码和类型名，同时生成同名 snake_case 构造函数
macro_rules! define_lms_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub enum LmsError {
            $($variant(String),)*
        }

        impl LmsError {
            pub fn code(&self) -> &'static str {
                match self {
                    $(LmsError::$variant(_) => $code,)*
                }
            }

            pub fn error_type(&self) -> &'static str {
                match self {
                    $(LmsError::$variant(_) => $type_name,)*
                }
            }

            pub fn message(&self) -> &str {
                match self {
                    $(LmsError::$variant(msg) => msg,)*
                }
            }
        }

        paste::paste! {
            impl LmsError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        LmsError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_lms_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    CachePluginNotFound("E002", "Cache Plugin Not Found"),
    DatabaseConfig("E003", "Database Configuration Error"),
    DatabaseConnection("E004", "Database Connection Error"),
    DatabaseOperation("E005", "Database Operation Error"),
    FileOperation("E006", "File Operation Error"),
    Validation("E007", "Validation Error"),
    NotFound("E008", "Resource Not Found"),
    Conflict("E009", "Conflict"),
    Forbidden("E010", "Forbidden"),
    Serialization("E011", "Serialization Error"),
    Authentication("E012", "Authentication Error"),
    Authorization("E013", "Authorization Error"),
}

impl fmt::Display for LmsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error_type(), self.message())
    }
}

impl std::error::Error for LmsError {}

// 唯一约束冲突映射为 Conflict
impl From<sea_orm::DbErr> for LmsError {
    fn from(err: sea_orm::DbErr) -> Self {
        match err.sql_err() {
            Some(sea_orm::SqlErr::UniqueConstraintViolation(detail)) => {
                LmsError::Conflict(detail)
            }
            _ => LmsError::DatabaseOperation(err.to_string()),
        }
    }
}

impl From<std::io::Error> for LmsError {
    fn from(err: std::io::Error) -> Self {
        LmsError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for LmsError {
    fn from(err: serde_json::Error) -> Self {
        LmsError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LmsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(LmsError::cache_connection("test").code(), "E001");
        assert_eq!(LmsError::database_config("test").code(), "E003");
        assert_eq!(LmsError::validation("test").code(), "E007");
        assert_eq!(LmsError::conflict("test").code(), "E009");
        assert_eq!(LmsError::forbidden("test").code(), "E010");
        assert_eq!(LmsError::authentication("test").code(), "E012");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            LmsError::cache_connection("test").error_type(),
            "Cache Connection Error"
        );
        assert_eq!(LmsError::validation("test").error_type(), "Validation Error");
        assert_eq!(LmsError::not_found("x").error_type(), "Resource Not Found");
    }

    #[test]
    fn test_error_message() {
        let err = LmsError::validation("Invalid input");
        assert_eq!(err.message(), "Invalid input");
    }

    #[test]
    fn test_display_includes_type_and_message() {
        let text = LmsError::validation("Invalid URL").to_string();
        assert_eq!(text, "Validation Error: Invalid URL");
    }

    #[test]
    fn test_plain_db_error_maps_to_database_operation() {
        let err: LmsError = sea_orm::DbErr::Custom("broken".into()).into();
        assert_eq!(err.code(), "E005");
    }
}
