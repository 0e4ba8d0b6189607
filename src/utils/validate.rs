//! 注册 / 资料表单的字段校验

use once_cell::sync::Lazy;
use regex::Regex;

pub const USERNAME_MIN: usize = 5;
pub const USERNAME_MAX: usize = 30;
pub const PASSWORD_MIN: usize = 8;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.@+-]+$").expect("Invalid username regex"));

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}$")
        .expect("Invalid email regex")
});

pub fn validate_username(username: &str) -> Result<(), &'static str> {
    let len = username.chars().count();
    if !(USERNAME_MIN..=USERNAME_MAX).contains(&len) {
        return Err("Username length must be between 5 and 30 characters");
    }
    if !USERNAME_RE.is_match(username) {
        return Err("Username may contain only letters, numbers and _ . @ + - characters");
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if EMAIL_RE.is_match(email) {
        Ok(())
    } else {
        Err("Email format is invalid")
    }
}

/// 密码不满足的规则
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordRule {
    TooShort,
    MissingUppercase,
    MissingLowercase,
    MissingDigit,
    TooCommon,
}

impl PasswordRule {
    pub fn message(self) -> &'static str {
        match self {
            Self::TooShort => "Password must be at least 8 characters long",
            Self::MissingUppercase => "Password must contain at least one uppercase letter",
            Self::MissingLowercase => "Password must contain at least one lowercase letter",
            Self::MissingDigit => "Password must contain at least one digit",
            Self::TooCommon => "Password is too common, please choose a stronger password",
        }
    }
}

// 大小写不敏感比较
const COMMON_PASSWORDS: &[&str] = &[
    "password",
    "password1",
    "password123",
    "12345678",
    "123456789",
    "qwerty123",
    "admin123",
    "abcd1234",
    "welcome1",
    "letmein1",
    "iloveyou1",
];

/// 返回密码违反的全部规则，空表示通过
pub fn password_violations(password: &str) -> Vec<PasswordRule> {
    let has = |pred: fn(&char) -> bool| password.chars().any(|c| pred(&c));

    let checks = [
        (password.chars().count() < PASSWORD_MIN, PasswordRule::TooShort),
        (!has(char::is_ascii_uppercase), PasswordRule::MissingUppercase),
        (!has(char::is_ascii_lowercase), PasswordRule::MissingLowercase),
        (!has(char::is_ascii_digit), PasswordRule::MissingDigit),
        (
            COMMON_PASSWORDS
                .iter()
                .any(|weak| password.eq_ignore_ascii_case(weak)),
            PasswordRule::TooCommon,
        ),
    ];

    checks
        .into_iter()
        .filter_map(|(failed, rule)| failed.then_some(rule))
        .collect()
}

/// 校验密码，失败时把所有原因拼成一条提示
pub fn validate_password_simple(password: &str) -> Result<(), String> {
    let violations = password_violations(password);
    if violations.is_empty() {
        return Ok(());
    }
    Err(violations
        .iter()
        .map(|rule| rule.message())
        .collect::<Vec<_>>()
        .join("; "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_rules() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("first.last+lms@x").is_ok());
        assert!(validate_username("abc").is_err());
        assert!(validate_username(&"a".repeat(31)).is_err());
        assert!(validate_username("has space").is_err());
    }

    #[test]
    fn test_email_rules() {
        assert!(validate_email("student@example.com").is_ok());
        assert!(validate_email("first.last@mail.example.org").is_ok());
        assert!(validate_email("student@example").is_err());
        assert!(validate_email("no-at-sign.com").is_err());
    }

    #[test]
    fn test_strong_passwords_pass() {
        for pwd in ["SecureP@ss1", "MyP@ssw0rd", "SecurePass123"] {
            assert!(password_violations(pwd).is_empty(), "{pwd}");
        }
    }

    #[test]
    fn test_each_rule_reported() {
        assert_eq!(
            password_violations("Ab1"),
            vec![PasswordRule::TooShort]
        );
        assert_eq!(
            password_violations("abcd1234"),
            vec![PasswordRule::MissingUppercase, PasswordRule::TooCommon]
        );
        assert_eq!(
            password_violations("ABCD1234"),
            vec![PasswordRule::MissingLowercase, PasswordRule::TooCommon]
        );
        assert_eq!(
            password_violations("AbcdEfgh"),
            vec![PasswordRule::MissingDigit]
        );
        assert_eq!(
            password_violations("Password1"),
            vec![PasswordRule::TooCommon]
        );
    }

    #[test]
    fn test_simple_joins_messages() {
        let err = validate_password_simple("short").unwrap_err();
        assert!(err.contains("at least 8 characters"));
        assert!(err.contains("; "));
    }
}
