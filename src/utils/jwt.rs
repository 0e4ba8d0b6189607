//! 登录令牌：签发、校验和 cookie 读写

use crate::config::AppConfig;
use actix_web::HttpRequest;
use actix_web::cookie::{Cookie, SameSite, time::Duration as CookieDuration};
use actix_web::http::header::AUTHORIZATION;
use chrono::{Duration, Utc};
use jsonwebtoken::errors::{Error as JwtError, ErrorKind};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    /// 预留，当前不签发
    Refresh,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// 账号 ID
    pub sub: String,
    /// 签发时的角色，只用于日志，权限以数据库为准
    pub role: String,
    #[serde(rename = "token_type")]
    pub kind: TokenKind,
    pub exp: usize,
    pub iat: usize,
}

impl Claims {
    pub fn account_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

pub struct JwtUtils;

impl JwtUtils {
    fn secret() -> &'static [u8] {
        AppConfig::get().jwt.secret.as_bytes()
    }

    fn issue(account_id: i64, role: &str, kind: TokenKind, ttl: Duration) -> Result<String, JwtError> {
        let now = Utc::now();
        let claims = Claims {
            sub: account_id.to_string(),
            role: role.to_owned(),
            kind,
            exp: (now + ttl).timestamp() as usize,
            iat: now.timestamp() as usize,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(Self::secret()),
        )
    }

    pub fn generate_access_token(account_id: i64, role: &str) -> Result<String, JwtError> {
        let minutes = AppConfig::get().jwt.access_token_expiry;
        Self::issue(account_id, role, TokenKind::Access, Duration::minutes(minutes))
    }

    /// 校验签名和过期时间，且必须是访问令牌
    pub fn verify_access_token(token: &str) -> Result<Claims, JwtError> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(Self::secret()),
            &Validation::default(),
        )?;
        match data.claims.kind {
            TokenKind::Access => Ok(data.claims),
            TokenKind::Refresh => Err(ErrorKind::InvalidToken.into()),
        }
    }

    fn token_cookie(value: String, max_age: CookieDuration) -> Cookie<'static> {
        Cookie::build(ACCESS_TOKEN_COOKIE, value)
            .path("/")
            .max_age(max_age)
            .same_site(SameSite::Lax)
            .http_only(true)
            .secure(AppConfig::get().is_production())
            .finish()
    }

    pub fn create_access_token_cookie(token: &str) -> Cookie<'static> {
        let minutes = AppConfig::get().jwt.access_token_expiry;
        Self::token_cookie(token.to_owned(), CookieDuration::minutes(minutes))
    }

    /// 退出登录时覆盖并立即过期
    pub fn create_empty_access_token_cookie() -> Cookie<'static> {
        Self::token_cookie(String::new(), CookieDuration::ZERO)
    }

    /// Authorization: Bearer 优先，其次 cookie
    pub fn extract_access_token(req: &HttpRequest) -> Option<String> {
        let from_header = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.strip_prefix("Bearer "))
            .map(str::to_owned);

        from_header
            .or_else(|| req.cookie(ACCESS_TOKEN_COOKIE).map(|c| c.value().to_owned()))
            .filter(|token| !token.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_access_token_carries_account() {
        let token = JwtUtils::generate_access_token(42, "student").expect("token");
        let claims = JwtUtils::verify_access_token(&token).expect("valid token");
        assert_eq!(claims.account_id(), Some(42));
        assert_eq!(claims.role, "student");
        assert_eq!(claims.kind, TokenKind::Access);
    }

    #[test]
    fn test_refresh_token_not_accepted_for_access() {
        let token =
            JwtUtils::issue(1, "student", TokenKind::Refresh, Duration::minutes(5)).expect("token");
        assert!(JwtUtils::verify_access_token(&token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let token =
            JwtUtils::issue(1, "manager", TokenKind::Access, Duration::minutes(-10)).expect("token");
        assert!(JwtUtils::verify_access_token(&token).is_err());
    }

    #[test]
    fn test_extract_prefers_header() {
        let req = TestRequest::default()
            .insert_header(("Authorization", "Bearer from-header"))
            .cookie(Cookie::new(ACCESS_TOKEN_COOKIE, "from-cookie"))
            .to_http_request();
        assert_eq!(
            JwtUtils::extract_access_token(&req).as_deref(),
            Some("from-header")
        );

        let req = TestRequest::default()
            .cookie(Cookie::new(ACCESS_TOKEN_COOKIE, "from-cookie"))
            .to_http_request();
        assert_eq!(
            JwtUtils::extract_access_token(&req).as_deref(),
            Some("from-cookie")
        );

        let req = TestRequest::default().to_http_request();
        assert!(JwtUtils::extract_access_token(&req).is_none());
    }

    #[test]
    fn test_logout_cookie_expires_immediately() {
        let cookie = JwtUtils::create_empty_access_token_cookie();
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(CookieDuration::ZERO));
    }
}
