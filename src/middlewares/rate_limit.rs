/*!
 * 登录 / 注册限流
 *
 * 固定窗口计数：每个客户端在窗口内的请求数达到上限后，
 * 剩余时间内一律返回 429，窗口结束后计数自动清零。
 *
 * ```rust,ignore
 * web::resource("/login/")
 *     .route(web::post().to(login).wrap(RateLimit::login()))
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use moka::future::Cache;
use once_cell::sync::Lazy;
use std::fmt;
use std::net::IpAddr;
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing::warn;

use super::create_error_response;
use crate::models::ErrorCode;
use crate::models::accounts::Member;

/// 计数窗口：首次请求时间 + 已用次数
#[derive(Clone, Copy)]
struct Window {
    opened_at: Instant,
    hits: u32,
}

// 条目最长存活一小时，窗口本身的过期在 `Window` 上判断
static WINDOWS: Lazy<Cache<String, Window>> = Lazy::new(|| {
    Cache::builder()
        .time_to_idle(Duration::from_secs(3600))
        .max_capacity(100_000)
        .build()
});

/// 限流对象
#[derive(Debug, PartialEq, Eq)]
enum Client {
    Account(i64),
    Address(String),
    Unknown,
}

impl Client {
    fn from_request(req: &ServiceRequest) -> Self {
        if let Some(member) = req.extensions().get::<Member>() {
            return Client::Account(member.id());
        }

        let info = req.connection_info();
        let candidates = [
            info.realip_remote_addr().map(str::to_string),
            header_value(req, "X-Forwarded-For")
                .and_then(|v| v.split(',').next().map(|ip| ip.trim().to_string())),
            header_value(req, "X-Real-IP").map(|v| v.trim().to_string()),
        ];

        candidates
            .into_iter()
            .flatten()
            .map(|raw| strip_port(&raw))
            .find(|ip| ip.parse::<IpAddr>().is_ok())
            .map(Client::Address)
            .unwrap_or(Client::Unknown)
    }
}

impl fmt::Display for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Client::Account(id) => write!(f, "account:{id}"),
            Client::Address(ip) => write!(f, "ip:{ip}"),
            Client::Unknown => f.write_str("ip:unknown"),
        }
    }
}

fn header_value(req: &ServiceRequest, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

// "1.2.3.4:5678" -> "1.2.3.4"，IPv6 地址原样返回
fn strip_port(raw: &str) -> String {
    if raw.parse::<IpAddr>().is_ok() {
        return raw.to_string();
    }
    raw.parse::<std::net::SocketAddr>()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|_| raw.to_string())
}

/// 限流策略，作为中间件挂在单个路由上
#[derive(Clone)]
pub struct RateLimit {
    scope: &'static str,
    limit: u32,
    window: Duration,
}

impl RateLimit {
    pub fn new(scope: &'static str, limit: u32, window: Duration) -> Self {
        Self {
            scope,
            limit,
            window,
        }
    }

    /// 登录：每分钟 5 次
    pub fn login() -> Self {
        Self::new("login", 5, Duration::from_secs(60))
    }

    /// 注册：每分钟 3 次
    pub fn signup() -> Self {
        Self::new("signup", 3, Duration::from_secs(60))
    }

    /// 记录一次请求，超限时返回距离窗口结束的秒数
    async fn hit(&self, client: &Client) -> Option<u64> {
        let key = format!("{}:{}", self.scope, client);
        let now = Instant::now();

        let window = match WINDOWS.get(&key).await {
            Some(w) if now.duration_since(w.opened_at) < self.window => w,
            _ => Window {
                opened_at: now,
                hits: 0,
            },
        };

        if window.hits >= self.limit {
            let left = self.window.saturating_sub(now.duration_since(window.opened_at));
            warn!(
                "Rate limit hit on {} for {} ({} requests)",
                self.scope, client, window.hits
            );
            return Some(left.as_secs().max(1));
        }

        WINDOWS
            .insert(
                key,
                Window {
                    hits: window.hits + 1,
                    ..window
                },
            )
            .await;
        None
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            policy: Rc::new(self.clone()),
        }))
    }
}

pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    policy: Rc<RateLimit>,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    actix_service::forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let policy = self.policy.clone();

        Box::pin(async move {
            let client = Client::from_request(&req);

            if let Some(retry_after) = policy.hit(&client).await {
                let mut response = create_error_response(
                    StatusCode::TOO_MANY_REQUESTS,
                    ErrorCode::RateLimitExceeded,
                    "Too many attempts. Please wait a moment and try again.",
                );
                if let Ok(value) = retry_after.to_string().parse() {
                    response
                        .headers_mut()
                        .insert(actix_web::http::header::RETRY_AFTER, value);
                }
                return Ok(req.into_response(response).map_into_right_body());
            }

            Ok(service.call(req).await?.map_into_left_body())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_presets() {
        let login = RateLimit::login();
        assert_eq!((login.scope, login.limit), ("login", 5));
        let signup = RateLimit::signup();
        assert_eq!((signup.scope, signup.limit), ("signup", 3));
        assert_eq!(signup.window, Duration::from_secs(60));
    }

    #[test]
    fn test_client_from_forwarded_header() {
        let req = TestRequest::default()
            .insert_header(("X-Forwarded-For", "203.0.113.7, 10.0.0.1"))
            .to_srv_request();
        assert_eq!(
            Client::from_request(&req),
            Client::Address("203.0.113.7".to_string())
        );
    }

    #[test]
    fn test_strip_port() {
        assert_eq!(strip_port("127.0.0.1:40000"), "127.0.0.1");
        assert_eq!(strip_port("::1"), "::1");
        assert_eq!(strip_port("garbage"), "garbage");
    }

    #[actix_web::test]
    async fn test_limit_reached_within_window() {
        let policy = RateLimit::new("unit-test", 2, Duration::from_secs(60));
        let client = Client::Address("198.51.100.20".to_string());

        assert!(policy.hit(&client).await.is_none());
        assert!(policy.hit(&client).await.is_none());
        let retry = policy.hit(&client).await;
        assert!(matches!(retry, Some(secs) if (1..=60).contains(&secs)));
    }
}
