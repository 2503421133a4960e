//! Fixed-window request limits keyed by client IP

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use shared::error::{AppError, ErrorCode};
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::state::AppState;

/// Budget of one limited route
#[derive(Debug, Clone, Copy)]
pub struct Limit {
    pub route: &'static str,
    pub max_requests: u32,
    pub window: Duration,
}

/// 5 login attempts per minute per client
pub const LOGIN_LIMIT: Limit = Limit {
    route: "login",
    max_requests: 5,
    window: Duration::from_secs(60),
};

/// Windows idle longer than this are dropped by [`RateLimiter::cleanup`]
const STALE_AFTER: Duration = Duration::from_secs(300);

#[derive(Debug)]
struct Window {
    started: Instant,
    hits: u32,
}

#[derive(Clone, Default)]
pub struct RateLimiter {
    /// (route, client IP) -> current window
    windows: Arc<Mutex<HashMap<(&'static str, String), Window>>>,
    /// Key on `X-Forwarded-For`; only set behind a proxy that overwrites it
    trust_proxy: bool,
}

impl RateLimiter {
    pub fn new(trust_proxy: bool) -> Self {
        Self {
            trust_proxy,
            ..Self::default()
        }
    }

    /// Count one hit; `false` once the client is over budget for this window.
    pub async fn check(&self, limit: Limit, ip: &str) -> bool {
        let now = Instant::now();
        let mut windows = self.windows.lock().await;
        let window = windows
            .entry((limit.route, ip.to_owned()))
            .or_insert(Window {
                started: now,
                hits: 0,
            });

        if now.duration_since(window.started) >= limit.window {
            window.started = now;
            window.hits = 0;
        }
        window.hits += 1;
        window.hits <= limit.max_requests
    }

    pub async fn cleanup(&self) {
        let now = Instant::now();
        let mut windows = self.windows.lock().await;
        let before = windows.len();
        windows.retain(|_, w| now.duration_since(w.started) < STALE_AFTER);
        let dropped = before - windows.len();
        if dropped > 0 {
            tracing::debug!(dropped, "Rate limiter windows expired");
        }
    }

    #[cfg(test)]
    async fn tracked(&self) -> usize {
        self.windows.lock().await.len()
    }
}

/// Client IP: the peer address, or the first `X-Forwarded-For` entry when
/// the proxy in front is trusted.
fn client_ip(request: &Request, trust_proxy: bool) -> String {
    if trust_proxy {
        let forwarded = request
            .headers()
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|ip| !ip.is_empty());
        if let Some(ip) = forwarded {
            return ip.to_owned();
        }
    }

    request
        .extensions()
        .get::<ConnectInfo<std::net::SocketAddr>>()
        .map(|ci| ci.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_owned())
}

pub async fn login_rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, Response> {
    let ip = client_ip(&request, state.rate_limiter.trust_proxy);
    if !state.rate_limiter.check(LOGIN_LIMIT, &ip).await {
        tracing::warn!(ip = %ip, route = LOGIN_LIMIT.route, "Rate limit exceeded");
        return Err(AppError::with_message(
            ErrorCode::TooManyRequests,
            "Too many requests, try again later",
        )
        .into_response());
    }
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIGHT: Limit = Limit {
        route: "test",
        max_requests: 1,
        window: Duration::from_secs(60),
    };

    #[tokio::test]
    async fn test_login_budget_is_per_client_and_route() {
        let limiter = RateLimiter::new(false);
        for _ in 0..5 {
            assert!(limiter.check(LOGIN_LIMIT, "10.0.0.1").await);
        }
        assert!(!limiter.check(LOGIN_LIMIT, "10.0.0.1").await);
        assert!(limiter.check(LOGIN_LIMIT, "10.0.0.2").await);
        assert!(limiter.check(TIGHT, "10.0.0.1").await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_window_resets_and_cleanup_drops_stale_entries() {
        let limiter = RateLimiter::new(false);
        assert!(limiter.check(TIGHT, "10.0.0.1").await);
        assert!(!limiter.check(TIGHT, "10.0.0.1").await);

        tokio::time::advance(Duration::from_secs(61)).await;
        assert!(limiter.check(TIGHT, "10.0.0.1").await);
        assert_eq!(limiter.tracked().await, 1);

        tokio::time::advance(Duration::from_secs(301)).await;
        limiter.cleanup().await;
        assert_eq!(limiter.tracked().await, 0);
    }

    fn forwarded(value: &str) -> Request {
        let mut request = Request::builder()
            .header("x-forwarded-for", value)
            .body(axum::body::Body::empty())
            .unwrap();
        let peer: std::net::SocketAddr = ([198, 51, 100, 4], 40000).into();
        request.extensions_mut().insert(ConnectInfo(peer));
        request
    }

    #[test]
    fn test_client_ip_uses_forwarded_header_only_when_trusted() {
        let request = forwarded("203.0.113.7, 10.0.0.1");
        assert_eq!(client_ip(&request, true), "203.0.113.7");
        assert_eq!(client_ip(&request, false), "198.51.100.4");

        let request = Request::builder()
            .body(axum::body::Body::empty())
            .unwrap();
        assert_eq!(client_ip(&request, true), "unknown");
    }

    #[tokio::test]
    async fn test_rotating_forwarded_header_shares_the_peer_budget() {
        let limiter = RateLimiter::new(false);
        for n in 0..5 {
            let ip = client_ip(&forwarded(&format!("203.0.113.{n}")), limiter.trust_proxy);
            assert!(limiter.check(LOGIN_LIMIT, &ip).await);
        }
        let ip = client_ip(&forwarded("203.0.113.99"), limiter.trust_proxy);
        assert!(!limiter.check(LOGIN_LIMIT, &ip).await);
    }
}
