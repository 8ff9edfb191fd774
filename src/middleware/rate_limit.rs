use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::{Arc, OnceLock};

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{header::RETRY_AFTER, HeaderName, HeaderValue, Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use parking_lot::Mutex;

use crate::response::json_error;

const RATE_LIMIT_LIMIT: HeaderName = HeaderName::from_static("ratelimit-limit");
const RATE_LIMIT_REMAINING: HeaderName = HeaderName::from_static("ratelimit-remaining");
const RATE_LIMIT_RESET: HeaderName = HeaderName::from_static("ratelimit-reset");

const API_WINDOW_MS: u64 = 15 * 60 * 1000;
const API_MAX: u64 = 500;

const AUTH_WINDOW_MS: u64 = 5 * 60 * 1000;
const AUTH_MAX: u64 = 30;

static API_LIMITER: OnceLock<Arc<RateLimiter>> = OnceLock::new();
static AUTH_LIMITER: OnceLock<Arc<RateLimiter>> = OnceLock::new();

pub async fn api_rate_limit_middleware(req: Request<Body>, next: Next) -> Response {
    let path = req.uri().path();
    let is_api = path == "/api" || path.starts_with("/api/");
    if !is_api || should_bypass(&req) {
        return next.run(req).await;
    }

    let limiter = API_LIMITER.get_or_init(|| {
        Arc::new(RateLimiter::new(
            env_u64("RATE_LIMIT_WINDOW_MS").unwrap_or(API_WINDOW_MS),
            env_u64("RATE_LIMIT_MAX").unwrap_or(API_MAX),
        ))
    });
    enforce(
        limiter,
        Scope::Api,
        req,
        next,
        "TOO_MANY_REQUESTS",
        "too many requests, try again later",
    )
    .await
}

pub async fn auth_rate_limit_middleware(req: Request<Body>, next: Next) -> Response {
    if !req.uri().path().starts_with("/api/auth") || should_bypass(&req) {
        return next.run(req).await;
    }

    let limiter =
        AUTH_LIMITER.get_or_init(|| Arc::new(RateLimiter::new(AUTH_WINDOW_MS, AUTH_MAX)));
    enforce(
        limiter,
        Scope::Auth,
        req,
        next,
        "TOO_MANY_AUTH_REQUESTS",
        "too many authentication attempts, try again later",
    )
    .await
}

async fn enforce(
    limiter: &Arc<RateLimiter>,
    scope: Scope,
    req: Request<Body>,
    next: Next,
    code: &'static str,
    message: &'static str,
) -> Response {
    let ip = client_ip(&req).unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));
    let check = limiter.check(Key { scope, ip });

    if !check.allowed {
        let mut res =
            json_error(StatusCode::TOO_MANY_REQUESTS, code, message).into_response();
        apply_headers(&mut res, check);
        return res;
    }

    let mut res = next.run(req).await;
    apply_headers(&mut res, check);
    res
}

fn apply_headers(res: &mut Response, check: RateLimitCheck) {
    if let Ok(value) = HeaderValue::from_str(&check.limit.to_string()) {
        res.headers_mut().insert(RATE_LIMIT_LIMIT, value);
    }
    if let Ok(value) = HeaderValue::from_str(&check.remaining.to_string()) {
        res.headers_mut().insert(RATE_LIMIT_REMAINING, value);
    }
    if let Ok(value) = HeaderValue::from_str(&check.reset_after_seconds.to_string()) {
        res.headers_mut().insert(RATE_LIMIT_RESET, value.clone());
        if check.remaining == 0 {
            res.headers_mut().insert(RETRY_AFTER, value);
        }
    }
}

fn should_bypass(req: &Request<Body>) -> bool {
    let is_test = matches!(std::env::var("NODE_ENV").ok().as_deref(), Some("test"));
    is_test
        || client_ip(req)
            .map(|ip| ip.is_loopback())
            .unwrap_or(false)
}

fn env_u64(key: &str) -> Option<u64> {
    std::env::var(key).ok()?.trim().parse::<u64>().ok()
}

fn client_ip(req: &Request<Body>) -> Option<IpAddr> {
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Scope {
    Api,
    Auth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Key {
    scope: Scope,
    ip: IpAddr,
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    window_start_ms: u64,
    hits: u64,
}

#[derive(Debug, Clone, Copy)]
struct RateLimitCheck {
    allowed: bool,
    limit: u64,
    remaining: u64,
    reset_after_seconds: u64,
}

/// Fixed-window counter per (scope, client ip). Stale windows are swept on
/// the same cadence as the window length.
struct RateLimiter {
    window_ms: u64,
    max: u64,
    state: Mutex<LimiterState>,
}

struct LimiterState {
    entries: HashMap<Key, Entry>,
    last_cleanup_ms: u64,
}

impl RateLimiter {
    fn new(window_ms: u64, max: u64) -> Self {
        Self {
            window_ms,
            max,
            state: Mutex::new(LimiterState {
                entries: HashMap::new(),
                last_cleanup_ms: now_ms(),
            }),
        }
    }

    fn check(&self, key: Key) -> RateLimitCheck {
        let now_ms = now_ms();
        let mut state = self.state.lock();

        if now_ms.saturating_sub(state.last_cleanup_ms) >= self.window_ms {
            let window_ms = self.window_ms;
            state
                .entries
                .retain(|_, entry| now_ms.saturating_sub(entry.window_start_ms) < window_ms);
            state.last_cleanup_ms = now_ms;
        }

        let entry = state.entries.entry(key).or_insert(Entry {
            window_start_ms: now_ms,
            hits: 0,
        });

        if now_ms.saturating_sub(entry.window_start_ms) >= self.window_ms {
            entry.window_start_ms = now_ms;
            entry.hits = 0;
        }

        entry.hits = entry.hits.saturating_add(1);
        let allowed = entry.hits <= self.max;
        let remaining = self.max.saturating_sub(entry.hits);
        let reset_after_ms = self
            .window_ms
            .saturating_sub(now_ms.saturating_sub(entry.window_start_ms));

        RateLimitCheck {
            allowed,
            limit: self.max,
            remaining: if allowed { remaining } else { 0 },
            reset_after_seconds: reset_after_ms.div_ceil(1000),
        }
    }
}

fn now_ms() -> u64 {
    chrono::Utc::now().timestamp_millis().max(0) as u64
}
