use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderName, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tokio::sync::Mutex;

use crate::error::ApiError;
use crate::state::AppState;

const RATE_LIMITED_MESSAGE: &str = "Too many authentication attempts, please try again later";

// Expired windows are swept once the table grows past this many keys, at
// most once per window
const PRUNE_THRESHOLD: usize = 1024;

// Clients first seen while the table is full share one bucket
const MAX_TRACKED_KEYS: usize = 16 * 1024;
const OVERFLOW_KEY: &str = "overflow";

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

#[derive(Debug)]
struct Windows {
    entries: HashMap<String, Window>,
    last_sweep: Instant,
    sweeps: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allowed { remaining: u32 },
    Limited { retry_after: Duration },
}

/// Fixed-window request counter keyed by client
#[derive(Debug)]
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    windows: Mutex<Windows>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            windows: Mutex::new(Windows {
                entries: HashMap::new(),
                last_sweep: Instant::now(),
                sweeps: 0,
            }),
        }
    }

    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    /// Count one request for `key`
    pub async fn check(&self, key: &str) -> RateDecision {
        self.check_at(key, Instant::now()).await
    }

    async fn check_at(&self, key: &str, now: Instant) -> RateDecision {
        let mut windows = self.windows.lock().await;
        let window = self.window;

        if windows.entries.len() >= PRUNE_THRESHOLD
            && now.saturating_duration_since(windows.last_sweep) >= window
        {
            windows.entries.retain(|_, w| now.saturating_duration_since(w.started) < window);
            windows.last_sweep = now;
            windows.sweeps += 1;
        }

        let key = if windows.entries.len() >= MAX_TRACKED_KEYS && !windows.entries.contains_key(key) {
            OVERFLOW_KEY
        } else {
            key
        };

        let entry = windows.entries.entry(key.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });

        if now.saturating_duration_since(entry.started) >= window {
            *entry = Window {
                started: now,
                count: 0,
            };
        }

        if entry.count >= self.max_requests {
            let elapsed = now.saturating_duration_since(entry.started);
            return RateDecision::Limited {
                retry_after: window.saturating_sub(elapsed),
            };
        }

        entry.count += 1;
        RateDecision::Allowed {
            remaining: self.max_requests - entry.count,
        }
    }

    #[cfg(test)]
    async fn tracked_keys(&self) -> usize {
        self.windows.lock().await.entries.len()
    }

    #[cfg(test)]
    async fn sweeps(&self) -> u64 {
        self.windows.lock().await.sweeps
    }
}

/// Rate limiting middleware for the auth routes
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if !state.config.api.enable_rate_limiting {
        return next.run(request).await;
    }

    let key = client_key(&request, state.config.api.trust_proxy);
    let limiter = &state.auth_limiter;

    match limiter.check(&key).await {
        RateDecision::Allowed { remaining } => {
            let mut response = next.run(request).await;
            set_limit_headers(response.headers_mut(), limiter.max_requests(), remaining);
            response
        }
        RateDecision::Limited { retry_after } => {
            tracing::warn!("Rate limit exceeded for {} on {}", key, request.uri().path());
            // round up so clients never retry a moment too early
            let retry_secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
            let mut response = ApiError::too_many_requests(RATE_LIMITED_MESSAGE, retry_secs).into_response();
            set_limit_headers(response.headers_mut(), limiter.max_requests(), 0);
            response
        }
    }
}

fn set_limit_headers(headers: &mut HeaderMap, limit: u32, remaining: u32) {
    headers.insert(HeaderName::from_static("ratelimit-limit"), HeaderValue::from(limit));
    headers.insert(HeaderName::from_static("ratelimit-remaining"), HeaderValue::from(remaining));
}

/// Identify the caller: forwarded address when behind a trusted proxy, else the peer address
fn client_key(request: &Request, trust_proxy: bool) -> String {
    if trust_proxy {
        let forwarded = request
            .headers()
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty());

        if let Some(ip) = forwarded {
            return ip.to_string();
        }
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request as HttpRequest;

    const WINDOW: Duration = Duration::from_secs(900);

    #[tokio::test]
    async fn allows_up_to_the_cap_then_limits() {
        let limiter = RateLimiter::new(5, WINDOW);
        let now = Instant::now();

        for expected_remaining in (0..5).rev() {
            assert_eq!(
                limiter.check_at("1.2.3.4", now).await,
                RateDecision::Allowed {
                    remaining: expected_remaining
                }
            );
        }

        match limiter.check_at("1.2.3.4", now + Duration::from_secs(60)).await {
            RateDecision::Limited { retry_after } => assert_eq!(retry_after, Duration::from_secs(840)),
            other => panic!("expected limit, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn window_resets_after_it_elapses() {
        let limiter = RateLimiter::new(1, WINDOW);
        let now = Instant::now();

        assert!(matches!(limiter.check_at("k", now).await, RateDecision::Allowed { .. }));
        assert!(matches!(limiter.check_at("k", now).await, RateDecision::Limited { .. }));
        assert_eq!(
            limiter.check_at("k", now + WINDOW).await,
            RateDecision::Allowed { remaining: 0 }
        );
    }

    #[tokio::test]
    async fn keys_are_independent() {
        let limiter = RateLimiter::new(1, WINDOW);
        let now = Instant::now();

        assert!(matches!(limiter.check_at("a", now).await, RateDecision::Allowed { .. }));
        assert!(matches!(limiter.check_at("b", now).await, RateDecision::Allowed { .. }));
        assert!(matches!(limiter.check_at("a", now).await, RateDecision::Limited { .. }));
    }

    #[tokio::test]
    async fn prunes_expired_windows() {
        let limiter = RateLimiter::new(1, WINDOW);
        let now = Instant::now();

        for i in 0..PRUNE_THRESHOLD {
            limiter.check_at(&format!("client-{i}"), now).await;
        }
        assert_eq!(limiter.tracked_keys().await, PRUNE_THRESHOLD);

        limiter.check_at("late", now + WINDOW).await;
        assert_eq!(limiter.tracked_keys().await, 1);
        assert_eq!(limiter.sweeps().await, 1);
    }

    #[tokio::test]
    async fn live_keys_do_not_trigger_a_sweep_per_request() {
        let limiter = RateLimiter::new(1, WINDOW);
        let start = Instant::now() + WINDOW;

        for i in 0..PRUNE_THRESHOLD + 500 {
            limiter.check_at(&format!("client-{i}"), start).await;
        }
        // one sweep when the table first crossed the threshold, nothing expired
        assert_eq!(limiter.sweeps().await, 1);
        assert_eq!(limiter.tracked_keys().await, PRUNE_THRESHOLD + 500);

        for i in 0..100 {
            limiter
                .check_at(&format!("later-{i}"), start + Duration::from_secs(60))
                .await;
        }
        assert_eq!(limiter.sweeps().await, 1);

        limiter.check_at("next-window", start + WINDOW).await;
        assert_eq!(limiter.sweeps().await, 2);
    }

    #[tokio::test]
    async fn table_size_is_capped() {
        let limiter = RateLimiter::new(2, WINDOW);
        let now = Instant::now();

        for i in 0..MAX_TRACKED_KEYS {
            limiter.check_at(&format!("client-{i}"), now).await;
        }

        // newcomers share a single bucket once the table is full
        assert_eq!(
            limiter.check_at("newcomer-1", now).await,
            RateDecision::Allowed { remaining: 1 }
        );
        assert_eq!(
            limiter.check_at("newcomer-2", now).await,
            RateDecision::Allowed { remaining: 0 }
        );
        assert!(matches!(
            limiter.check_at("newcomer-3", now).await,
            RateDecision::Limited { .. }
        ));
        assert_eq!(limiter.tracked_keys().await, MAX_TRACKED_KEYS + 1);

        // already tracked clients keep their own window
        assert_eq!(
            limiter.check_at("client-0", now).await,
            RateDecision::Allowed { remaining: 0 }
        );
    }

    #[test]
    fn keys_on_forwarded_address_only_when_trusted() {
        let mut request = HttpRequest::builder()
            .header("x-forwarded-for", "203.0.113.9, 10.0.0.1")
            .body(Body::empty())
            .unwrap();

        assert_eq!(client_key(&request, true), "203.0.113.9");
        assert_eq!(client_key(&request, false), "unknown");

        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 4000))));
        assert_eq!(client_key(&request, false), "127.0.0.1");
    }
}
