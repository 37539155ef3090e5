//! Rate limiting middleware
//!
//! Token bucket limiter in front of every route so a misbehaving caller
//! cannot burn through the broker's API limits. Auth endpoints (login,
//! refresh, logout) get a tighter allowance than the read endpoints.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Json, Response};
use parking_lot::Mutex;
use serde_json::json;

/// Requests per second for quote/options endpoints.
pub const DEFAULT_GENERAL_RATE: u32 = 50;
/// Requests per second for login/refresh/logout.
pub const DEFAULT_AUTH_RATE: u32 = 5;

/// Endpoint category for rate limiting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RateLimitCategory {
    /// Login, token refresh, logout
    Auth,
    /// Everything else
    General,
}

/// Token bucket: `rate` tokens replenished per second, consumed one per
/// request.
#[derive(Debug)]
struct TokenBucket {
    capacity: u32,
    tokens: f64,
    refill_rate: f64,
    last_refill: Instant,
}

impl TokenBucket {
    fn new(rate_per_second: u32) -> Self {
        Self {
            capacity: rate_per_second,
            tokens: f64::from(rate_per_second),
            refill_rate: f64::from(rate_per_second),
            last_refill: Instant::now(),
        }
    }

    fn try_acquire(&mut self) -> bool {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_refill);
        self.tokens =
            (self.tokens + elapsed.as_secs_f64() * self.refill_rate).min(f64::from(self.capacity));
        self.last_refill = now;

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    fn time_until_available(&self) -> Duration {
        if self.tokens >= 1.0 {
            Duration::ZERO
        } else {
            Duration::from_secs_f64((1.0 - self.tokens) / self.refill_rate)
        }
    }
}

/// Shared rate limiter state
#[derive(Debug)]
pub struct RateLimiterState {
    buckets: Mutex<HashMap<RateLimitCategory, TokenBucket>>,
}

impl RateLimiterState {
    pub fn new(general_rate: u32, auth_rate: u32) -> Self {
        let mut buckets = HashMap::new();
        buckets.insert(RateLimitCategory::General, TokenBucket::new(general_rate));
        buckets.insert(RateLimitCategory::Auth, TokenBucket::new(auth_rate));

        Self {
            buckets: Mutex::new(buckets),
        }
    }

    pub fn try_acquire(&self, category: RateLimitCategory) -> bool {
        let mut buckets = self.buckets.lock();
        match buckets.get_mut(&category) {
            Some(bucket) => bucket.try_acquire(),
            None => true,
        }
    }

    pub fn time_until_available(&self, category: RateLimitCategory) -> Duration {
        let buckets = self.buckets.lock();
        match buckets.get(&category) {
            Some(bucket) => bucket.time_until_available(),
            None => Duration::ZERO,
        }
    }
}

impl Default for RateLimiterState {
    fn default() -> Self {
        Self::new(DEFAULT_GENERAL_RATE, DEFAULT_AUTH_RATE)
    }
}

/// Categorize a request path
pub fn categorize(path: &str) -> RateLimitCategory {
    if path.starts_with("/api/auth")
        || path == "/api/refresh-token"
        || path == "/api/logout"
    {
        RateLimitCategory::Auth
    } else {
        RateLimitCategory::General
    }
}

/// Rate limiting middleware
pub async fn rate_limit_middleware(
    State(state): State<Arc<RateLimiterState>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let category = categorize(&path);

    if !state.try_acquire(category) {
        let wait_time = state.time_until_available(category);
        tracing::warn!(
            "Rate limit exceeded for {:?}, path: {}, retry after {}ms",
            category,
            path,
            wait_time.as_millis()
        );
        return rate_limit_response(wait_time);
    }

    next.run(request).await
}

fn rate_limit_response(retry_after: Duration) -> Response {
    let retry_seconds = retry_after.as_secs_f64().ceil() as u64;

    let body = Json(json!({
        "success": false,
        "message": format!("Rate limit exceeded. Please retry after {} seconds.", retry_seconds),
        "errorCode": "RATE_LIMITED",
    }));

    let mut response = (StatusCode::TOO_MANY_REQUESTS, body).into_response();

    if let Ok(value) = retry_seconds.to_string().parse() {
        response.headers_mut().insert("Retry-After", value);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_bucket_exhausts_capacity() {
        let mut bucket = TokenBucket::new(10);

        for _ in 0..10 {
            assert!(bucket.try_acquire());
        }

        assert!(!bucket.try_acquire());
    }

    #[test]
    fn test_token_bucket_refills_over_time() {
        let mut bucket = TokenBucket::new(100);

        for _ in 0..100 {
            bucket.try_acquire();
        }
        assert!(!bucket.try_acquire());

        // Force a 100ms refill window
        bucket.last_refill = Instant::now() - Duration::from_millis(100);

        for _ in 0..10 {
            assert!(bucket.try_acquire());
        }
    }

    #[test]
    fn test_path_categorization() {
        assert_eq!(categorize("/api/auth/angel-one"), RateLimitCategory::Auth);
        assert_eq!(categorize("/api/refresh-token"), RateLimitCategory::Auth);
        assert_eq!(categorize("/api/logout"), RateLimitCategory::Auth);
        assert_eq!(categorize("/api/ltp"), RateLimitCategory::General);
        assert_eq!(categorize("/api/options/NIFTY"), RateLimitCategory::General);
        assert_eq!(categorize("/api/health"), RateLimitCategory::General);
    }

    #[test]
    fn test_limiter_state_tracks_categories_independently() {
        let state = RateLimiterState::new(50, 1);

        assert!(state.try_acquire(RateLimitCategory::Auth));
        assert!(!state.try_acquire(RateLimitCategory::Auth));
        assert!(state.try_acquire(RateLimitCategory::General));
    }
}
