use axum::{
    extract::{ConnectInfo, Request},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::config;

/// Returned when a client has used up its quota for the current window
#[derive(Debug, Clone, thiserror::Error)]
#[error("Rate limit exceeded. Try again in {} seconds.", .retry_after.as_secs())]
pub struct RateLimitExceeded {
    pub retry_after: Duration,
}

/// Simple in-memory rate limiter
/// Tracks requests per client address with a fixed window that opens on the
/// first request from that address
#[derive(Clone)]
pub struct RateLimiter {
    // Map of client key -> (request_count, window_start)
    state: Arc<Mutex<HashMap<String, (u32, Instant)>>>,
    max_requests: u32,
    window_duration: Duration,
    trust_forwarded_for: bool,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window_seconds: u64) -> Self {
        Self {
            state: Arc::new(Mutex::new(HashMap::new())),
            max_requests,
            window_duration: Duration::from_secs(window_seconds),
            trust_forwarded_for: false,
        }
    }

    pub fn from_settings(settings: &config::RateLimit) -> Self {
        Self::new(settings.max_requests, settings.window_secs)
            .trust_forwarded_for(settings.trust_forwarded_for)
    }

    /// Key clients by the first `X-Forwarded-For` entry instead of the peer address
    pub fn trust_forwarded_for(mut self, trust: bool) -> Self {
        self.trust_forwarded_for = trust;
        self
    }

    /// Check if a request should be allowed
    pub fn check_rate_limit(&self, key: &str) -> Result<(), RateLimitExceeded> {
        self.check_rate_limit_at(key, Instant::now())
    }

    fn check_rate_limit_at(&self, key: &str, now: Instant) -> Result<(), RateLimitExceeded> {
        let mut state = self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        // Clean up old entries once the table gets large
        if state.len() > 10000 {
            let stale_after = self.window_duration.saturating_mul(2);
            state.retain(|_, (_, start)| now.saturating_duration_since(*start) < stale_after);
        }

        match state.get_mut(key) {
            Some((count, window_start)) => {
                let elapsed = now.saturating_duration_since(*window_start);
                // Check if we're still in the same window
                if elapsed < self.window_duration {
                    if *count >= self.max_requests {
                        return Err(RateLimitExceeded {
                            retry_after: self.window_duration - elapsed,
                        });
                    }
                    *count += 1;
                } else {
                    // New window
                    *window_start = now;
                    *count = 1;
                }
            }
            None => {
                state.insert(key.to_string(), (1, now));
            }
        }

        Ok(())
    }

    /// Derive the rate limit key for a request
    fn client_key(&self, request: &Request) -> String {
        if self.trust_forwarded_for {
            let forwarded = request
                .headers()
                .get("X-Forwarded-For")
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
}

/// Middleware applying the per-client rate limit to the routes it wraps
pub async fn rate_limit_middleware(
    axum::Extension(limiter): axum::Extension<RateLimiter>,
    request: Request,
    next: Next,
) -> Response {
    let key = limiter.client_key(&request);

    if let Err(exceeded) = limiter.check_rate_limit(&key) {
        tracing::debug!("Rejecting request from {}: {}", key, exceeded);
        // Round up so clients never retry before the window reopens
        let retry_after = exceeded.retry_after.as_secs() + u64::from(exceeded.retry_after.subsec_nanos() > 0);
        return (
            StatusCode::TOO_MANY_REQUESTS,
            [(header::RETRY_AFTER, retry_after.to_string())],
            "Too Many Requests",
        )
            .into_response();
    }

    next.run(request).await
}
