use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{error::AppError, state::AppState};

/// Entries evicted when the map grows past this many keys.
const EVICTION_SCAN_THRESHOLD: usize = 1024;

/// A fixed-window counter over an in-process map. Explicitly
/// single-instance and non-persistent; the store is injected so call
/// sites don't change if it is ever swapped for a shared one.
#[derive(Clone)]
pub struct RateLimitStore {
    windows: Arc<Mutex<HashMap<String, Window>>>,
    limit: u32,
    window: Duration,
}

struct Window {
    count: u32,
    reset_at: Instant,
}

impl RateLimitStore {
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            windows: Arc::new(Mutex::new(HashMap::new())),
            limit,
            window,
        }
    }

    /// Records one attempt for `key`. Returns the seconds until the
    /// window resets when the limit is exceeded.
    pub fn check(&self, key: &str) -> Result<(), u64> {
        let now = Instant::now();
        let mut windows = self.windows.lock().unwrap_or_else(|e| e.into_inner());

        // Expired windows are dropped lazily once the map grows.
        if windows.len() > EVICTION_SCAN_THRESHOLD {
            windows.retain(|_, w| w.reset_at > now);
        }

        let entry = windows.entry(key.to_string()).or_insert(Window {
            count: 0,
            reset_at: now + self.window,
        });

        if entry.reset_at <= now {
            entry.count = 0;
            entry.reset_at = now + self.window;
        }

        if entry.count >= self.limit {
            return Err(entry.reset_at.duration_since(now).as_secs());
        }

        entry.count += 1;
        Ok(())
    }
}

/// Extracts the client IP from the request extensions.
fn extract_real_ip(req: &Request<Body>) -> String {
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ci| ci.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Middleware limiting login attempts per client IP.
pub async fn rate_limit_login(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let ip = extract_real_ip(&req);

    if let Err(retry_secs) = state.login_limiter.check(&ip) {
        return AppError::RateLimitExceeded(format!(
            "Too many login attempts. Try again in {} minutes",
            retry_secs.div_ceil(60).max(1)
        ))
        .into_response();
    }

    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allows_up_to_the_limit_then_rejects() {
        let store = RateLimitStore::new(3, Duration::from_secs(60));
        assert!(store.check("1.2.3.4").is_ok());
        assert!(store.check("1.2.3.4").is_ok());
        assert!(store.check("1.2.3.4").is_ok());
        assert!(store.check("1.2.3.4").is_err());
        // Other keys have their own window.
        assert!(store.check("5.6.7.8").is_ok());
    }

    #[test]
    fn window_expiry_resets_the_count() {
        let store = RateLimitStore::new(1, Duration::from_millis(20));
        assert!(store.check("1.2.3.4").is_ok());
        assert!(store.check("1.2.3.4").is_err());
        std::thread::sleep(Duration::from_millis(30));
        assert!(store.check("1.2.3.4").is_ok());
    }

    #[test]
    fn rejection_reports_time_until_reset() {
        let store = RateLimitStore::new(1, Duration::from_secs(600));
        assert!(store.check("k").is_ok());
        let retry = store.check("k").unwrap_err();
        assert!(retry > 0 && retry <= 600);
    }
}
