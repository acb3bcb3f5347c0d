use std::future::Future;
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;

use crate::error::Result;

/// How often the monitor re-checks the session's remaining lifetime.
pub const POLL_INTERVAL: Duration = Duration::from_secs(30);
/// Remaining lifetime at which the pre-expiry warning is raised.
pub const WARNING_THRESHOLD_SECS: i64 = 300;

/// The client-side collaborator driven by the monitor.
pub trait SessionSink: Send + 'static {
    /// Raises the persistent pre-expiry warning (refresh / dismiss).
    /// Called at most once per session instance.
    fn warn_expiring(&mut self, minutes_left: i64);

    /// Invalidates local session state at expiry.
    fn sign_out(&mut self) -> impl Future<Output = Result<()>> + Send;

    /// Sends the client to the login entry point with the distinct
    /// "session expired" notice. Runs even when `sign_out` failed: the
    /// monitor fails open toward re-authentication, never toward
    /// continued access.
    fn redirect_to_login(&mut self);
}

/// Watches a validated session's computed expiry and acts preemptively.
///
/// A cancellable scheduled task: started on login success, stopped on
/// logout or drop so no timer outlives the session it watches.
pub struct ExpiryMonitor {
    handle: JoinHandle<()>,
}

impl ExpiryMonitor {
    /// Starts watching a session that expires at `expires_at` (Unix
    /// seconds).
    pub fn start<S: SessionSink>(expires_at: i64, sink: S) -> Self {
        Self::start_with_clock(expires_at, sink, || Utc::now().timestamp(), POLL_INTERVAL)
    }

    /// Same as [`start`](Self::start) with an injected clock and poll
    /// interval.
    pub fn start_with_clock<S, F>(expires_at: i64, sink: S, now_fn: F, poll: Duration) -> Self
    where
        S: SessionSink,
        F: Fn() -> i64 + Send + 'static,
    {
        let handle = tokio::spawn(run(expires_at, sink, now_fn, poll));
        Self { handle }
    }

    /// Stops the polling task. Dropping the monitor has the same effect.
    pub fn stop(&self) {
        self.handle.abort();
    }
}

impl Drop for ExpiryMonitor {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn run<S, F>(expires_at: i64, mut sink: S, now_fn: F, poll: Duration)
where
    S: SessionSink,
    F: Fn() -> i64 + Send + 'static,
{
    let mut ticker = tokio::time::interval(poll);
    let mut warned = false;

    loop {
        // First tick completes immediately, so the session is checked
        // right away on start.
        ticker.tick().await;

        let time_left = expires_at - now_fn();

        if time_left <= 0 {
            tracing::info!("Session expired, forcing sign-out");
            if let Err(e) = sink.sign_out().await {
                tracing::warn!("Sign-out at expiry failed: {}", e);
            }
            sink.redirect_to_login();
            return;
        }

        if time_left <= WARNING_THRESHOLD_SECS && !warned {
            warned = true;
            let minutes_left = (time_left + 59) / 60;
            tracing::info!("Session expires in {} minute(s), warning", minutes_left);
            sink.warn_expiring(minutes_left);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Recorded {
        warnings: Vec<i64>,
        sign_outs: usize,
        redirects: usize,
    }

    /// A recording sink; `fail_sign_out` simulates the sign-out call
    /// itself failing.
    struct RecordingSink {
        recorded: Arc<Mutex<Recorded>>,
        fail_sign_out: bool,
    }

    impl SessionSink for RecordingSink {
        fn warn_expiring(&mut self, minutes_left: i64) {
            self.recorded.lock().unwrap().warnings.push(minutes_left);
        }

        fn sign_out(&mut self) -> impl Future<Output = Result<()>> + Send {
            let recorded = self.recorded.clone();
            let fail = self.fail_sign_out;
            async move {
                recorded.lock().unwrap().sign_outs += 1;
                if fail {
                    Err(crate::error::AppError::Internal("sign-out failed".to_string()))
                } else {
                    Ok(())
                }
            }
        }

        fn redirect_to_login(&mut self) {
            self.recorded.lock().unwrap().redirects += 1;
        }
    }

    /// Clock driven by tokio's paused test time.
    fn test_clock(base: i64) -> impl Fn() -> i64 + Send + 'static {
        let origin = tokio::time::Instant::now();
        move || base + origin.elapsed().as_secs() as i64
    }

    #[tokio::test(start_paused = true)]
    async fn warns_once_then_forces_sign_out_once() {
        let recorded = Arc::new(Mutex::new(Recorded::default()));
        let sink = RecordingSink {
            recorded: recorded.clone(),
            fail_sign_out: false,
        };

        // Expires in 200 s: already inside the 300 s warning window, so
        // the first poll warns and many later polls must not repeat it.
        let monitor =
            ExpiryMonitor::start_with_clock(1_200, sink, test_clock(1_000), Duration::from_secs(1));

        tokio::time::sleep(Duration::from_secs(300)).await;
        monitor.handle.abort();

        let recorded = recorded.lock().unwrap();
        assert_eq!(recorded.warnings.len(), 1);
        assert_eq!(recorded.warnings[0], 4); // 200 s left, rounded up
        assert_eq!(recorded.sign_outs, 1);
        assert_eq!(recorded.redirects, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn no_warning_outside_the_threshold_window() {
        let recorded = Arc::new(Mutex::new(Recorded::default()));
        let sink = RecordingSink {
            recorded: recorded.clone(),
            fail_sign_out: false,
        };

        // Expires in 1000 s; watch for 100 s only.
        let monitor =
            ExpiryMonitor::start_with_clock(2_000, sink, test_clock(1_000), Duration::from_secs(1));

        tokio::time::sleep(Duration::from_secs(100)).await;
        monitor.stop();
        tokio::time::sleep(Duration::from_secs(1)).await;

        let recorded = recorded.lock().unwrap();
        assert!(recorded.warnings.is_empty());
        assert_eq!(recorded.sign_outs, 0);
        assert_eq!(recorded.redirects, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn redirects_even_when_sign_out_fails() {
        let recorded = Arc::new(Mutex::new(Recorded::default()));
        let sink = RecordingSink {
            recorded: recorded.clone(),
            fail_sign_out: true,
        };

        let monitor =
            ExpiryMonitor::start_with_clock(1_010, sink, test_clock(1_000), Duration::from_secs(1));

        tokio::time::sleep(Duration::from_secs(30)).await;
        monitor.handle.abort();

        let recorded = recorded.lock().unwrap();
        assert_eq!(recorded.sign_outs, 1);
        assert_eq!(recorded.redirects, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_cancels_the_polling_task() {
        let recorded = Arc::new(Mutex::new(Recorded::default()));
        let sink = RecordingSink {
            recorded: recorded.clone(),
            fail_sign_out: false,
        };

        // Expires in 50 s, but stopped before the expiry crossing.
        let monitor =
            ExpiryMonitor::start_with_clock(1_050, sink, test_clock(1_000), Duration::from_secs(1));

        tokio::time::sleep(Duration::from_secs(10)).await;
        monitor.stop();
        tokio::time::sleep(Duration::from_secs(100)).await;

        let recorded = recorded.lock().unwrap();
        assert_eq!(recorded.sign_outs, 0);
        assert_eq!(recorded.redirects, 0);
    }
}
