use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

/// Bounded exponential backoff: after failed attempt `n` (0-based) wait `base_delay * 2^n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 150,
        }
    }
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            base_delay_ms: 0,
        }
    }

    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 1u64.checked_shl(attempt).unwrap_or(u64::MAX);
        Duration::from_millis(self.base_delay_ms.saturating_mul(factor))
    }

    /// Run `op` until it succeeds, fails with an error `retryable` rejects,
    /// or `max_retries` retries are spent. The last error is returned.
    pub async fn run<T, E, F, Fut, P>(&self, what: &str, mut op: F, retryable: P) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        P: Fn(&E) -> bool,
        E: Display,
    {
        let mut attempt = 0;
        loop {
            match op().await {
                Ok(value) => {
                    if attempt > 0 {
                        info!("{what} succeeded on attempt {}", attempt + 1);
                    }
                    return Ok(value);
                }
                Err(e) if attempt < self.max_retries && retryable(&e) => {
                    let delay = self.delay_for(attempt);
                    warn!(
                        "{what} attempt {} failed: {e}. Retrying in {}ms",
                        attempt + 1,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn delays_double() {
        let p = RetryPolicy::default();
        assert_eq!(p.delay_for(0), Duration::from_millis(150));
        assert_eq!(p.delay_for(1), Duration::from_millis(300));
        assert_eq!(p.delay_for(2), Duration::from_millis(600));
        assert_eq!(RetryPolicy::default().delay_for(200), Duration::from_millis(u64::MAX));
    }

    #[tokio::test(start_paused = true)]
    async fn retries_until_success() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let started = tokio::time::Instant::now();
        let result: Result<u32, String> = RetryPolicy::default()
            .run(
                "lookup",
                move || async move {
                    let n = calls.fetch_add(1, Ordering::SeqCst);
                    if n < 2 { Err("not yet".to_owned()) } else { Ok(n) }
                },
                |_| true,
            )
            .await;
        assert_eq!(result, Ok(2));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(started.elapsed() >= Duration::from_millis(150 + 300));
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_max_retries() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result: Result<(), String> = RetryPolicy::default()
            .run(
                "lookup",
                move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err("denied".to_owned())
                },
                |_| true,
            )
            .await;
        assert_eq!(result, Err("denied".to_owned()));
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn non_retryable_errors_return_immediately() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result: Result<(), String> = RetryPolicy::default()
            .run(
                "lookup",
                move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err("not found".to_owned())
                },
                |e| e.contains("denied"),
            )
            .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
