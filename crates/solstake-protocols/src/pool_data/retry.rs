use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Fixed-delay retry settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    pub fn from_env() -> Self {
        Self::new(
            solstake_lib::env::pool_data::max_retries(),
            solstake_lib::env::pool_data::retry_delay(),
        )
    }

    /// Zero attempts still runs the operation once.
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(1))
    }
}

/// Runs `op` until it succeeds or the policy's attempts are used up,
/// sleeping `policy.delay` between attempts. Returns the last error.
pub async fn retry<T, E, F, Fut>(policy: &RetryPolicy, operation: &str, mut op: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let attempts = policy.attempts();
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < attempts => {
                warn!(
                    operation,
                    attempt,
                    max_attempts = attempts,
                    error = %e,
                    "Attempt failed, retrying in {:?}",
                    policy.delay
                );
                tokio::time::sleep(policy.delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::new(max_attempts, Duration::ZERO)
    }

    #[tokio::test]
    async fn succeeds_after_transient_failures() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result = retry(&fast(3), "flaky", move || async move {
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            if n < 3 {
                Err(format!("failure {n}"))
            } else {
                Ok(n)
            }
        })
        .await;

        assert_eq!(result, Ok(3));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn returns_last_error_when_exhausted() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result: Result<(), String> = retry(&fast(2), "broken", move || async move {
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            Err(format!("failure {n}"))
        })
        .await;

        assert_eq!(result, Err("failure 2".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn zero_attempts_runs_once() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let _: Result<(), &str> = retry(&fast(0), "once", move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err("nope")
        })
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
