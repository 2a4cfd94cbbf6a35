//! Fixed-interval retry gate.

use std::future::Future;
use std::time::Duration;

use anyhow::Result;
use tracing::debug;

use crate::error::Error;

/// Attempt budget for a retried operation: up to `max_attempts` tries with a
/// fixed `delay` between consecutive attempts.
///
/// This is an attempt-count budget, not a wall-clock deadline; an individual
/// attempt that blocks for longer than `delay` stretches the total elapsed
/// time accordingly.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum number of attempts before giving up.
    pub max_attempts: u32,
    /// Sleep between consecutive attempts.
    pub delay: Duration,
}

impl RetryPolicy {
    /// Create a policy from an attempt count and a fixed delay.
    #[must_use]
    pub const fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }
}

/// Call `op` until it succeeds or the attempt budget is exhausted.
///
/// Returns the first success immediately and sleeps `policy.delay` between
/// consecutive attempts (n-1 sleeps for n attempts). The operation must be
/// idempotent: a failed attempt may have had partial side effects.
///
/// # Errors
///
/// Returns [`Error::RetryExhausted`] wrapping the last underlying failure
/// once all attempts are spent.
pub async fn retry<T, F, Fut>(waited_for: &str, policy: RetryPolicy, mut op: F) -> Result<T, Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut last_error = None;

    for attempt in 1..=policy.max_attempts {
        if attempt > 1 {
            tokio::time::sleep(policy.delay).await;
        }
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                debug!(
                    attempt,
                    max = policy.max_attempts,
                    error = %e,
                    "Attempt failed while waiting for {waited_for}"
                );
                last_error = Some(e);
            }
        }
    }

    Err(Error::RetryExhausted {
        waited_for: waited_for.to_string(),
        attempts: policy.max_attempts,
        source: last_error.unwrap_or_else(|| anyhow::anyhow!("no attempts were made")),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    #[tokio::test]
    async fn returns_first_success_without_further_calls() {
        let calls = AtomicU32::new(0);
        let result = retry("test operation", RetryPolicy::new(5, Duration::ZERO), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, anyhow::Error>(42) }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_until_success() {
        let calls = AtomicU32::new(0);
        let result = retry("flaky operation", RetryPolicy::new(5, Duration::ZERO), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    anyhow::bail!("not yet");
                }
                Ok(7)
            }
        })
        .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn exhaustion_calls_at_most_max_attempts() {
        let calls = AtomicU32::new(0);
        let err = retry("doomed operation", RetryPolicy::new(4, Duration::ZERO), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err::<(), _>(anyhow::anyhow!("boom")) }
        })
        .await
        .unwrap_err();

        assert_eq!(calls.load(Ordering::SeqCst), 4);
        match err {
            Error::RetryExhausted {
                attempts,
                ref waited_for,
                ..
            } => {
                assert_eq!(attempts, 4);
                assert_eq!(waited_for, "doomed operation");
            }
            ref other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn sleeps_between_attempts_only() {
        let start = tokio::time::Instant::now();
        let _ = retry(
            "never succeeds",
            RetryPolicy::new(3, Duration::from_secs(2)),
            || async { Err::<(), _>(anyhow::anyhow!("down")) },
        )
        .await;

        // 3 attempts -> 2 sleeps; no delay before the first or after the last.
        assert_eq!(start.elapsed(), Duration::from_secs(4));
    }
}
