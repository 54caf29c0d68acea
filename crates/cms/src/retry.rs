// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Bounded retry with a constant delay, shared by every store binding.

use backon::{ConstantBuilder, Retryable};
use diagnostics::*;
use std::fmt::Display;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: usize,
    pub backoff: Duration,
}

/// The final result of a retried operation and how many attempts it took.
#[derive(Debug)]
pub struct Attempted<T, E> {
    pub result: Result<T, E>,
    pub attempts: usize,
}

impl RetryPolicy {
    #[must_use]
    pub fn new(max_attempts: usize, backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    /// Run `op` until it succeeds, fails with an error `retryable` rejects,
    /// or the attempt budget is spent.
    pub async fn run<T, E, F, Fut, P>(&self, mut op: F, retryable: P) -> Attempted<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        P: Fn(&E) -> bool,
        E: Display,
    {
        let attempts = AtomicUsize::new(0);
        let counter = &attempts;
        let backoff = ConstantBuilder::default()
            .with_delay(self.backoff)
            .with_max_times(self.max_attempts - 1);

        let result = (move || {
            counter.fetch_add(1, Ordering::SeqCst);
            op()
        })
        .retry(backoff)
        .sleep(tokio::time::sleep)
        .when(retryable)
        .notify(|err, delay| {
            let reason = err.to_string();
            warn!(
                "attempt {attempt} failed: {reason}; retrying in {delay_ms}ms",
                attempt: counter.load(Ordering::SeqCst),
                reason: reason.as_str(),
                delay_ms: delay.as_millis() as u64
            );
        })
        .await;

        Attempted {
            result,
            attempts: attempts.load(Ordering::SeqCst),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> RetryPolicy {
        RetryPolicy::new(3, Duration::from_millis(2000))
    }

    #[tokio::test(start_paused = true)]
    async fn retries_until_success() {
        let calls = AtomicUsize::new(0);
        let calls = &calls;
        let start = tokio::time::Instant::now();
        let outcome = policy()
            .run(
                move || async move {
                    match calls.fetch_add(1, Ordering::SeqCst) {
                        0 | 1 => Err("does not match"),
                        _ => Ok(7),
                    }
                },
                |_| true,
            )
            .await;
        assert_eq!(outcome.result, Ok(7));
        assert_eq!(outcome.attempts, 3);
        assert!(start.elapsed() >= Duration::from_millis(4000));
    }

    #[tokio::test(start_paused = true)]
    async fn stops_after_budget() {
        let outcome: Attempted<(), &str> = policy().run(|| async { Err("conflict") }, |_| true).await;
        assert_eq!(outcome.result, Err("conflict"));
        assert_eq!(outcome.attempts, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn non_retryable_errors_fail_fast() {
        let outcome: Attempted<(), &str> = policy()
            .run(|| async { Err("unauthorized") }, |err| *err == "conflict")
            .await;
        assert_eq!(outcome.attempts, 1);
        tokio_test::assert_err!(outcome.result);
    }

    #[tokio::test]
    async fn single_attempt_policy_never_sleeps() {
        let outcome: Attempted<(), &str> = RetryPolicy::new(0, Duration::from_secs(60))
            .run(|| async { Err("conflict") }, |_| true)
            .await;
        assert_eq!(outcome.attempts, 1);
    }
}
