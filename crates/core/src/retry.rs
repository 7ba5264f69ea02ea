use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};

use crate::errors::CoreError;

/// Delay schedule between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// Retry immediately.
    None,
    /// `attempt × step` (1s, 2s, 3s, ... for a 1s step).
    Linear { step: Duration },
    /// `base × 2^(attempt − 1)`, capped at `max`.
    Exponential { base: Duration, max: Duration },
}

impl Backoff {
    /// Delay to wait after the 1-based `attempt` has failed.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        match *self {
            Backoff::None => Duration::ZERO,
            Backoff::Linear { step } => step.saturating_mul(attempt),
            Backoff::Exponential { base, max } => {
                let factor = 1u32.checked_shl(attempt.saturating_sub(1)).unwrap_or(u32::MAX);
                base.saturating_mul(factor).min(max)
            }
        }
    }
}

/// Bounded retry: attempt cap plus backoff schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Backoff,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff: Backoff) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    /// Three attempts, 1s × attempt between them. Used for backend initialization.
    pub fn initialization() -> Self {
        Self::new(
            3,
            Backoff::Linear {
                step: Duration::from_millis(1000),
            },
        )
    }

    /// Three attempts, 2s × attempt between them. Used for asset fetches.
    pub fn fetch() -> Self {
        Self::new(
            3,
            Backoff::Linear {
                step: Duration::from_millis(2000),
            },
        )
    }

    /// Single attempt, no retry.
    pub fn once() -> Self {
        Self::new(1, Backoff::None)
    }
}

/// Abstraction over "wait for a duration" so retry timing can be observed in tests.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Production sleeper backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Shared flag that stops further attempts once set.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Progress report emitted before each attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptInfo {
    /// 1-based attempt number
    pub attempt: u32,
    pub max_attempts: u32,
}

/// Run `operation` under `policy`.
///
/// - `progress` is called before every attempt, including the first.
/// - The backoff delay is slept only between attempts, never before the first.
/// - Non-retryable errors are returned immediately.
/// - After the last attempt the last error is returned unchanged.
/// - `cancel` is checked before every attempt and every sleep.
pub async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    sleeper: &dyn Sleeper,
    cancel: &CancellationFlag,
    progress: &mut (dyn FnMut(AttemptInfo) + Send),
    mut operation: F,
) -> Result<T, CoreError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, CoreError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        if cancel.is_cancelled() {
            return Err(CoreError::Cancelled);
        }
        progress(AttemptInfo {
            attempt,
            max_attempts,
        });

        let err = match operation(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };

        if !err.is_retryable() {
            debug!("Attempt {attempt}/{max_attempts} failed with non-retryable error: {err}");
            return Err(err);
        }
        if attempt >= max_attempts {
            warn!("All {max_attempts} attempts failed, last error: {err}");
            return Err(err);
        }

        let delay = policy.backoff.delay_for(attempt);
        debug!("Attempt {attempt}/{max_attempts} failed: {err}; retrying in {delay:?}");

        if cancel.is_cancelled() {
            return Err(CoreError::Cancelled);
        }
        if !delay.is_zero() {
            sleeper.sleep(delay).await;
        }
        attempt += 1;
    }
}
