//! Retry loop for oracle calls, with exponential backoff.

use std::time::Duration;

use fidelity_core::config::RetryConfig;
use fidelity_core::OracleOutcome;

/// Why an oracle call finally gave up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CallFailure {
    /// Every attempt failed transiently.
    Transient { reason: String },
    /// The oracle rejected the call outright.
    Permanent { reason: String },
}

impl CallFailure {
    pub(crate) fn reason(&self) -> &str {
        match self {
            Self::Transient { reason } | Self::Permanent { reason } => reason,
        }
    }

    pub(crate) fn is_transient(&self) -> bool {
        matches!(self, Self::Transient { .. })
    }
}

/// Attempt counters for one call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Attempts {
    pub(crate) calls: u32,
    pub(crate) retries: u32,
}

/// Run `call` until it succeeds, fails permanently, or exhausts
/// `policy.max_retries` extra attempts. Backoff doubles from
/// `initial_backoff` up to `max_backoff`.
pub(crate) fn call_with_retry<T>(
    policy: &RetryConfig,
    what: &str,
    attempts: &mut Attempts,
    mut call: impl FnMut() -> OracleOutcome<T>,
) -> Result<T, CallFailure> {
    let mut backoff = policy.initial_backoff();
    let mut last_err = String::new();

    for attempt in 0..=policy.max_retries {
        if attempt > 0 {
            tracing::debug!(
                "oracle {what}: retry attempt {}/{} after {:?}",
                attempt,
                policy.max_retries,
                backoff
            );
            attempts.retries += 1;
            if !backoff.is_zero() {
                std::thread::sleep(backoff);
            }
            backoff = next_backoff(backoff, policy.max_backoff());
        }

        attempts.calls += 1;
        match call() {
            OracleOutcome::Success(value) => return Ok(value),
            OracleOutcome::PermanentFailure(reason) => {
                tracing::warn!("oracle {what}: permanent failure: {reason}");
                return Err(CallFailure::Permanent { reason });
            }
            OracleOutcome::TransientFailure(reason) => {
                tracing::debug!("oracle {what}: transient failure: {reason}");
                last_err = reason;
            }
        }
    }

    tracing::warn!(
        "oracle {what}: all {} retries exhausted: {last_err}",
        policy.max_retries
    );
    Err(CallFailure::Transient {
        reason: format!(
            "all {} retries exhausted: {last_err}",
            policy.max_retries
        ),
    })
}

fn next_backoff(current: Duration, max: Duration) -> Duration {
    current.saturating_mul(2).min(max)
}
