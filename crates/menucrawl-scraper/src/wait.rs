//! Bounded polling waits.
//!
//! [`await_condition`] re-evaluates a check at a fixed interval until it
//! reports success or the deadline passes. The whole wait, including a check
//! that never resolves, is bounded by the policy timeout.

use std::future::Future;
use std::time::Duration;

use crate::driver::RenderSession;
use crate::error::{DriverError, WaitError};

/// How long a wait may run and how often it re-checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl WaitPolicy {
    #[must_use]
    pub fn new(timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            timeout,
            poll_interval,
        }
    }
}

/// Polls `check` until it returns `Ok(true)`.
///
/// Transient driver errors (see [`DriverError::is_transient`]) count as "not
/// yet" and polling continues. Any other driver error ends the wait.
///
/// # Errors
///
/// Returns [`WaitError::ElementNotFoundWithinTimeout`] naming `condition` if
/// the deadline passes first. If the last check before the deadline failed,
/// returns that failure as [`WaitError::Driver`] instead. A non-transient
/// failure is returned as [`WaitError::Driver`] at once.
pub async fn await_condition<F, Fut>(
    condition: &str,
    policy: WaitPolicy,
    mut check: F,
) -> Result<(), WaitError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool, DriverError>>,
{
    let mut last_error: Option<DriverError> = None;
    let poll = async {
        loop {
            match check().await {
                Ok(true) => return Ok(()),
                Ok(false) => last_error = None,
                Err(e) if e.is_transient() => {
                    tracing::debug!(condition, error = %e, "check failed, polling again");
                    last_error = Some(e);
                }
                Err(e) => return Err(WaitError::Driver(e)),
            }
            tokio::time::sleep(policy.poll_interval).await;
        }
    };

    let outcome = tokio::time::timeout(policy.timeout, poll).await;
    match outcome {
        Ok(result) => result,
        Err(_) => Err(match last_error {
            Some(e) => WaitError::Driver(e),
            None => WaitError::ElementNotFoundWithinTimeout {
                condition: condition.to_string(),
                timeout_ms: u64::try_from(policy.timeout.as_millis()).unwrap_or(u64::MAX),
            },
        }),
    }
}

/// Waits until at least one element matches `selector`.
///
/// # Errors
///
/// See [`await_condition`].
pub async fn wait_for_selector<S>(
    session: &S,
    selector: &str,
    policy: WaitPolicy,
) -> Result<(), WaitError>
where
    S: RenderSession + ?Sized,
{
    tracing::trace!(selector, timeout_ms = ?policy.timeout.as_millis(), "waiting for selector");
    await_condition(selector, policy, || async move {
        Ok::<_, DriverError>(session.count(selector).await? > 0)
    })
    .await
}
