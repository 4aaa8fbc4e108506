// Wait - Poll the application under test until an observation succeeds
//
// Every wait is one value built per call: an observation closure, the set of
// failure kinds that mean "not ready yet", a timeout and a poll interval.
// Failures outside the tolerated set end the wait on the spot.

use crate::error::{Error, FailureKind, Result};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Default timeout for waits (30 seconds)
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default polling interval for waits (100ms)
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Failures tolerated while the application restarts: the transitional
/// "please wait" page is still shown, or no page is served at all.
pub const RESTART_TOLERANCE: &[FailureKind] =
    &[FailureKind::Unsatisfied, FailureKind::ElementNotFound];

/// Failures tolerated while the UI settles after an action.
pub const UI_SETTLE_TOLERANCE: &[FailureKind] = &[FailureKind::ElementNotFound];

/// Classified result of one observation.
#[derive(Debug)]
pub enum Outcome<T> {
    /// The condition holds
    Ready(T),
    /// Not ready yet; keep polling
    Pending(Error),
    /// Terminal failure; stop immediately
    Fatal(Error),
}

/// A single wait for some condition on the application under test.
///
/// # Example
///
/// ```ignore
/// use acceptance_harness::wait::{Wait, UI_SETTLE_TOLERANCE};
/// use std::time::Duration;
///
/// let element = Wait::new("the console link")
///     .with_timeout(Duration::from_secs(10))
///     .ignoring(UI_SETTLE_TOLERANCE)
///     .until(|| page.find(&By::link("Console Output")))
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct Wait {
    what: String,
    timeout: Duration,
    poll_interval: Duration,
    tolerated: Vec<FailureKind>,
    cancel: Option<CancellationToken>,
}

impl Wait {
    /// Creates a wait described by `what` (used in logs and timeout errors).
    ///
    /// No failure kind is tolerated until [`Wait::ignoring`] is called.
    pub fn new(what: impl Into<String>) -> Self {
        Self {
            what: what.into(),
            timeout: DEFAULT_WAIT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            tolerated: Vec::new(),
            cancel: None,
        }
    }

    /// Sets the overall time budget, measured from the first observation.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the pause between observations.
    ///
    /// Zero turns the wait into a tight loop that only yields to the runtime.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Adds failure kinds that mean "not ready yet".
    pub fn ignoring(mut self, kinds: &[FailureKind]) -> Self {
        for kind in kinds {
            if !self.tolerated.contains(kind) {
                self.tolerated.push(*kind);
            }
        }
        self
    }

    /// Stops the wait with [`Error::Cancelled`] once `token` is cancelled.
    pub fn cancel_on(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn tolerates(&self, kind: FailureKind) -> bool {
        self.tolerated.contains(&kind)
    }

    /// Sorts one observation result into ready, pending or fatal.
    pub fn classify<T>(&self, result: Result<T>) -> Outcome<T> {
        match result {
            Ok(value) => Outcome::Ready(value),
            Err(err) if self.tolerates(err.kind()) => Outcome::Pending(err),
            Err(err) => Outcome::Fatal(err),
        }
    }

    /// Re-runs `observe` until it succeeds.
    ///
    /// Returns the first successful value, the first intolerable error
    /// unchanged, or [`Error::Timeout`] carrying the last tolerated failure.
    pub async fn until<T, F, Fut>(self, observe: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.poll(observe, |wait, result| wait.classify(result)).await
    }

    /// Like [`Wait::until`] for boolean predicates.
    ///
    /// `Ok(false)` always counts as "not ready yet", whatever the tolerated set.
    pub async fn until_true<F, Fut>(self, predicate: F) -> Result<()>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<bool>>,
    {
        self.poll(predicate, |wait, result| match wait.classify(result) {
            Outcome::Ready(true) => Outcome::Ready(()),
            Outcome::Ready(false) => {
                Outcome::Pending(Error::Unsatisfied(format!("{} does not hold yet", wait.what)))
            }
            Outcome::Pending(err) => Outcome::Pending(err),
            Outcome::Fatal(err) => Outcome::Fatal(err),
        })
        .await
    }

    async fn poll<R, T, F, Fut, S>(self, mut observe: F, settle: S) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<R>>,
        S: Fn(&Self, Result<R>) -> Outcome<T>,
    {
        let start = Instant::now();
        let mut attempts: u32 = 0;

        loop {
            if self.is_cancelled() {
                return Err(Error::Cancelled(self.what));
            }

            attempts += 1;
            let observation = observe().await;
            let pending = match settle(&self, observation) {
                Outcome::Ready(value) => {
                    tracing::debug!(
                        "Wait for {} succeeded after {} observation(s) in {:?}",
                        self.what,
                        attempts,
                        start.elapsed()
                    );
                    return Ok(value);
                }
                Outcome::Fatal(err) => {
                    tracing::debug!("Wait for {} failed: {}", self.what, err);
                    return Err(err);
                }
                Outcome::Pending(err) => err,
            };

            let elapsed = start.elapsed();
            if elapsed >= self.timeout {
                tracing::debug!(
                    "Wait for {} timed out after {:?} ({} observations)",
                    self.what,
                    elapsed,
                    attempts
                );
                return Err(Error::Timeout {
                    what: self.what,
                    elapsed,
                    attempts,
                    last: Some(Box::new(pending)),
                });
            }

            tracing::trace!(
                "Still waiting for {} (observation {}): {}",
                self.what,
                attempts,
                pending
            );
            self.pause().await?;
        }
    }

    async fn pause(&self) -> Result<()> {
        if self.poll_interval.is_zero() {
            tokio::task::yield_now().await;
            return Ok(());
        }

        match &self.cancel {
            Some(token) => {
                tokio::select! {
                    _ = tokio::time::sleep(self.poll_interval) => Ok(()),
                    _ = token.cancelled() => Err(Error::Cancelled(self.what.clone())),
                }
            }
            None => {
                tokio::time::sleep(self.poll_interval).await;
                Ok(())
            }
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|t| t.is_cancelled())
    }
}
