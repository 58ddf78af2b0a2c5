//! Condition polling engine (explicit waits).
//!
//! UI state changes on a timeline the test does not control, so a single
//! probe is racy. [`Poller`] re-evaluates a [`Condition`] until it is ready,
//! until the session reports a fatal error, or until the deadline passes.
//!
//! # Outcomes
//!
//! | Condition returns | Poller does |
//! |-------------------|-------------|
//! | `Ready(T)` | returns `T` immediately |
//! | `Fatal(e)` | returns `e` immediately, whatever budget is left |
//! | `NotYet` | fails with [`Error::WaitTimeout`] once `elapsed >= timeout`, otherwise sleeps and retries |
//!
//! A zero timeout probes exactly once and never sleeps.
//!
//! A check that hangs is cut off once the remaining budget (at least one poll
//! interval) runs out and counts as `NotYet`, so a wait ends within one poll
//! interval of its deadline even when the remote end stalls.
//!
//! # Example
//!
//! ```ignore
//! use webpoll::wait::{Poller, Visibility, WaitConfig};
//!
//! let poller = Poller::new(WaitConfig::default());
//! let id = poller.wait(&session, &Visibility(Locator::id("successMessage"))).await?;
//! ```

// ============================================================================
// Submodules
// ============================================================================

/// Conditions and their outcomes.
pub mod condition;

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::time::{Instant, sleep, timeout};
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::session::RemoteSession;

// ============================================================================
// Re-exports
// ============================================================================

pub use condition::{
    Clickable, Condition, FnCondition, Invisibility, Outcome, Presence, ProbeFuture, TextEquals,
    Visibility, condition_fn,
};

// ============================================================================
// Constants
// ============================================================================

/// Default wait budget (10 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default delay between probes (500 ms).
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

// ============================================================================
// WaitConfig
// ============================================================================

/// Time budget of a wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitConfig {
    /// Maximum wall-clock time before failing.
    pub timeout: Duration,
    /// Delay between successive probes.
    pub poll_interval: Duration,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT, DEFAULT_POLL_INTERVAL)
    }
}

impl WaitConfig {
    /// Creates a wait configuration.
    #[inline]
    #[must_use]
    pub const fn new(timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            timeout,
            poll_interval,
        }
    }

    /// Configuration that probes once and never retries.
    #[inline]
    #[must_use]
    pub const fn once() -> Self {
        Self::new(Duration::ZERO, DEFAULT_POLL_INTERVAL)
    }

    /// Sets the timeout.
    #[inline]
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the poll interval.
    #[inline]
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] if the poll interval is zero, or exceeds a non-zero
    /// timeout.
    pub fn validate(&self) -> Result<()> {
        if self.poll_interval.is_zero() {
            return Err(Error::config("Poll interval must be greater than zero"));
        }
        if !self.timeout.is_zero() && self.poll_interval > self.timeout {
            return Err(Error::config(format!(
                "Poll interval ({}ms) must not exceed timeout ({}ms)",
                self.poll_interval.as_millis(),
                self.timeout.as_millis()
            )));
        }
        Ok(())
    }
}

// ============================================================================
// CancelToken
// ============================================================================

/// Cancellation flag observed once per poll tick.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Creates an untriggered token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation of every wait holding a clone of this token.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Returns `true` once [`cancel`](Self::cancel) was called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

// ============================================================================
// Poller
// ============================================================================

/// Evaluates conditions against a session until they hold.
///
/// The poller carries a default [`WaitConfig`]; every wait can override it
/// with [`wait_with`](Self::wait_with).
#[derive(Debug, Clone, Copy, Default)]
pub struct Poller {
    config: WaitConfig,
}

impl Poller {
    /// Creates a poller with a default configuration.
    #[inline]
    #[must_use]
    pub const fn new(config: WaitConfig) -> Self {
        Self { config }
    }

    /// Returns the default configuration.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> WaitConfig {
        self.config
    }

    /// Waits for `condition` with the default configuration.
    ///
    /// # Errors
    ///
    /// - [`Error::WaitTimeout`] if the condition never held
    /// - any fatal error reported by the condition
    /// - [`Error::Config`] if the configuration is invalid
    pub async fn wait<C>(&self, session: &dyn RemoteSession, condition: &C) -> Result<C::Output>
    where
        C: Condition + ?Sized,
    {
        self.run(session, condition, self.config, None).await
    }

    /// Waits for `condition` with an explicit configuration.
    pub async fn wait_with<C>(
        &self,
        session: &dyn RemoteSession,
        condition: &C,
        config: WaitConfig,
    ) -> Result<C::Output>
    where
        C: Condition + ?Sized,
    {
        self.run(session, condition, config, None).await
    }

    /// Waits for `condition`, giving up early once `cancel` is triggered.
    ///
    /// # Errors
    ///
    /// Same as [`wait`](Self::wait), plus [`Error::Cancelled`].
    pub async fn wait_cancellable<C>(
        &self,
        session: &dyn RemoteSession,
        condition: &C,
        config: WaitConfig,
        cancel: &CancelToken,
    ) -> Result<C::Output>
    where
        C: Condition + ?Sized,
    {
        self.run(session, condition, config, Some(cancel)).await
    }

    async fn run<C>(
        &self,
        session: &dyn RemoteSession,
        condition: &C,
        config: WaitConfig,
        cancel: Option<&CancelToken>,
    ) -> Result<C::Output>
    where
        C: Condition + ?Sized,
    {
        config.validate()?;

        let description = condition.describe();
        let timeout_ms = config.timeout.as_millis() as u64;
        debug!(
            condition = %description,
            timeout_ms,
            poll_interval_ms = config.poll_interval.as_millis() as u64,
            "Waiting"
        );

        let start = Instant::now();
        let mut attempt: u32 = 0;

        loop {
            if cancel.is_some_and(CancelToken::is_cancelled) {
                return Err(Error::cancelled(
                    description,
                    start.elapsed().as_millis() as u64,
                ));
            }

            attempt += 1;
            match self.check_within_budget(session, condition, config, start).await {
                Outcome::Ready(value) => {
                    debug!(
                        condition = %description,
                        attempt,
                        elapsed_ms = start.elapsed().as_millis() as u64,
                        "Condition met"
                    );
                    return Ok(value);
                }
                Outcome::Fatal(e) => {
                    debug!(condition = %description, attempt, error = %e, "Condition aborted");
                    return Err(e);
                }
                Outcome::NotYet => {}
            }

            let elapsed = start.elapsed();
            if elapsed >= config.timeout {
                return Err(Error::wait_timeout(
                    description,
                    elapsed.as_millis() as u64,
                    timeout_ms,
                ));
            }

            let remaining = config.timeout - elapsed;
            trace!(condition = %description, attempt, "Not yet, sleeping");
            sleep(config.poll_interval.min(remaining)).await;
        }
    }

    /// Runs one check, bounded by the remaining budget.
    ///
    /// A zero-timeout wait is left unbounded; the transport's request timeout
    /// still applies to it.
    async fn check_within_budget<C>(
        &self,
        session: &dyn RemoteSession,
        condition: &C,
        config: WaitConfig,
        start: Instant,
    ) -> Outcome<C::Output>
    where
        C: Condition + ?Sized,
    {
        if config.timeout.is_zero() {
            return condition.check(session).await;
        }

        let remaining = config.timeout.saturating_sub(start.elapsed());
        let budget = remaining.max(config.poll_interval);
        match timeout(budget, condition.check(session)).await {
            Ok(outcome) => outcome,
            Err(_) => {
                trace!(budget_ms = budget.as_millis() as u64, "Check exceeded budget");
                Outcome::NotYet
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;
    use crate::browser::Locator;
    use crate::session::{MemorySession, NodeSpec};

    use proptest::prelude::{prop_assert, proptest};

    fn fast() -> WaitConfig {
        WaitConfig::new(Duration::from_secs(2), Duration::from_millis(100))
    }

    #[test]
    fn test_default_config() {
        let config = WaitConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert!(config.poll_interval <= Duration::from_millis(500));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let config = WaitConfig::default().with_poll_interval(Duration::ZERO);
        assert!(matches!(config.validate(), Err(Error::Config { .. })));
    }

    #[test]
    fn test_validate_rejects_interval_above_timeout() {
        let config = WaitConfig::new(Duration::from_millis(100), Duration::from_millis(200));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_allows_zero_timeout() {
        assert!(WaitConfig::once().validate().is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_ready_before_deadline_returns_at_ready_time() {
        let session = MemorySession::new();
        session.add(NodeSpec::new(Locator::id("late")).appears_after(Duration::from_millis(750)));

        let start = Instant::now();
        let result = Poller::new(fast())
            .wait(&session, &Presence(Locator::id("late")))
            .await;

        assert!(result.is_ok());
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(750));
        assert!(elapsed <= Duration::from_millis(850));
    }

    #[tokio::test(start_paused = true)]
    async fn test_ready_after_deadline_times_out_at_deadline() {
        let session = MemorySession::new();
        session.add(NodeSpec::new(Locator::id("late")).appears_after(Duration::from_secs(5)));

        let start = Instant::now();
        let err = Poller::new(fast())
            .wait(&session, &Presence(Locator::id("late")))
            .await
            .unwrap_err();

        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(2));
        assert!(elapsed <= Duration::from_millis(2100));
        match err {
            Error::WaitTimeout {
                description,
                elapsed_ms,
                timeout_ms,
            } => {
                assert_eq!(description, "presence of id=late");
                assert_eq!(timeout_ms, 2000);
                assert!(elapsed_ms >= 2000);
            }
            other => panic!("expected WaitTimeout, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_timeout_probes_exactly_once() {
        let session = MemorySession::new();

        let start = Instant::now();
        let err = Poller::default()
            .wait_with(&session, &Presence(Locator::id("missing")), WaitConfig::once())
            .await
            .unwrap_err();

        assert!(err.is_timeout());
        assert_eq!(session.probe_count(), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_timeout_succeeds_when_present() {
        let session = MemorySession::new();
        session.add(NodeSpec::new(Locator::id("here")));

        let result = Poller::default()
            .wait_with(&session, &Presence(Locator::id("here")), WaitConfig::once())
            .await;
        assert!(result.is_ok());
        assert_eq!(session.probe_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fatal_aborts_immediately() {
        let session = MemorySession::new();
        session.fail_with(|| Error::SessionClosed);

        let start = Instant::now();
        let err = Poller::new(fast())
            .wait(&session, &Visibility(Locator::id("x")))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::SessionClosed));
        assert_eq!(start.elapsed(), Duration::ZERO);
        assert_eq!(session.probe_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stops_polling_after_ready() {
        let session = MemorySession::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let condition = condition_fn("third call", move |_session| {
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            Box::pin(async move {
                if n >= 3 {
                    Outcome::Ready(n)
                } else {
                    Outcome::NotYet
                }
            })
        });

        let value = Poller::new(fast())
            .wait(&session, &condition)
            .await
            .expect("ready");
        assert_eq!(value, 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_check_times_out_at_deadline() {
        let session = MemorySession::new();
        let condition = condition_fn("slow remote", |_session| {
            Box::pin(async {
                sleep(Duration::from_secs(5)).await;
                Outcome::Ready(())
            })
        });
        let config = WaitConfig::new(Duration::from_secs(1), Duration::from_millis(100));

        let start = Instant::now();
        let err = Poller::default()
            .wait_with(&session, &condition, config)
            .await
            .unwrap_err();

        assert!(err.is_timeout(), "{err:?}");
        assert!(start.elapsed() >= Duration::from_secs(1));
        assert!(start.elapsed() <= Duration::from_millis(1100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_check_within_budget_succeeds() {
        let session = MemorySession::new();
        let condition = condition_fn("slow but in time", |_session| {
            Box::pin(async {
                sleep(Duration::from_millis(300)).await;
                Outcome::Ready(7)
            })
        });

        let start = Instant::now();
        let value = Poller::new(fast())
            .wait(&session, &condition)
            .await
            .expect("ready");
        assert_eq!(value, 7);
        assert!(start.elapsed() >= Duration::from_millis(300));
        assert!(start.elapsed() < Duration::from_millis(400));
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_config_is_rejected_before_probing() {
        let session = MemorySession::new();
        let config = WaitConfig::new(Duration::from_secs(1), Duration::ZERO);

        let err = Poller::default()
            .wait_with(&session, &Presence(Locator::id("x")), config)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
        assert_eq!(session.probe_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_wait_stops_at_next_tick() {
        let session = MemorySession::new();
        let cancel = CancelToken::new();
        let trigger = cancel.clone();

        tokio::spawn(async move {
            sleep(Duration::from_millis(250)).await;
            trigger.cancel();
        });

        let start = Instant::now();
        let err = Poller::default()
            .wait_cancellable(&session, &Presence(Locator::id("x")), fast(), &cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Cancelled { .. }));
        assert!(start.elapsed() >= Duration::from_millis(250));
        assert!(start.elapsed() <= Duration::from_millis(300));
    }

    proptest! {
        #[test]
        fn prop_validate_accepts_interval_within_timeout(
            timeout_ms in 1u64..60_000,
            ratio in 1u64..=100,
        ) {
            let interval_ms = (timeout_ms * ratio / 100).max(1);
            let config = WaitConfig::new(
                Duration::from_millis(timeout_ms),
                Duration::from_millis(interval_ms),
            );
            prop_assert!(config.validate().is_ok());
        }

        #[test]
        fn prop_validate_rejects_interval_past_timeout(
            timeout_ms in 1u64..60_000,
            extra_ms in 1u64..1_000,
        ) {
            let config = WaitConfig::new(
                Duration::from_millis(timeout_ms),
                Duration::from_millis(timeout_ms + extra_ms),
            );
            prop_assert!(config.validate().is_err());
        }
    }
}
