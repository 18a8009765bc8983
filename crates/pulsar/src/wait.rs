//! Wait mechanisms.
//!
//! Polling-based synchronization against the driver's own clock, so waits in
//! the mock driver complete in virtual time instead of stalling the test run.

use std::time::Duration;

use crate::control::UiDriver;
use crate::result::{PulsarError, PulsarResult};

/// Default timeout for wait operations (5 seconds)
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 5_000;

/// Default polling interval (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// Options for wait operations
#[derive(Debug, Clone, Copy)]
pub struct WaitOptions {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl WaitOptions {
    /// Create wait options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Timeout as a `Duration`
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Poll interval as a `Duration`
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Poll `condition` until it holds or the deadline passes.
///
/// The condition is always checked at least once, so a zero timeout degrades
/// to a single immediate check.
///
/// # Errors
///
/// Returns [`PulsarError::Timeout`] when the deadline passes with the
/// condition still false; condition errors propagate immediately.
pub fn wait_until<F>(
    driver: &mut dyn UiDriver,
    options: WaitOptions,
    mut condition: F,
) -> PulsarResult<()>
where
    F: FnMut(&mut dyn UiDriver) -> PulsarResult<bool>,
{
    let start = driver.now();
    loop {
        if condition(driver)? {
            return Ok(());
        }
        if driver.now().saturating_sub(start) >= options.timeout() {
            return Err(PulsarError::Timeout {
                ms: options.timeout_ms,
            });
        }
        driver.sleep(options.poll_interval());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockUiDriver;

    #[test]
    fn test_options_builder() {
        let options = WaitOptions::new()
            .with_timeout(1_000)
            .with_poll_interval(10);
        assert_eq!(options.timeout(), Duration::from_millis(1_000));
        assert_eq!(options.poll_interval(), Duration::from_millis(10));
    }

    #[test]
    fn test_condition_checked_at_least_once() {
        let mut driver = MockUiDriver::builder().build();
        let options = WaitOptions::new().with_timeout(0);
        let result = wait_until(&mut driver, options, |_| Ok(true));
        assert!(result.is_ok());
    }

    #[test]
    fn test_timeout_in_virtual_time() {
        let mut driver = MockUiDriver::builder().build();
        let options = WaitOptions::new().with_timeout(200).with_poll_interval(50);
        let before = driver.now();
        let result = wait_until(&mut driver, options, |_| Ok(false));
        assert!(matches!(result, Err(PulsarError::Timeout { ms: 200 })));
        // Sleeps were virtual, the deadline was reached via the driver clock
        assert!(driver.now() - before >= Duration::from_millis(200));
    }

    #[test]
    fn test_condition_becomes_true_after_polls() {
        let mut driver = MockUiDriver::builder().build();
        let options = WaitOptions::new().with_timeout(1_000).with_poll_interval(50);
        let start = driver.now();
        let result = wait_until(&mut driver, options, |d| {
            Ok(d.now() - start >= Duration::from_millis(150))
        });
        assert!(result.is_ok());
    }

    #[test]
    fn test_condition_error_propagates() {
        let mut driver = MockUiDriver::builder().build();
        let result = wait_until(&mut driver, WaitOptions::new(), |_| {
            Err(PulsarError::SessionError {
                message: "boom".to_string(),
            })
        });
        assert!(matches!(result, Err(PulsarError::SessionError { .. })));
    }
}
