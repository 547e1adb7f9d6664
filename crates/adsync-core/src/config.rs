//! Configuration types for the adsync system

use std::time::Duration;

/// Loop policy for the approval monitor
///
/// The monitor runs cycles separated by `poll_interval`, bounded by a
/// wall-clock `timeout` measured from loop start.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Sleep between poll cycles
    pub poll_interval: Duration,

    /// Overall wall-clock budget for the loop
    pub timeout: Duration,

    /// Capacity of the monitor event channel
    ///
    /// When full, new events are dropped (with a warning log) rather than
    /// blocking the loop.
    pub event_channel_capacity: usize,
}

impl MonitorConfig {
    /// Create a configuration with the given loop timings
    pub fn new(poll_interval: Duration, timeout: Duration) -> Self {
        Self {
            poll_interval,
            timeout,
            ..Self::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.poll_interval.is_zero() {
            return Err(crate::Error::config("Poll interval must be > 0"));
        }
        if self.timeout.is_zero() {
            return Err(crate::Error::config("Timeout must be > 0"));
        }
        if self.event_channel_capacity == 0 {
            return Err(crate::Error::config("Event channel capacity must be > 0"));
        }
        Ok(())
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(30),
            timeout: Duration::from_secs(1800),
            event_channel_capacity: 64,
        }
    }
}
