//! Ping client configuration.

use crate::core::constants::DEFAULT_PING_INTERVAL_MS;
use crate::core::ConfigError;

/// Probe timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PingConfig {
    /// Interval between probes, in milliseconds. Must be positive.
    pub interval_ms: u32,
    /// Probe timeout in milliseconds; `None` uses the template's
    /// InterestLifetime. Must be less than `interval_ms`.
    pub timeout_ms: Option<u32>,
}

impl Default for PingConfig {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_PING_INTERVAL_MS,
            timeout_ms: None,
        }
    }
}

impl PingConfig {
    /// Probe every `interval_ms`, timing out after the InterestLifetime.
    pub fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms,
            timeout_ms: None,
        }
    }

    /// Set an explicit probe timeout.
    pub fn with_timeout(mut self, timeout_ms: u32) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    /// Check the timing and resolve the effective timeout.
    ///
    /// `lifetime_ms` is the template's InterestLifetime, used when no
    /// explicit timeout is set.
    pub fn validate(&self, lifetime_ms: u32) -> Result<u32, ConfigError> {
        if self.interval_ms == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        let timeout_ms = self.timeout_ms.unwrap_or(lifetime_ms);
        if timeout_ms >= self.interval_ms {
            return Err(ConfigError::TimeoutNotBelowInterval {
                timeout_ms,
                interval_ms: self.interval_ms,
            });
        }
        Ok(timeout_ms)
    }
}
