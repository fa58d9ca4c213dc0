// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Per-engine configuration.
//!
//! Every knob is optional and defaults to the values below. Configurations
//! can be built in code or parsed from TOML:
//!
//! ```
//! use syncflux::SyncConfig;
//! use std::time::Duration;
//!
//! let config = SyncConfig::from_toml_str(
//!     r#"
//!     polling_interval_ms = 5000
//!     max_retries = 1
//!     coalesce = "follow-up"
//!     "#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.polling_interval, Duration::from_secs(5));
//! assert_eq!(config.max_retries, 1);
//! ```

use serde::Deserialize;
use std::time::Duration;
use syncflux_core::ConfigError;

pub const DEFAULT_POLLING_INTERVAL: Duration = Duration::from_millis(30_000);
pub const DEFAULT_STALE_THRESHOLD: Duration = Duration::from_millis(60_000);
pub const DEFAULT_STALENESS_CHECK_INTERVAL: Duration = Duration::from_millis(10_000);
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_millis(250);
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(10_000);

/// What happens to a trigger that arrives while a fetch is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CoalescePolicy {
    /// The trigger is dropped; the in-flight result serves every caller.
    #[default]
    Drop,
    /// One more fetch is owed and starts as soon as the in-flight one settles.
    /// Any number of mid-flight triggers owe at most one follow-up.
    FollowUp,
}

/// Configuration of one [`SyncEngine`](crate::SyncEngine).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Period of `Periodic` triggers; the first one fires at start-up.
    pub polling_interval: Duration,
    pub polling_enabled: bool,
    /// Age of `last_updated` after which the state is flagged stale.
    pub stale_threshold: Duration,
    pub staleness_check_interval: Duration,
    pub staleness_enabled: bool,
    /// Retries after the first failed attempt of one logical fetch.
    pub max_retries: u32,
    /// Delay before the first retry; doubled for each further retry, capped at `timeout`.
    pub retry_backoff: Duration,
    /// Quiet period required before a `Manual` trigger is released.
    pub debounce: Duration,
    /// Bound on each individual attempt.
    pub timeout: Duration,
    pub coalesce: CoalescePolicy,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            polling_interval: DEFAULT_POLLING_INTERVAL,
            polling_enabled: true,
            stale_threshold: DEFAULT_STALE_THRESHOLD,
            staleness_check_interval: DEFAULT_STALENESS_CHECK_INTERVAL,
            staleness_enabled: true,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
            debounce: DEFAULT_DEBOUNCE,
            timeout: DEFAULT_TIMEOUT,
            coalesce: CoalescePolicy::Drop,
        }
    }
}

impl SyncConfig {
    #[must_use]
    pub fn with_polling_interval(mut self, interval: Duration) -> Self {
        self.polling_interval = interval;
        self
    }

    /// Disables the polling timer; only explicit triggers fetch.
    #[must_use]
    pub fn without_polling(mut self) -> Self {
        self.polling_enabled = false;
        self
    }

    #[must_use]
    pub fn with_stale_threshold(mut self, threshold: Duration) -> Self {
        self.stale_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_staleness_check_interval(mut self, interval: Duration) -> Self {
        self.staleness_check_interval = interval;
        self
    }

    #[must_use]
    pub fn without_staleness(mut self) -> Self {
        self.staleness_enabled = false;
        self
    }

    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    #[must_use]
    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    #[must_use]
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_coalesce(mut self, policy: CoalescePolicy) -> Self {
        self.coalesce = policy;
        self
    }

    /// Checks that every timer-driving duration is usable.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Zero` naming the first zero duration that would
    /// drive a timer.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.polling_enabled && self.polling_interval.is_zero() {
            return Err(ConfigError::Zero {
                field: "polling_interval_ms",
            });
        }
        if self.staleness_enabled && self.staleness_check_interval.is_zero() {
            return Err(ConfigError::Zero {
                field: "staleness_check_interval_ms",
            });
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::Zero {
                field: "timeout_ms",
            });
        }
        Ok(())
    }

    /// Parses and validates a TOML configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed TOML or unknown keys, and
    /// `ConfigError::Negative`/`ConfigError::Zero` for invalid values.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let raw: RawSyncConfig =
            toml::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))?;
        Self::try_from(raw)
    }

    /// Backoff before retry number `retry` (1-based).
    #[must_use]
    pub fn backoff_for(&self, retry: u32) -> Duration {
        let factor = 1u32.checked_shl(retry.saturating_sub(1)).unwrap_or(u32::MAX);
        self.retry_backoff
            .checked_mul(factor)
            .unwrap_or(self.timeout)
            .min(self.timeout)
    }
}

/// Serialized form of [`SyncConfig`].
///
/// Durations are signed milliseconds so that negative values can be reported
/// instead of failing to parse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawSyncConfig {
    #[serde(alias = "pollingIntervalMs")]
    pub polling_interval_ms: Option<i64>,
    #[serde(alias = "pollingEnabled")]
    pub polling_enabled: Option<bool>,
    #[serde(alias = "staleThresholdMs")]
    pub stale_threshold_ms: Option<i64>,
    #[serde(alias = "stalenessCheckIntervalMs")]
    pub staleness_check_interval_ms: Option<i64>,
    #[serde(alias = "stalenessEnabled")]
    pub staleness_enabled: Option<bool>,
    #[serde(alias = "maxRetries")]
    pub max_retries: Option<i64>,
    #[serde(alias = "retryBackoffMs")]
    pub retry_backoff_ms: Option<i64>,
    #[serde(alias = "debounceMs")]
    pub debounce_ms: Option<i64>,
    #[serde(alias = "timeoutMs")]
    pub timeout_ms: Option<i64>,
    pub coalesce: Option<CoalescePolicy>,
}

fn non_negative(field: &'static str, value: i64) -> Result<u64, ConfigError> {
    u64::try_from(value).map_err(|_| ConfigError::Negative { field, value })
}

fn millis(
    field: &'static str,
    value: Option<i64>,
    default: Duration,
) -> Result<Duration, ConfigError> {
    value.map_or(Ok(default), |ms| {
        non_negative(field, ms).map(Duration::from_millis)
    })
}

impl TryFrom<RawSyncConfig> for SyncConfig {
    type Error = ConfigError;

    fn try_from(raw: RawSyncConfig) -> Result<Self, Self::Error> {
        let max_retries = match raw.max_retries {
            Some(value) => u32::try_from(non_negative("max_retries", value)?)
                .map_err(|_| ConfigError::Parse(format!("`max_retries` is too large: {value}")))?,
            None => DEFAULT_MAX_RETRIES,
        };

        let config = Self {
            polling_interval: millis(
                "polling_interval_ms",
                raw.polling_interval_ms,
                DEFAULT_POLLING_INTERVAL,
            )?,
            polling_enabled: raw.polling_enabled.unwrap_or(true),
            stale_threshold: millis(
                "stale_threshold_ms",
                raw.stale_threshold_ms,
                DEFAULT_STALE_THRESHOLD,
            )?,
            staleness_check_interval: millis(
                "staleness_check_interval_ms",
                raw.staleness_check_interval_ms,
                DEFAULT_STALENESS_CHECK_INTERVAL,
            )?,
            staleness_enabled: raw.staleness_enabled.unwrap_or(true),
            max_retries,
            retry_backoff: millis("retry_backoff_ms", raw.retry_backoff_ms, DEFAULT_RETRY_BACKOFF)?,
            debounce: millis("debounce_ms", raw.debounce_ms, DEFAULT_DEBOUNCE)?,
            timeout: millis("timeout_ms", raw.timeout_ms, DEFAULT_TIMEOUT)?,
            coalesce: raw.coalesce.unwrap_or_default(),
        };
        config.validate()?;
        Ok(config)
    }
}
