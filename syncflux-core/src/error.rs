// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Error types for the syncflux engine.
//!
//! Failures fall into two groups with different propagation:
//!
//! - [`FetchError`] is a runtime condition. The fetch pipeline catches it,
//!   retries it when [`FetchError::is_transient`] says so, and finally records
//!   it in the store. It never escapes a subscription stream.
//! - [`ConfigError`], [`StoreError`] and [`SyncError::Destroyed`] signal
//!   programming mistakes and are returned synchronously to the caller.

use core::time::Duration;

/// Failure of a single logical fetch against a data source.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// The data source did not answer within the configured timeout.
    #[error("Timeout: data source did not respond within {}ms", .after.as_millis())]
    Timeout {
        /// The timeout that elapsed
        after: Duration,
    },

    /// The data source rejected the request.
    #[error("Source error: {0}")]
    Source(String),

    /// Anything the engine cannot classify.
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl FetchError {
    /// Create a timeout error for the given duration
    #[must_use]
    pub const fn timeout(after: Duration) -> Self {
        Self::Timeout { after }
    }

    /// Create a source error with the given message
    pub fn source(message: impl Into<String>) -> Self {
        Self::Source(message.into())
    }

    /// Create an unknown error with the given message
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::Unknown(message.into())
    }

    /// Whether another attempt could plausibly succeed.
    ///
    /// Timeouts and source rejections are retried; unknown errors are not.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::Source(_))
    }
}

impl From<Box<dyn std::error::Error + Send + Sync>> for FetchError {
    fn from(error: Box<dyn std::error::Error + Send + Sync>) -> Self {
        Self::Source(error.to_string())
    }
}

/// Errors specific to store operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The store has been closed and accepts neither updates nor subscribers.
    #[error("Store is closed")]
    Closed,
}

/// Invalid engine configuration, reported at construction time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A duration or count was negative.
    #[error("Invalid configuration: `{field}` must not be negative (got {value})")]
    Negative {
        /// Name of the offending field
        field: &'static str,
        /// The rejected value
        value: i64,
    },

    /// A duration that drives a timer was zero.
    #[error("Invalid configuration: `{field}` must be greater than zero")]
    Zero {
        /// Name of the offending field
        field: &'static str,
    },

    /// The configuration source could not be parsed.
    #[error("Invalid configuration: {0}")]
    Parse(String),
}

/// Engine-level error returned from the public entry points.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyncError {
    /// Construction was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The engine was destroyed; it no longer accepts triggers or subscribers.
    #[error("Sync engine `{slice}` has been destroyed")]
    Destroyed {
        /// Name of the domain slice
        slice: String,
    },

    /// The underlying store rejected the operation.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A slice with this name is already registered.
    #[error("Sync engine `{slice}` is already registered")]
    DuplicateSlice {
        /// Name of the domain slice
        slice: String,
    },
}

impl SyncError {
    /// Create a `Destroyed` error for the given slice
    pub fn destroyed(slice: impl Into<String>) -> Self {
        Self::Destroyed {
            slice: slice.into(),
        }
    }
}
