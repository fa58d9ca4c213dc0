// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The per-slice unit of truth and the patches that move it between states.

use crate::error::FetchError;
use serde::{Deserialize, Serialize};
use syncflux_runtime::DefaultInstant;

/// Category of the last fetch failure, as seen by consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// The data source did not answer in time
    Timeout,
    /// The data source rejected the request
    Source,
    /// Unclassified failure
    Unknown,
}

/// Consumer-facing description of the last fetch failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub kind: ErrorKind,
    pub message: String,
    /// Number of attempts made before giving up (1 + retries)
    pub attempts: u32,
}

impl ErrorInfo {
    /// Builds the consumer-facing error after `attempts` failed attempts.
    #[must_use]
    pub fn from_fetch_error(error: &FetchError, attempts: u32) -> Self {
        let kind = match error {
            FetchError::Timeout { .. } => ErrorKind::Timeout,
            FetchError::Source(_) => ErrorKind::Source,
            FetchError::Unknown(_) => ErrorKind::Unknown,
        };
        Self {
            kind,
            message: error.to_string(),
            attempts,
        }
    }
}

/// Synchronization state of one domain slice.
///
/// On failure `data` keeps its previous value, so consumers can keep showing
/// the last known good payload next to `error`.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncState<T, I = DefaultInstant> {
    /// Last successfully fetched payload; `None` until the first success.
    pub data: Option<T>,
    /// `true` while a fetch is in flight.
    pub loading: bool,
    /// Last fetch failure; cleared when the next attempt starts.
    pub error: Option<ErrorInfo>,
    /// Instant of the last successful fetch.
    pub last_updated: Option<I>,
    /// Set by the staleness monitor once `last_updated` is older than the threshold.
    pub is_stale: bool,
    /// Number of completed logical fetches, successful or not.
    pub refresh_count: u64,
}

impl<T, I> Default for SyncState<T, I> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
            last_updated: None,
            is_stale: false,
            refresh_count: 0,
        }
    }
}

impl<T, I> SyncState<T, I> {
    /// `true` once no fetch is in flight and at least one fetch has completed.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !self.loading && (self.data.is_some() || self.error.is_some())
    }

    #[must_use]
    pub const fn has_data(&self) -> bool {
        self.data.is_some()
    }

    #[must_use]
    pub const fn has_error(&self) -> bool {
        self.error.is_some()
    }
}

/// A partial update of a [`SyncState`].
///
/// Fields left as `None` are not touched by [`SyncPatch::apply`].
#[derive(Debug, Clone, PartialEq)]
pub struct SyncPatch<T, I = DefaultInstant> {
    data: Option<T>,
    loading: Option<bool>,
    error: Option<Option<ErrorInfo>>,
    last_updated: Option<I>,
    is_stale: Option<bool>,
    bump_refresh_count: bool,
}

impl<T, I> Default for SyncPatch<T, I> {
    fn default() -> Self {
        Self {
            data: None,
            loading: None,
            error: None,
            last_updated: None,
            is_stale: None,
            bump_refresh_count: false,
        }
    }
}

impl<T, I> SyncPatch<T, I> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn data(mut self, data: T) -> Self {
        self.data = Some(data);
        self
    }

    #[must_use]
    pub fn loading(mut self, loading: bool) -> Self {
        self.loading = Some(loading);
        self
    }

    #[must_use]
    pub fn error(mut self, error: ErrorInfo) -> Self {
        self.error = Some(Some(error));
        self
    }

    #[must_use]
    pub fn clear_error(mut self) -> Self {
        self.error = Some(None);
        self
    }

    #[must_use]
    pub fn last_updated(mut self, at: I) -> Self {
        self.last_updated = Some(at);
        self
    }

    #[must_use]
    pub fn stale(mut self, is_stale: bool) -> Self {
        self.is_stale = Some(is_stale);
        self
    }

    #[must_use]
    pub fn bump_refresh_count(mut self) -> Self {
        self.bump_refresh_count = true;
        self
    }

    /// A new attempt begins: loading, with the previous error cleared.
    #[must_use]
    pub fn attempt_started() -> Self {
        Self::new().loading(true).clear_error()
    }

    /// Terminal success of a logical fetch.
    #[must_use]
    pub fn succeeded(data: T, at: I) -> Self {
        Self::new()
            .data(data)
            .loading(false)
            .clear_error()
            .last_updated(at)
            .stale(false)
            .bump_refresh_count()
    }

    /// Terminal failure of a logical fetch. `data` and `last_updated` are kept.
    #[must_use]
    pub fn failed(error: ErrorInfo) -> Self {
        Self::new().loading(false).error(error).bump_refresh_count()
    }

    /// Staleness transition, the only write of the staleness monitor.
    #[must_use]
    pub fn marked_stale() -> Self {
        Self::new().stale(true)
    }

    /// Merges this patch into `state`.
    pub fn apply(self, state: &mut SyncState<T, I>) {
        if let Some(data) = self.data {
            state.data = Some(data);
        }
        if let Some(loading) = self.loading {
            state.loading = loading;
        }
        if let Some(error) = self.error {
            state.error = error;
        }
        if let Some(at) = self.last_updated {
            state.last_updated = Some(at);
        }
        if let Some(is_stale) = self.is_stale {
            state.is_stale = is_stale;
        }
        if self.bump_refresh_count {
            state.refresh_count += 1;
        }
    }
}
