// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! One logical fetch per trigger: timeout, retry with backoff, terminal store update.
//!
//! The pipeline always drives the store to a terminal state. A fetch that
//! times out, fails, or even panics inside the data source ends with
//! `loading == false` and an `error`; it never leaves the slice loading.

use crate::config::SyncConfig;
use crate::data_source::DataSource;
use core::future::Future;
use futures::future::BoxFuture;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use syncflux_core::{
    ErrorInfo, FetchError, ObservableStore, RefetchTrigger, StoreError, SyncPatch, SyncState,
};
use syncflux_runtime::Timer;
use syncflux_time::TimeoutExt;
use tracing::{debug, warn};

/// Result of one logical fetch, after all retries.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOutcome<T> {
    pub result: Result<T, FetchError>,
    /// Attempts made, the first one included
    pub attempts: u32,
}

/// Wraps a [`DataSource`] with timeout and retries and writes outcomes to the store.
pub struct FetchPipeline<T, TM: Timer> {
    source: Arc<dyn DataSource<T>>,
    store: ObservableStore<SyncState<T, TM::Instant>>,
    config: SyncConfig,
    timer: TM,
}

impl<T, TM: Timer> Clone for FetchPipeline<T, TM> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            store: self.store.clone(),
            config: self.config.clone(),
            timer: self.timer.clone(),
        }
    }
}

impl<T, TM> FetchPipeline<T, TM>
where
    T: Clone + PartialEq + Send + 'static,
    TM: Timer,
{
    pub fn new(
        source: Arc<dyn DataSource<T>>,
        store: ObservableStore<SyncState<T, TM::Instant>>,
        config: SyncConfig,
        timer: TM,
    ) -> Self {
        Self {
            source,
            store,
            config,
            timer,
        }
    }

    /// Begins an attempt and returns the future that performs it.
    ///
    /// `loading` is set and the previous `error` cleared synchronously, before
    /// the data source is touched.
    pub fn start(&self, trigger: &RefetchTrigger) -> BoxFuture<'static, FetchOutcome<T>> {
        debug!(%trigger, "fetch started");
        if let Err(error) = self.store.update(SyncPatch::attempt_started()) {
            debug!(%error, "attempt not recorded");
        }
        self.attempt_with_retries().boxed()
    }

    /// Applies a terminal outcome to the store.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Closed` if the store was closed while the fetch was in flight.
    pub fn complete(&self, outcome: FetchOutcome<T>) -> Result<(), StoreError> {
        let patch = match outcome.result {
            Ok(data) => {
                debug!(attempts = outcome.attempts, "fetch succeeded");
                SyncPatch::succeeded(data, self.timer.now())
            }
            Err(error) => {
                warn!(%error, attempts = outcome.attempts, "fetch failed");
                SyncPatch::failed(ErrorInfo::from_fetch_error(&error, outcome.attempts))
            }
        };
        self.store.update(patch).map(|_| ())
    }

    /// Starts, awaits and completes one logical fetch.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Closed` if the store was closed.
    pub async fn run(&self, trigger: &RefetchTrigger) -> Result<(), StoreError> {
        let outcome = self.start(trigger).await;
        self.complete(outcome)
    }

    /// The retry loop, detached from `self` so it can be boxed as `'static`.
    ///
    /// The store is not touched here; retries are invisible to consumers.
    pub fn attempt_with_retries(&self) -> impl Future<Output = FetchOutcome<T>> + Send + 'static {
        let source = self.source.clone();
        let config = self.config.clone();
        let timer = self.timer.clone();

        async move {
            let mut attempts = 0;
            loop {
                attempts += 1;
                let error = match attempt(source.as_ref(), &config, &timer).await {
                    Ok(data) => {
                        return FetchOutcome {
                            result: Ok(data),
                            attempts,
                        }
                    }
                    Err(error) => error,
                };

                let retries_used = attempts - 1;
                if !error.is_transient() || retries_used >= config.max_retries {
                    return FetchOutcome {
                        result: Err(error),
                        attempts,
                    };
                }

                let backoff = config.backoff_for(attempts);
                warn!(
                    %error,
                    attempt = attempts,
                    backoff_ms = backoff.as_millis() as u64,
                    "retrying fetch"
                );
                timer.sleep_future(backoff).await;
            }
        }
    }
}

async fn attempt<T: Send + 'static, TM: Timer>(
    source: &dyn DataSource<T>,
    config: &SyncConfig,
    timer: &TM,
) -> Result<T, FetchError> {
    match AssertUnwindSafe(source.fetch())
        .catch_unwind()
        .timeout_with_timer(config.timeout, timer)
        .await
    {
        Ok(Ok(result)) => result,
        Ok(Err(_panic)) => Err(FetchError::unknown("data source panicked")),
        Err(timeout) => Err(timeout),
    }
}
