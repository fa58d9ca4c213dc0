// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Periodic age check of the last successful fetch.

use core::pin::pin;
use futures::StreamExt;
use std::time::Duration;
use syncflux_core::{CancellationToken, ObservableStore, SyncPatch, SyncState};
use syncflux_runtime::Timer;
use syncflux_time::interval_with_timer;
use tracing::debug;

/// Whether data fetched at `last_updated` has outlived `threshold` at `now`.
///
/// An exact hit of the threshold is not stale yet; never-fetched data is never stale.
pub fn is_past_threshold<I>(last_updated: Option<I>, now: I, threshold: Duration) -> bool
where
    I: Copy + Ord + core::ops::Sub<I, Output = Duration>,
{
    last_updated.is_some_and(|at| now >= at && now - at > threshold)
}

/// Flags the slice stale once its data outlives the threshold.
///
/// The monitor only ever sets `is_stale`; the next successful fetch resets it.
/// It runs on its own timer and reads the state atomically at check time, so
/// it never depends on polling or on a fetch being in flight.
pub struct StalenessMonitor<T, TM: Timer> {
    store: ObservableStore<SyncState<T, TM::Instant>>,
    threshold: Duration,
    check_interval: Duration,
    timer: TM,
}

impl<T, TM> StalenessMonitor<T, TM>
where
    T: Clone + PartialEq + Send + 'static,
    TM: Timer,
{
    pub fn new(
        store: ObservableStore<SyncState<T, TM::Instant>>,
        threshold: Duration,
        check_interval: Duration,
        timer: TM,
    ) -> Self {
        Self {
            store,
            threshold,
            check_interval,
            timer,
        }
    }

    /// Runs one check. Returns `true` if the slice was flagged by this call.
    pub fn check(&self) -> bool {
        let now = self.timer.now();
        let threshold = self.threshold;
        let mut flagged = false;
        let result = self.store.modify(|state| {
            if !state.is_stale && is_past_threshold(state.last_updated, now, threshold) {
                SyncPatch::marked_stale().apply(state);
                flagged = true;
            }
        });
        if result.is_err() {
            return false;
        }
        if flagged {
            debug!(threshold_ms = threshold.as_millis() as u64, "slice marked stale");
        }
        flagged
    }

    /// Checks on every tick of the check interval until `cancel` fires or the store closes.
    pub async fn run(self, cancel: CancellationToken) {
        let mut ticks = pin!(interval_with_timer(self.check_interval, self.timer.clone()));
        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                tick = ticks.next() => {
                    if tick.is_none() || self.store.is_closed() {
                        break;
                    }
                    self.check();
                }
            }
        }
        debug!("staleness monitor stopped");
    }
}
