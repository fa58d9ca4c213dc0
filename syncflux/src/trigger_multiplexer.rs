// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Merges every reason to refetch into one ordered trigger stream.
//!
//! ```text
//!  Manual ──► debounce(window) ──┐
//!  Forced ───────────────────────┤
//!  ExternalAction ───────────────┼──► RefetchTrigger stream ──► fetch pipeline
//!  interval(polling) ► Periodic ─┘
//! ```
//!
//! Coalescing against an in-flight fetch is not done here but by the engine
//! driver, which is the only component that knows whether a fetch is running.

use crate::config::SyncConfig;
use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures::stream::{self, BoxStream};
use futures::StreamExt;
use std::time::Duration;
use syncflux_core::RefetchTrigger;
use syncflux_runtime::Timer;
use syncflux_time::{interval_with_timer, DebounceExt};

/// Cloneable entry point for firing triggers into a [`TriggerMultiplexer`].
#[derive(Debug, Clone)]
pub struct TriggerHandle {
    debounced: UnboundedSender<RefetchTrigger>,
    immediate: UnboundedSender<RefetchTrigger>,
}

impl TriggerHandle {
    /// Routes `trigger` to the debounced or the immediate input.
    ///
    /// # Errors
    ///
    /// Gives the trigger back if the multiplexer's stream has been dropped.
    pub fn fire(&self, trigger: RefetchTrigger) -> Result<(), RefetchTrigger> {
        let input = if trigger.is_debounced() {
            &self.debounced
        } else {
            &self.immediate
        };
        input
            .unbounded_send(trigger)
            .map_err(mpsc::TrySendError::into_inner)
    }

    /// Stops accepting triggers; the multiplexed stream ends once drained.
    pub fn close(&self) {
        self.debounced.close_channel();
        self.immediate.close_channel();
    }
}

/// Builder of the merged trigger stream.
pub struct TriggerMultiplexer<TM: Timer> {
    debounced: UnboundedReceiver<RefetchTrigger>,
    immediate: UnboundedReceiver<RefetchTrigger>,
    debounce: Duration,
    polling: Option<Duration>,
    timer: TM,
}

impl<TM: Timer> TriggerMultiplexer<TM> {
    /// Creates the multiplexer and the handle that feeds it.
    pub fn new(config: &SyncConfig, timer: TM) -> (TriggerHandle, Self) {
        let (debounced_tx, debounced_rx) = mpsc::unbounded();
        let (immediate_tx, immediate_rx) = mpsc::unbounded();
        let handle = TriggerHandle {
            debounced: debounced_tx,
            immediate: immediate_tx,
        };
        let multiplexer = Self {
            debounced: debounced_rx,
            immediate: immediate_rx,
            debounce: config.debounce,
            polling: config.polling_enabled.then_some(config.polling_interval),
            timer,
        };
        (handle, multiplexer)
    }

    /// The merged stream.
    ///
    /// - `Manual` triggers are released after `debounce` of quiet; a burst
    ///   collapses into one.
    /// - `Forced` and `ExternalAction` triggers pass straight through.
    /// - With polling enabled a `Periodic` trigger fires on the first poll and
    ///   then every polling interval. The polling timer never ends, so
    ///   the stream only ends when polling is disabled and the handle is closed.
    pub fn into_stream(self) -> BoxStream<'static, RefetchTrigger> {
        let manual = self
            .debounced
            .debounce_with_timer(self.debounce, self.timer.clone())
            .boxed();
        let immediate = self.immediate.boxed();
        let periodic = match self.polling {
            Some(period) => interval_with_timer(period, self.timer)
                .map(|_| RefetchTrigger::Periodic)
                .boxed(),
            None => stream::empty().boxed(),
        };

        stream::select_all([manual, immediate, periodic]).boxed()
    }
}
