// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! One synchronization engine per domain slice.
//!
//! The engine owns the slice's [`ObservableStore`] and runs two background
//! tasks on the current Tokio runtime:
//!
//! - the trigger driver, which consumes the multiplexed trigger stream,
//!   starts fetches and coalesces triggers that arrive mid-flight;
//! - the staleness monitor, when enabled.
//!
//! Both share one [`CancellationToken`]; [`SyncEngine::destroy`] fires it and
//! closes the store.

use crate::config::{CoalescePolicy, SyncConfig};
use crate::data_source::DataSource;
use crate::fetch_pipeline::{FetchOutcome, FetchPipeline};
use crate::staleness::StalenessMonitor;
use crate::trigger_multiplexer::{TriggerHandle, TriggerMultiplexer};
use core::fmt;
use core::future::Future;
use futures::future::{self, BoxFuture};
use futures::stream::{BoxStream, Stream, StreamExt};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use syncflux_core::{
    CancellationToken, ObservableStore, Projection, RefetchTrigger, StoreSubscription, SyncError,
    SyncState, SyncTask,
};
use syncflux_runtime::{DefaultTimer, Timer};
use syncflux_view::{derived_view, Derivation, FilterSpec};
use tracing::{debug, info, info_span, Instrument};

/// Store type of a slice synchronized with timer `TM`.
pub type SliceStore<T, TM = DefaultTimer> = ObservableStore<SyncState<T, <TM as Timer>::Instant>>;

/// Counters of the trigger driver, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EngineStats {
    /// Logical fetches started, follow-ups included.
    pub fetches_started: u64,
    /// Triggers that arrived while a fetch was in flight.
    pub triggers_coalesced: u64,
    /// Owed fetches issued under [`CoalescePolicy::FollowUp`].
    pub follow_ups: u64,
}

#[derive(Debug, Default)]
struct StatsCounters {
    fetches_started: AtomicU64,
    triggers_coalesced: AtomicU64,
    follow_ups: AtomicU64,
}

impl StatsCounters {
    fn snapshot(&self) -> EngineStats {
        EngineStats {
            fetches_started: self.fetches_started.load(Ordering::Relaxed),
            triggers_coalesced: self.triggers_coalesced.load(Ordering::Relaxed),
            follow_ups: self.follow_ups.load(Ordering::Relaxed),
        }
    }
}

/// Keeps one [`SyncState`] in sync with a [`DataSource`].
///
/// ```no_run
/// use syncflux::{from_fn, FetchError, SyncConfig, SyncEngine};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), syncflux::SyncError> {
/// let source = from_fn(|| async { Ok::<_, FetchError>(vec!["alice", "bob"]) });
/// let engine = SyncEngine::new("users", source, SyncConfig::default())?;
///
/// engine.refresh()?;
/// let state = engine.state();
/// println!("loading: {}, data: {:?}", state.loading, state.data);
///
/// engine.destroy();
/// assert!(engine.refresh().is_err());
/// # Ok(())
/// # }
/// ```
pub struct SyncEngine<T, TM: Timer = DefaultTimer> {
    name: Arc<str>,
    config: SyncConfig,
    store: SliceStore<T, TM>,
    triggers: TriggerHandle,
    cancel: CancellationToken,
    tasks: Mutex<Vec<SyncTask>>,
    destroyed: AtomicBool,
    stats: Arc<StatsCounters>,
}

impl<T> SyncEngine<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Creates and starts an engine driven by the Tokio timer.
    ///
    /// With polling enabled the first fetch starts right away.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Config` if `config` does not validate.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn new(
        name: impl Into<String>,
        source: impl DataSource<T>,
        config: SyncConfig,
    ) -> Result<Self, SyncError> {
        Self::with_timer(name, source, config, DefaultTimer::default())
    }
}

impl<T, TM> SyncEngine<T, TM>
where
    T: Clone + PartialEq + Send + Sync + 'static,
    TM: Timer,
{
    /// Creates and starts an engine driven by `timer`.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Config` if `config` does not validate.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn with_timer(
        name: impl Into<String>,
        source: impl DataSource<T>,
        config: SyncConfig,
        timer: TM,
    ) -> Result<Self, SyncError> {
        config.validate()?;

        let name: Arc<str> = Arc::from(name.into());
        let source: Arc<dyn DataSource<T>> = Arc::new(source);
        let store = ObservableStore::new(SyncState::default());
        let (triggers, multiplexer) = TriggerMultiplexer::new(&config, timer.clone());
        let cancel = CancellationToken::new();
        let stats = Arc::new(StatsCounters::default());
        let span = info_span!("sync_engine", slice = %name);

        let driver = Driver {
            pipeline: FetchPipeline::new(source, store.clone(), config.clone(), timer.clone()),
            policy: config.coalesce,
            stats: stats.clone(),
        };
        let trigger_stream = multiplexer.into_stream();
        let driver_span = span.clone();
        let mut tasks = vec![SyncTask::spawn_with_token(cancel.clone(), move |cancel| {
            driver.run(trigger_stream, cancel).instrument(driver_span)
        })];

        if config.staleness_enabled {
            let monitor = StalenessMonitor::new(
                store.clone(),
                config.stale_threshold,
                config.staleness_check_interval,
                timer,
            );
            tasks.push(SyncTask::spawn_with_token(cancel.clone(), move |cancel| {
                monitor.run(cancel).instrument(span)
            }));
        }

        info!(
            slice = %name,
            polling = config.polling_enabled,
            staleness = config.staleness_enabled,
            "sync engine started"
        );

        Ok(Self {
            name,
            config,
            store,
            triggers,
            cancel,
            tasks: Mutex::new(tasks),
            destroyed: AtomicBool::new(false),
            stats,
        })
    }

    /// Synchronous snapshot of the slice state.
    ///
    /// Still answers after [`destroy`](Self::destroy) with the last state.
    #[must_use]
    pub fn state(&self) -> SyncState<T, TM::Instant> {
        self.store.get()
    }

    /// Stream of the current state followed by every distinct change.
    ///
    /// The stream ends when the engine is destroyed.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Destroyed` after [`destroy`](Self::destroy).
    pub fn subscribe(&self) -> Result<StoreSubscription<SyncState<T, TM::Instant>>, SyncError> {
        self.ensure_alive()?;
        Ok(self.store.subscribe()?)
    }

    /// Stream of `selector`'s output, emitted only when it changes.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Destroyed` after [`destroy`](Self::destroy).
    pub fn project<V, F>(
        &self,
        selector: F,
    ) -> Result<Projection<StoreSubscription<SyncState<T, TM::Instant>>, F, V>, SyncError>
    where
        F: FnMut(&SyncState<T, TM::Instant>) -> V,
        V: Clone + PartialEq,
    {
        self.ensure_alive()?;
        Ok(self.store.project(selector)?)
    }

    /// View models derived from the slice data and the filters in `filters`.
    ///
    /// See [`derived_view`] for the emission rules.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Destroyed` after [`destroy`](Self::destroy) and
    /// `SyncError::Store` if `filters` is closed.
    pub fn view<D>(
        &self,
        derivation: D,
        filters: &ObservableStore<FilterSpec>,
    ) -> Result<impl Stream<Item = D::View>, SyncError>
    where
        D: Derivation<T>,
    {
        let data = self.project(|state: &SyncState<T, TM::Instant>| state.data.clone())?;
        let filters = filters.subscribe()?;
        Ok(derived_view(data, filters, derivation))
    }

    /// Fires a `Manual` trigger, subject to debouncing.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Destroyed` after [`destroy`](Self::destroy).
    pub fn refresh(&self) -> Result<(), SyncError> {
        self.fire(RefetchTrigger::Manual)
    }

    /// Fires a `Forced` trigger, bypassing debouncing.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Destroyed` after [`destroy`](Self::destroy).
    pub fn force_refresh(&self) -> Result<(), SyncError> {
        self.fire(RefetchTrigger::Forced)
    }

    /// Fires an `ExternalAction` trigger tagged with `action`.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Destroyed` after [`destroy`](Self::destroy).
    pub fn notify_action(&self, action: impl Into<String>) -> Result<(), SyncError> {
        self.fire(RefetchTrigger::ExternalAction(action.into()))
    }

    /// Awaits a caller-side mutation and resynchronizes on success.
    ///
    /// A failed mutation is returned as is and fires nothing.
    ///
    /// # Errors
    ///
    /// Returns the mutation's error, or `SyncError::Destroyed` converted into
    /// `E` if the engine is destroyed before or during the mutation.
    pub async fn mutate_and_resync<Fut, R, E>(&self, mutation: Fut) -> Result<R, E>
    where
        Fut: Future<Output = Result<R, E>>,
        E: From<SyncError>,
    {
        self.ensure_alive()?;
        let value = mutation.await?;
        self.force_refresh()?;
        Ok(value)
    }

    fn fire(&self, trigger: RefetchTrigger) -> Result<(), SyncError> {
        self.ensure_alive()?;
        debug!(slice = %self.name, %trigger, "trigger fired");
        self.triggers
            .fire(trigger)
            .map_err(|_| SyncError::destroyed(self.name.as_ref()))
    }

    fn ensure_alive(&self) -> Result<(), SyncError> {
        if self.is_destroyed() {
            Err(SyncError::destroyed(self.name.as_ref()))
        } else {
            Ok(())
        }
    }
}

impl<T, TM: Timer> SyncEngine<T, TM> {
    /// Name of the slice this engine synchronizes.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn config(&self) -> &SyncConfig {
        &self.config
    }

    #[must_use]
    pub fn stats(&self) -> EngineStats {
        self.stats.snapshot()
    }

    /// Stops polling and staleness timers, abandons any in-flight fetch and
    /// completes every subscriber stream.
    ///
    /// Idempotent. Afterwards every trigger and subscription entry point
    /// returns `SyncError::Destroyed`; [`state`](Self::state) keeps answering.
    pub fn destroy(&self) {
        if self.destroyed.swap(true, Ordering::SeqCst) {
            return;
        }

        self.triggers.close();
        self.cancel.cancel();
        self.tasks.lock().clear();
        // An abandoned fetch never reaches its terminal write.
        self.store.close_with(|state| state.loading = false);
        info!(slice = %self.name, "sync engine destroyed");
    }

    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed.load(Ordering::SeqCst)
    }
}

impl<T, TM: Timer> Drop for SyncEngine<T, TM> {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl<T, TM: Timer> fmt::Debug for SyncEngine<T, TM> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncEngine")
            .field("name", &self.name)
            .field("destroyed", &self.is_destroyed())
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

/// Consumes triggers and enforces at most one fetch in flight.
struct Driver<T, TM: Timer> {
    pipeline: FetchPipeline<T, TM>,
    policy: CoalescePolicy,
    stats: Arc<StatsCounters>,
}

impl<T, TM> Driver<T, TM>
where
    T: Clone + PartialEq + Send + Sync + 'static,
    TM: Timer,
{
    async fn run(
        self,
        mut triggers: BoxStream<'static, RefetchTrigger>,
        cancel: CancellationToken,
    ) {
        let mut in_flight: Option<BoxFuture<'static, FetchOutcome<T>>> = None;
        let mut owed: Option<RefetchTrigger> = None;

        loop {
            tokio::select! {
                biased;

                () = cancel.cancelled() => break,

                outcome = settle(&mut in_flight), if in_flight.is_some() => {
                    in_flight = None;
                    if let Err(error) = self.pipeline.complete(outcome) {
                        debug!(%error, "fetch outcome discarded");
                        break;
                    }
                    if let Some(trigger) = owed.take() {
                        self.stats.follow_ups.fetch_add(1, Ordering::Relaxed);
                        debug!(%trigger, "starting owed follow-up fetch");
                        in_flight = Some(self.start(&trigger));
                    }
                }

                trigger = triggers.next() => {
                    let Some(trigger) = trigger else { break };
                    if in_flight.is_some() {
                        self.coalesce(trigger, &mut owed);
                    } else {
                        in_flight = Some(self.start(&trigger));
                    }
                }
            }
        }

        debug!("trigger driver stopped");
    }

    fn start(&self, trigger: &RefetchTrigger) -> BoxFuture<'static, FetchOutcome<T>> {
        self.stats.fetches_started.fetch_add(1, Ordering::Relaxed);
        self.pipeline.start(trigger)
    }

    fn coalesce(&self, trigger: RefetchTrigger, owed: &mut Option<RefetchTrigger>) {
        self.stats.triggers_coalesced.fetch_add(1, Ordering::Relaxed);
        match self.policy {
            CoalescePolicy::Drop => debug!(%trigger, "fetch in flight, trigger dropped"),
            CoalescePolicy::FollowUp => {
                debug!(%trigger, "fetch in flight, follow-up owed");
                *owed = Some(trigger);
            }
        }
    }
}

/// Resolves with the in-flight fetch's outcome; pending while nothing is in flight.
async fn settle<O>(in_flight: &mut Option<BoxFuture<'static, O>>) -> O {
    match in_flight {
        Some(fetch) => fetch.await,
        None => future::pending().await,
    }
}
