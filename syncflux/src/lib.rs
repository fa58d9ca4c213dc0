// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
//! Reactive state synchronization for domain slices.
//!
//! A [`SyncEngine`] keeps one [`SyncState`] per domain slice consistent with
//! a [`DataSource`]:
//!
//! ```text
//! refresh / force_refresh / notify_action / polling
//!         │
//!         ▼
//!  trigger multiplexer ──► fetch pipeline ──► ObservableStore<SyncState<T>> ──► subscribers
//!  (debounce, polling)    (timeout, retry)              ▲                        and views
//!                                                       │
//!                                             staleness monitor
//! ```
//!
//! - At most one fetch is in flight per slice. Triggers that arrive meanwhile
//!   are dropped or owe one follow-up fetch, per [`CoalescePolicy`].
//! - Every fetch ends in a terminal state: `loading == false` with fresh
//!   `data` or an `error`. Failures keep the previous `data`.
//! - Staleness is flagged on its own timer and never triggers a fetch.
//! - [`SyncEngine::destroy`] stops every timer, completes every subscriber
//!   stream and makes later triggers fail with [`SyncError::Destroyed`].
//!
//! # Example
//!
//! ```no_run
//! use futures::StreamExt;
//! use syncflux::prelude::*;
//! use std::time::Duration;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), SyncError> {
//! let source = from_fn(|| async { Ok::<_, FetchError>(vec![1, 2, 3]) });
//! let config = SyncConfig::default().with_polling_interval(Duration::from_secs(5));
//! let engine = SyncEngine::new("numbers", source, config)?;
//!
//! let mut loading = engine.project(|state| state.loading)?;
//! while let Some(is_loading) = loading.next().await {
//!     if !is_loading && engine.state().has_data() {
//!         break;
//!     }
//! }
//!
//! engine.destroy();
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod data_source;
pub mod engine;
pub mod fetch_pipeline;
pub mod prelude;
pub mod registry;
pub mod staleness;
pub mod trigger_multiplexer;

pub use self::config::{CoalescePolicy, RawSyncConfig, SyncConfig};
pub use self::data_source::{from_fn, DataSource, FnSource};
pub use self::engine::{EngineStats, SliceStore, SyncEngine};
pub use self::fetch_pipeline::{FetchOutcome, FetchPipeline};
pub use self::registry::{Slice, SliceRegistry};
pub use self::staleness::StalenessMonitor;
pub use self::trigger_multiplexer::{TriggerHandle, TriggerMultiplexer};

pub use syncflux_core::{
    ConfigError, ErrorInfo, ErrorKind, FetchError, ObservableStore, RefetchTrigger, StoreError,
    StoreSubscription, SyncError, SyncState,
};
pub use syncflux_runtime::{DefaultTimer, Timer, TokioTimer};
pub use syncflux_view as view;
