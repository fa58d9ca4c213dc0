// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
//! Core types of the syncflux state-synchronization engine.
//!
//! - [`SyncState`] is the unit of truth for one domain slice.
//! - [`ObservableStore`] holds a single state value and broadcasts every
//!   distinct change to its subscribers, in registration order.
//! - [`RefetchTrigger`] names a reason to refetch.
//! - [`SyncTask`] ties a background task to a [`CancellationToken`] so
//!   teardown stops it deterministically.

pub mod error;
pub mod observable_store;
pub mod projection;
pub mod sync_state;
pub mod sync_task;
pub mod trigger;

pub use self::error::{ConfigError, FetchError, StoreError, SyncError};
pub use self::observable_store::{ObservableStore, StoreSubscription};
pub use self::projection::{DistinctUntilChangedExt, Projection};
pub use self::sync_state::{ErrorInfo, ErrorKind, SyncPatch, SyncState};
pub use self::sync_task::SyncTask;
pub use self::trigger::{RefetchTrigger, TriggerKind};
pub use tokio_util::sync::CancellationToken;
