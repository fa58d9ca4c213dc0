// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Everything needed to build, observe and drive an engine.

pub use crate::config::{CoalescePolicy, SyncConfig};
pub use crate::data_source::{from_fn, DataSource};
pub use crate::engine::SyncEngine;
pub use crate::registry::SliceRegistry;
pub use syncflux_core::{
    DistinctUntilChangedExt, FetchError, ObservableStore, RefetchTrigger, SyncError, SyncState,
};
pub use syncflux_view::{Derivation, FilterSpec};
