// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Process-wide lookup table of engines keyed by slice name.
//!
//! Engines are built once at start-up, registered here and handed out to
//! every consumer, so all readers share one store per slice. Shutdown calls
//! [`SliceRegistry::destroy_all`].

use crate::engine::SyncEngine;
use parking_lot::RwLock;
use std::any::Any;
use std::collections::BTreeMap;
use std::sync::Arc;
use syncflux_core::SyncError;
use syncflux_runtime::Timer;
use tracing::info;

/// Lifecycle surface shared by every engine regardless of its payload type.
pub trait Slice: Send + Sync {
    fn name(&self) -> &str;

    fn destroy(&self);

    fn is_destroyed(&self) -> bool;
}

impl<T, TM> Slice for SyncEngine<T, TM>
where
    T: Send + 'static,
    TM: Timer,
{
    fn name(&self) -> &str {
        SyncEngine::name(self)
    }

    fn destroy(&self) {
        SyncEngine::destroy(self);
    }

    fn is_destroyed(&self) -> bool {
        SyncEngine::is_destroyed(self)
    }
}

struct Entry {
    engine: Arc<dyn Any + Send + Sync>,
    lifecycle: Arc<dyn Slice>,
}

/// Named engines with typed retrieval.
///
/// ```no_run
/// use syncflux::{from_fn, FetchError, SliceRegistry, SyncConfig, SyncEngine};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), syncflux::SyncError> {
/// let registry = SliceRegistry::new();
/// let source = from_fn(|| async { Ok::<_, FetchError>(42_u64) });
/// registry.register(SyncEngine::new("answer", source, SyncConfig::default())?)?;
///
/// let engine = registry.get::<SyncEngine<u64>>("answer").expect("registered");
/// engine.refresh()?;
///
/// registry.destroy_all();
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct SliceRegistry {
    slices: RwLock<BTreeMap<String, Entry>>,
}

impl SliceRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `engine` under its own name and returns the shared handle.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::DuplicateSlice` if the name is taken; the rejected
    /// engine is dropped, which destroys it.
    pub fn register<E: Slice + 'static>(&self, engine: E) -> Result<Arc<E>, SyncError> {
        let name = engine.name().to_owned();
        let mut slices = self.slices.write();
        if slices.contains_key(&name) {
            return Err(SyncError::DuplicateSlice { slice: name });
        }

        let engine = Arc::new(engine);
        slices.insert(
            name.clone(),
            Entry {
                engine: engine.clone(),
                lifecycle: engine.clone(),
            },
        );
        info!(slice = %name, "slice registered");
        Ok(engine)
    }

    /// The engine registered as `name`, if it exists and is an `E`.
    #[must_use]
    pub fn get<E: Slice + 'static>(&self, name: &str) -> Option<Arc<E>> {
        let engine = self.slices.read().get(name)?.engine.clone();
        engine.downcast::<E>().ok()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.slices.read().contains_key(name)
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.slices.read().keys().cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slices.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slices.read().is_empty()
    }

    /// Destroys and unregisters `name`. Returns whether it was registered.
    pub fn remove(&self, name: &str) -> bool {
        let removed = self.slices.write().remove(name);
        removed.map_or(false, |entry| {
            entry.lifecycle.destroy();
            true
        })
    }

    /// Destroys every registered engine and empties the registry.
    pub fn destroy_all(&self) {
        let slices = core::mem::take(&mut *self.slices.write());
        for (name, entry) in &slices {
            entry.lifecycle.destroy();
            info!(slice = %name, "slice destroyed");
        }
    }
}
