// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Single-value, multi-subscriber store.
//!
//! An [`ObservableStore`] holds exactly one value and broadcasts each distinct
//! change to every active subscriber.
//!
//! ## Characteristics
//!
//! - **Replaying**: A new subscriber immediately receives the current value.
//! - **Distinct**: An update that leaves the value structurally unchanged notifies nobody.
//! - **Ordered**: Subscribers are notified in registration order, each change exactly once.
//! - **Shared**: Cheap to clone; all clones share the same value and subscribers.
//! - **Closable**: After [`close`](ObservableStore::close) every subscription completes
//!   and further updates or subscriptions fail with [`StoreError::Closed`].
//!
//! ## Example
//!
//! ```
//! use syncflux_core::ObservableStore;
//! use futures::StreamExt;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let store = ObservableStore::new(0);
//! let mut changes = store.subscribe().unwrap();
//!
//! store.set(1).unwrap();
//! store.set(1).unwrap(); // no-op, not broadcast
//! store.close();
//!
//! assert_eq!(changes.next().await, Some(0));
//! assert_eq!(changes.next().await, Some(1));
//! assert_eq!(changes.next().await, None);
//! # }
//! ```

use crate::error::StoreError;
use crate::projection::Projection;
use crate::sync_state::{SyncPatch, SyncState};
use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures::Stream;
use parking_lot::Mutex;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

struct StoreState<S> {
    closed: bool,
    value: S,
    senders: Vec<UnboundedSender<S>>,
}

/// Stream of store values handed out by [`ObservableStore::subscribe`].
///
/// Dropping the subscription unsubscribes it.
#[derive(Debug)]
pub struct StoreSubscription<S> {
    inner: UnboundedReceiver<S>,
}

impl<S> StoreSubscription<S> {
    /// Explicitly unsubscribe; equivalent to dropping the subscription.
    pub fn unsubscribe(self) {}
}

impl<S> Stream for StoreSubscription<S> {
    type Item = S;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

/// A replaying store that broadcasts every distinct change to its subscribers.
///
/// See the [module documentation](self) for examples and more details.
pub struct ObservableStore<S> {
    state: Arc<Mutex<StoreState<S>>>,
}

impl<S: Clone + PartialEq + Send + 'static> ObservableStore<S> {
    /// Creates an open store holding `initial`.
    #[must_use]
    pub fn new(initial: S) -> Self {
        Self {
            state: Arc::new(Mutex::new(StoreState {
                closed: false,
                value: initial,
                senders: Vec::new(),
            })),
        }
    }

    /// Synchronous snapshot of the current value.
    ///
    /// Still answers after the store was closed; the last value stays readable.
    #[must_use]
    pub fn get(&self) -> S {
        self.state.lock().value.clone()
    }

    /// Subscribe to this store.
    ///
    /// The returned stream yields the current value first, then every
    /// subsequent distinct value, and ends when the store is closed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Closed` if the store has been closed.
    pub fn subscribe(&self) -> Result<StoreSubscription<S>, StoreError> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(StoreError::Closed);
        }

        let (tx, rx) = mpsc::unbounded();
        // A freshly created unbounded channel always accepts its first item.
        let _ = tx.unbounded_send(state.value.clone());
        state.senders.push(tx);
        Ok(StoreSubscription { inner: rx })
    }

    /// Derived stream that only emits when `selector`'s output changes.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Closed` if the store has been closed.
    pub fn project<V, F>(
        &self,
        selector: F,
    ) -> Result<Projection<StoreSubscription<S>, F, V>, StoreError>
    where
        F: FnMut(&S) -> V,
        V: Clone + PartialEq,
    {
        Ok(Projection::new(self.subscribe()?, selector))
    }

    /// Mutates the value in place and notifies subscribers if it changed.
    ///
    /// Returns whether a notification was sent.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Closed` if the store has been closed.
    pub fn modify<F>(&self, f: F) -> Result<bool, StoreError>
    where
        F: FnOnce(&mut S),
    {
        let mut state = self.state.lock();
        if state.closed {
            return Err(StoreError::Closed);
        }

        let mut next = state.value.clone();
        f(&mut next);
        if next == state.value {
            return Ok(false);
        }

        state.value = next;
        Self::broadcast(&mut state);
        Ok(true)
    }

    /// Replaces the value and notifies subscribers if it changed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Closed` if the store has been closed.
    pub fn set(&self, value: S) -> Result<bool, StoreError> {
        self.modify(|current| *current = value)
    }

    fn broadcast(state: &mut StoreState<S>) {
        let value = &state.value;
        state
            .senders
            .retain(|tx| tx.unbounded_send(value.clone()).is_ok());
        tracing::trace!(subscribers = state.senders.len(), "store change broadcast");
    }
}

impl<S> ObservableStore<S> {
    /// Closes the store, completing all subscriber streams.
    ///
    /// Closing is idempotent.
    pub fn close(&self) {
        self.close_with(|_| {});
    }

    /// Applies `f` to the value and closes the store in one step.
    ///
    /// The final write is not broadcast; subscribers complete and only
    /// [`get`](Self::get) observes it. Does nothing if the store is already closed.
    pub fn close_with<F>(&self, f: F)
    where
        F: FnOnce(&mut S),
    {
        let mut state = self.state.lock();
        if state.closed {
            return;
        }
        f(&mut state.value);
        state.closed = true;
        state.senders.clear();
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Returns the number of currently active subscribers.
    ///
    /// Note: dropped subscribers are removed on the next broadcast, not immediately.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.state.lock().senders.len()
    }
}

impl<T, I> ObservableStore<SyncState<T, I>>
where
    SyncState<T, I>: Clone + PartialEq + Send + 'static,
{
    /// Merges `patch` into the current state and notifies if the result differs.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Closed` if the store has been closed.
    pub fn update(&self, patch: SyncPatch<T, I>) -> Result<bool, StoreError> {
        self.modify(|state| patch.apply(state))
    }
}

impl<S: Clone + PartialEq + Send + Default + 'static> Default for ObservableStore<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<S> Clone for ObservableStore<S> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}
