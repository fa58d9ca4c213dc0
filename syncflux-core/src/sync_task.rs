// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Background task handle with cooperative cancellation.

use crate::CancellationToken;
use core::future::Future;
use tokio::task::JoinHandle;

/// Task handle that cancels and aborts its task when dropped.
///
/// The spawned future receives a [`CancellationToken`] and is expected to
/// exit once it is cancelled. Dropping the handle also aborts the task, so a
/// future parked on something other than the token (an in-flight fetch) is
/// dropped at its next suspension point. Engine timers (polling, staleness)
/// and the trigger driver all run as `SyncTask`s.
///
/// # Example
///
/// ```rust
/// use syncflux_core::SyncTask;
///
/// # #[tokio::main]
/// # async fn main() {
/// let task = SyncTask::spawn(|cancel| async move {
///     cancel.cancelled().await;
/// });
///
/// task.cancel();
/// assert!(task.is_cancelled());
/// # }
/// ```
#[derive(Debug)]
pub struct SyncTask {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl SyncTask {
    /// Spawn a background task on the current Tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn spawn<F, Fut>(f: F) -> Self
    where
        F: FnOnce(CancellationToken) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self::spawn_with_token(CancellationToken::new(), f)
    }

    /// Spawn a background task driven by an existing token.
    ///
    /// Several tasks sharing one token stop together.
    pub fn spawn_with_token<F, Fut>(cancel: CancellationToken, f: F) -> Self
    where
        F: FnOnce(CancellationToken) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let future = f(cancel.clone());
        Self {
            cancel,
            handle: tokio::spawn(future),
        }
    }

    /// Signal the task to stop. Does not wait for it.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for SyncTask {
    fn drop(&mut self) {
        self.cancel.cancel();
        self.handle.abort();
    }
}
