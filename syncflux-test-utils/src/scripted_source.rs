// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! A controllable fake data source.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use syncflux::DataSource;
use syncflux_core::FetchError;
use tokio::time::sleep;

/// What one call to [`ScriptedSource::fetch`] does after its delay.
#[derive(Debug, Clone)]
pub enum Reply<T> {
    Value(T),
    Error(FetchError),
    /// Never resolves; only the pipeline timeout ends the call.
    Hang,
    Panic,
}

struct Inner<T> {
    script: Mutex<VecDeque<(Duration, Reply<T>)>>,
    fallback: Mutex<(Duration, Reply<T>)>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

/// Replays scripted replies in order, then repeats the fallback reply forever.
///
/// Clones share the script and the counters, so a test can keep one handle
/// while the engine owns another.
///
/// ```rust
/// use syncflux::DataSource;
/// use syncflux_test_utils::ScriptedSource;
///
/// # async fn example() {
/// let source = ScriptedSource::returning(1).then_value(2);
///
/// assert_eq!(source.fetch().await, Ok(2));
/// assert_eq!(source.fetch().await, Ok(1));
/// assert_eq!(source.calls(), 2);
/// # }
/// ```
pub struct ScriptedSource<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for ScriptedSource<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Clone + Send + 'static> ScriptedSource<T> {
    pub fn new(fallback: Reply<T>) -> Self {
        Self {
            inner: Arc::new(Inner {
                script: Mutex::new(VecDeque::new()),
                fallback: Mutex::new((Duration::ZERO, fallback)),
                calls: AtomicUsize::new(0),
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
            }),
        }
    }

    /// Always resolves with `value`.
    pub fn returning(value: T) -> Self {
        Self::new(Reply::Value(value))
    }

    /// Always fails with `error`.
    pub fn failing(error: FetchError) -> Self {
        Self::new(Reply::Error(error))
    }

    /// Never resolves.
    pub fn hanging() -> Self {
        Self::new(Reply::Hang)
    }

    /// Delays every fallback reply by `delay`.
    #[must_use]
    pub fn with_delay(self, delay: Duration) -> Self {
        self.inner.fallback.lock().0 = delay;
        self
    }

    /// Replaces the fallback reply, keeping its delay.
    pub fn set_fallback(&self, reply: Reply<T>) {
        self.inner.fallback.lock().1 = reply;
    }

    /// Queues `reply` after `delay`, ahead of the fallback.
    pub fn push(&self, delay: Duration, reply: Reply<T>) {
        self.inner.script.lock().push_back((delay, reply));
    }

    #[must_use]
    pub fn then_value(self, value: T) -> Self {
        self.push(Duration::ZERO, Reply::Value(value));
        self
    }

    #[must_use]
    pub fn then_error(self, error: FetchError) -> Self {
        self.push(Duration::ZERO, Reply::Error(error));
        self
    }

    #[must_use]
    pub fn then_after(self, delay: Duration, reply: Reply<T>) -> Self {
        self.push(delay, reply);
        self
    }

    /// Number of `fetch` calls so far.
    pub fn calls(&self) -> usize {
        self.inner.calls.load(Ordering::SeqCst)
    }

    /// Calls that started and have not finished or been dropped.
    pub fn in_flight(&self) -> usize {
        self.inner.in_flight.load(Ordering::SeqCst)
    }

    /// Highest number of calls ever running at once.
    pub fn max_in_flight(&self) -> usize {
        self.inner.max_in_flight.load(Ordering::SeqCst)
    }

    fn next_reply(&self) -> (Duration, Reply<T>) {
        let scripted = self.inner.script.lock().pop_front();
        scripted.unwrap_or_else(|| self.inner.fallback.lock().clone())
    }
}

struct InFlightGuard<'a>(&'a AtomicUsize);

impl<'a> InFlightGuard<'a> {
    fn enter(in_flight: &'a AtomicUsize, max: &AtomicUsize) -> Self {
        let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        max.fetch_max(now, Ordering::SeqCst);
        Self(in_flight)
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl<T: Clone + Send + Sync + 'static> DataSource<T> for ScriptedSource<T> {
    async fn fetch(&self) -> Result<T, FetchError> {
        self.inner.calls.fetch_add(1, Ordering::SeqCst);
        let _guard = InFlightGuard::enter(&self.inner.in_flight, &self.inner.max_in_flight);
        let (delay, reply) = self.next_reply();

        if !delay.is_zero() {
            sleep(delay).await;
        }

        match reply {
            Reply::Value(value) => Ok(value),
            Reply::Error(error) => Err(error),
            Reply::Hang => futures::future::pending().await,
            Reply::Panic => panic!("scripted data source panic"),
        }
    }
}
