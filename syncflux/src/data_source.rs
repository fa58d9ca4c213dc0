// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The external collaborator a slice is synchronized with.

use async_trait::async_trait;
use core::future::Future;
use std::sync::Arc;
use syncflux_core::FetchError;

/// Source of truth for one domain slice.
///
/// `fetch` resolves with the full payload or fails; partial or streamed
/// results are not supported. Mutations are not part of this trait: callers
/// run them directly and resynchronize with
/// [`SyncEngine::mutate_and_resync`](crate::SyncEngine::mutate_and_resync).
#[async_trait]
pub trait DataSource<T>: Send + Sync + 'static {
    async fn fetch(&self) -> Result<T, FetchError>;
}

#[async_trait]
impl<T, D> DataSource<T> for Arc<D>
where
    T: Send + 'static,
    D: DataSource<T> + ?Sized,
{
    async fn fetch(&self) -> Result<T, FetchError> {
        (**self).fetch().await
    }
}

/// [`DataSource`] backed by an async closure.
///
/// ```
/// use syncflux::data_source::{from_fn, DataSource};
/// use syncflux::FetchError;
///
/// # #[tokio::main]
/// # async fn main() {
/// let source = from_fn(|| async { Ok::<_, FetchError>(vec![1, 2, 3]) });
/// assert_eq!(source.fetch().await, Ok(vec![1, 2, 3]));
/// # }
/// ```
#[derive(Clone)]
pub struct FnSource<F> {
    fetch: F,
}

/// Wraps an async closure as a [`DataSource`].
pub fn from_fn<F>(fetch: F) -> FnSource<F> {
    FnSource { fetch }
}

#[async_trait]
impl<T, F, Fut> DataSource<T> for FnSource<F>
where
    T: Send + 'static,
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, FetchError>> + Send + 'static,
{
    async fn fetch(&self) -> Result<T, FetchError> {
        (self.fetch)().await
    }
}
