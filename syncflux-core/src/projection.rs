// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use core::pin::Pin;
use core::task::{Context, Poll};
use futures::Stream;
use pin_project::pin_project;

/// Stream that maps each item through a selector and suppresses repeats.
///
/// A consumer interested only in, say, `loading` is not woken when only
/// `data` changes.
#[pin_project]
#[derive(Debug)]
pub struct Projection<St, F, V> {
    #[pin]
    stream: St,
    selector: F,
    last: Option<V>,
}

impl<St, F, V> Projection<St, F, V> {
    pub fn new(stream: St, selector: F) -> Self {
        Self {
            stream,
            selector,
            last: None,
        }
    }
}

impl<St, F, V> Stream for Projection<St, F, V>
where
    St: Stream,
    F: FnMut(&St::Item) -> V,
    V: Clone + PartialEq,
{
    type Item = V;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        loop {
            match this.stream.as_mut().poll_next(cx) {
                Poll::Ready(Some(item)) => {
                    let selected = (this.selector)(&item);
                    if this.last.as_ref() == Some(&selected) {
                        continue;
                    }
                    *this.last = Some(selected.clone());
                    return Poll::Ready(Some(selected));
                }
                Poll::Ready(None) => return Poll::Ready(None),
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

/// Extension trait providing `distinct_until_changed` for any stream of comparable items.
pub trait DistinctUntilChangedExt: Stream + Sized
where
    Self::Item: Clone + PartialEq,
{
    /// Suppresses items equal to the previously emitted one.
    fn distinct_until_changed(self) -> Projection<Self, fn(&Self::Item) -> Self::Item, Self::Item> {
        Projection::new(self, <Self::Item as Clone>::clone as fn(&Self::Item) -> Self::Item)
    }
}

impl<S> DistinctUntilChangedExt for S
where
    S: Stream,
    S::Item: Clone + PartialEq,
{
}
