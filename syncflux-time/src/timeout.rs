// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll};
use core::time::Duration;
use pin_project::pin_project;
use syncflux_core::FetchError;
use syncflux_runtime::Timer;

/// Extension trait bounding a future by a timeout.
pub trait TimeoutExt: Future + Sized {
    /// Resolves to `Err(FetchError::Timeout)` if `self` has not completed
    /// within `duration`. The inner future is dropped (cancelled) on timeout.
    fn timeout_with_timer<TM: Timer>(self, duration: Duration, timer: &TM) -> Timeout<Self, TM> {
        Timeout {
            future: self,
            sleep: timer.sleep_future(duration),
            duration,
        }
    }

    /// Bounds the future using the default timer.
    #[cfg(feature = "runtime-tokio")]
    fn timeout(self, duration: Duration) -> Timeout<Self, syncflux_runtime::DefaultTimer> {
        self.timeout_with_timer(duration, &syncflux_runtime::DefaultTimer::default())
    }
}

impl<F: Future> TimeoutExt for F {}

/// Future returned by [`TimeoutExt::timeout_with_timer`].
#[pin_project]
pub struct Timeout<F, TM: Timer> {
    #[pin]
    future: F,
    #[pin]
    sleep: TM::Sleep,
    duration: Duration,
}

impl<F, TM> Future for Timeout<F, TM>
where
    F: Future,
    TM: Timer,
{
    type Output = Result<F::Output, FetchError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();

        // The inner future wins a tie with the timer.
        if let Poll::Ready(output) = this.future.poll(cx) {
            return Poll::Ready(Ok(output));
        }

        match this.sleep.poll(cx) {
            Poll::Ready(()) => Poll::Ready(Err(FetchError::timeout(*this.duration))),
            Poll::Pending => Poll::Pending,
        }
    }
}
