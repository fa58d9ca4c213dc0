// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll};
use core::time::Duration;
use futures::Stream;
use pin_project::pin_project;
use syncflux_runtime::Timer;

/// Extension trait providing the `debounce` operator for streams.
pub trait DebounceExt: Stream + Sized {
    /// Debounces the stream by the specified duration.
    ///
    /// This implements **trailing debounce** semantics:
    /// - When a value arrives, start/restart the timer
    /// - If no new value arrives before the timer expires, emit the latest value
    /// - If a new value arrives, discard the pending value and restart the timer
    /// - When the stream ends, emit any pending value immediately
    fn debounce_with_timer<TM: Timer>(self, duration: Duration, timer: TM) -> Debounce<Self, TM> {
        Debounce {
            stream: self,
            duration,
            timer,
            pending_value: None,
            sleep: None,
            stream_ended: false,
        }
    }

    /// Debounces the stream using the default timer.
    #[cfg(feature = "runtime-tokio")]
    fn debounce(self, duration: Duration) -> Debounce<Self, syncflux_runtime::DefaultTimer> {
        self.debounce_with_timer(duration, syncflux_runtime::DefaultTimer::default())
    }
}

impl<S: Stream> DebounceExt for S {}

/// Stream returned by [`DebounceExt::debounce_with_timer`].
#[pin_project]
pub struct Debounce<S: Stream, TM: Timer> {
    #[pin]
    stream: S,
    duration: Duration,
    timer: TM,
    pending_value: Option<S::Item>,
    #[pin]
    sleep: Option<TM::Sleep>,
    stream_ended: bool,
}

impl<S, TM> Stream for Debounce<S, TM>
where
    S: Stream,
    TM: Timer,
{
    type Item = S::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        loop {
            if *this.stream_ended {
                return Poll::Ready(this.pending_value.take());
            }

            if this.pending_value.is_some() {
                if let Some(sleep) = this.sleep.as_mut().as_pin_mut() {
                    if sleep.poll(cx).is_ready() {
                        this.sleep.set(None);
                        return Poll::Ready(this.pending_value.take());
                    }
                }
            }

            match this.stream.as_mut().poll_next(cx) {
                Poll::Ready(Some(value)) => {
                    // Restart the window; the newer value replaces the pending one.
                    this.sleep
                        .set(Some(this.timer.sleep_future(*this.duration)));
                    *this.pending_value = Some(value);
                    continue;
                }
                Poll::Ready(None) => {
                    *this.stream_ended = true;
                    continue;
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
