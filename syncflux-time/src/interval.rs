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

/// Periodic stream of tick instants.
///
/// The first tick is emitted immediately on the first poll, then one tick
/// every `period`. Deadlines advance by exactly `period` from the previous
/// deadline, so late polling does not shift later ticks. Each tick yields its
/// scheduled deadline.
#[pin_project]
pub struct Interval<TM: Timer> {
    timer: TM,
    period: Duration,
    deadline: Option<TM::Instant>,
    #[pin]
    sleep: Option<TM::Sleep>,
}

/// Creates an [`Interval`] driven by `timer`.
pub fn interval_with_timer<TM: Timer>(period: Duration, timer: TM) -> Interval<TM> {
    Interval {
        timer,
        period,
        deadline: None,
        sleep: None,
    }
}

/// Creates an [`Interval`] driven by the default timer.
#[cfg(feature = "runtime-tokio")]
pub fn interval(period: Duration) -> Interval<syncflux_runtime::DefaultTimer> {
    interval_with_timer(period, syncflux_runtime::DefaultTimer::default())
}

impl<TM: Timer> Stream for Interval<TM> {
    type Item = TM::Instant;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        let Some(tick) = *this.deadline else {
            let now = this.timer.now();
            *this.deadline = Some(now + *this.period);
            this.sleep.set(Some(this.timer.sleep_future(*this.period)));
            return Poll::Ready(Some(now));
        };

        let Some(sleep) = this.sleep.as_mut().as_pin_mut() else {
            return Poll::Ready(None);
        };

        match sleep.poll(cx) {
            Poll::Ready(()) => {
                let next = tick + *this.period;
                *this.deadline = Some(next);
                let wait = this.timer.remaining_until(next);
                this.sleep.set(Some(this.timer.sleep_future(wait)));
                Poll::Ready(Some(tick))
            }
            Poll::Pending => Poll::Pending,
        }
    }
}
