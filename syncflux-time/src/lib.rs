// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Time-based operators with a runtime-agnostic timer.
//!
//! # Overview
//!
//! - **`DebounceExt`** - `.debounce_with_timer(duration, timer)` on streams (trailing debounce)
//! - **`TimeoutExt`** - `.timeout_with_timer(duration, timer)` on futures
//! - **`interval`** - periodic stream that ticks immediately, then every period
//!
//! With the `runtime-tokio` feature (default), `debounce` and `interval` pick
//! [`TokioTimer`](syncflux_runtime::TokioTimer) automatically.
//!
//! # Example
//!
//! ```rust,no_run
//! use syncflux_time::prelude::*;
//! use futures::stream::{self, StreamExt};
//! use std::time::Duration;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let clicks = stream::iter(vec!["a", "b", "c"]);
//! let mut settled = Box::pin(clicks.debounce(Duration::from_millis(300)));
//!
//! // Only the last click survives the quiet period.
//! assert_eq!(settled.next().await, Some("c"));
//! # }
//! ```

mod debounce;
mod interval;
mod timeout;

pub mod prelude;

pub use debounce::{Debounce, DebounceExt};
#[cfg(feature = "runtime-tokio")]
pub use interval::interval;
pub use interval::{interval_with_timer, Interval};
pub use timeout::{Timeout, TimeoutExt};
