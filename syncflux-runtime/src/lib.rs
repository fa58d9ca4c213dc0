// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Runtime-agnostic timer abstraction.
//!
//! Everything in syncflux that waits (debounce windows, polling intervals,
//! fetch timeouts, retry backoff, staleness checks) goes through [`Timer`], so
//! the engine can be driven by virtual time in tests.

pub mod impls;
pub mod timer;

pub use timer::Timer;

#[cfg(feature = "runtime-tokio")]
pub use impls::tokio::TokioTimer;

/// Timer used when no explicit timer is supplied.
#[cfg(feature = "runtime-tokio")]
pub type DefaultTimer = TokioTimer;

/// Instant type produced by [`DefaultTimer`].
#[cfg(feature = "runtime-tokio")]
pub type DefaultInstant = <TokioTimer as Timer>::Instant;
