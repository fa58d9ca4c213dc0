// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Re-exports of the operator extension traits.

pub use crate::debounce::DebounceExt;
#[cfg(feature = "runtime-tokio")]
pub use crate::interval::interval;
pub use crate::interval::interval_with_timer;
pub use crate::timeout::TimeoutExt;
