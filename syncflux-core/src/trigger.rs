// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use core::fmt;
use serde::{Deserialize, Serialize};

/// A reason to refetch a domain slice.
///
/// Created by any caller, consumed by the trigger multiplexer, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RefetchTrigger {
    /// User-initiated refresh; debounced.
    Manual,
    /// Refresh that bypasses the debounce window, e.g. after a mutation.
    Forced,
    /// Emitted by the polling timer.
    Periodic,
    /// Some other part of the application changed the underlying data.
    ExternalAction(String),
}

/// Payload-free tag of a [`RefetchTrigger`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriggerKind {
    Manual,
    Forced,
    Periodic,
    ExternalAction,
}

impl RefetchTrigger {
    #[must_use]
    pub const fn kind(&self) -> TriggerKind {
        match self {
            Self::Manual => TriggerKind::Manual,
            Self::Forced => TriggerKind::Forced,
            Self::Periodic => TriggerKind::Periodic,
            Self::ExternalAction(_) => TriggerKind::ExternalAction,
        }
    }

    /// Only manual triggers go through the debounce window.
    #[must_use]
    pub const fn is_debounced(&self) -> bool {
        matches!(self, Self::Manual)
    }
}

impl fmt::Display for RefetchTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Manual => write!(f, "manual"),
            Self::Forced => write!(f, "forced"),
            Self::Periodic => write!(f, "periodic"),
            Self::ExternalAction(action) => write!(f, "external action `{action}`"),
        }
    }
}
