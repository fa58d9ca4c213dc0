// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Test utilities and fixtures for the syncflux workspace.
//!
//! Designed for development and testing only, not for production code.
//!
//! - [`ScriptedSource`] is a controllable [`DataSource`](syncflux::DataSource):
//!   it replays a script of replies (values, errors, hangs, panics) with
//!   optional delays, and counts calls and concurrent fetches.
//! - [`fixtures`] holds sample dashboard metrics and user lists.
//! - [`helpers`] has stream assertions meant to run under paused Tokio time.
//!
//! # Using Assertion Helpers
//!
//! ```rust
//! use syncflux_test_utils::assert_no_element_emitted;
//! use futures::stream;
//!
//! # async fn example() {
//! let mut empty = stream::pending::<i32>();
//! assert_no_element_emitted(&mut empty, 10).await;
//! # }
//! ```

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
pub mod fixtures;
pub mod helpers;
pub mod scripted_source;
pub mod logging;

pub use helpers::{assert_no_element_emitted, next_matching, unwrap_stream};
pub use scripted_source::{Reply, ScriptedSource};
pub use logging::init_test_tracing;
