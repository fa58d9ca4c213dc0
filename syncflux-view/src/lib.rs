// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Filter and derivation layer.
//!
//! A [`Derivation`] turns the latest synchronized payload and the latest
//! [`FilterSpec`] into a view model. [`Memoized`] caches the result until one of
//! the two inputs changes structurally, and [`derived_view`] wires both inputs
//! as streams and emits each distinct view model.

pub mod dashboard;
pub mod derivation;
pub mod derived_view;
pub mod filter_spec;
pub mod users;

pub use self::dashboard::{
    ChartPoint, ChartSeries, DashboardDerivation, DashboardMetrics, DashboardView, MetricCard,
    TrendPoint,
};
pub use self::derivation::{Derivation, Memoized};
pub use self::derived_view::derived_view;
pub use self::filter_spec::FilterSpec;
pub use self::users::{User, UserDirectoryDerivation, UserPage};
