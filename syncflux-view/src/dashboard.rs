// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Dashboard metrics slice: summary cards and incident trend charts.

use crate::derivation::Derivation;
use crate::filter_spec::FilterSpec;
use serde::{Deserialize, Serialize};

/// Aggregated figures served by the dashboard metrics source.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DashboardMetrics {
    pub open_incidents: u64,
    pub critical_incidents: u64,
    pub resolved_incidents: u64,
    pub total_requirements: u64,
    pub completed_requirements: u64,
    pub active_users: u64,
    /// Oldest first.
    #[serde(default)]
    pub trend: Vec<TrendPoint>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub label: String,
    pub opened: u64,
    pub resolved: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricCard {
    pub key: String,
    pub label: String,
    pub value: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub name: String,
    pub points: Vec<ChartPoint>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DashboardView {
    pub cards: Vec<MetricCard>,
    pub series: Vec<ChartSeries>,
}

impl DashboardView {
    #[must_use]
    pub fn card(&self, key: &str) -> Option<&MetricCard> {
        self.cards.iter().find(|card| card.key == key)
    }
}

/// Projects [`DashboardMetrics`] into cards and chart series.
///
/// The card set is fixed, so the layout never shifts between the empty state
/// and the first load. The `range` filter keeps only the last N trend points.
#[derive(Debug, Clone, Copy, Default)]
pub struct DashboardDerivation;

impl DashboardDerivation {
    pub const RANGE: &'static str = "range";

    pub const CARDS: [(&'static str, &'static str); 5] = [
        ("open_incidents", "Open incidents"),
        ("critical_incidents", "Critical incidents"),
        ("resolved_incidents", "Resolved incidents"),
        ("requirements_completion", "Requirements completed (%)"),
        ("active_users", "Active users"),
    ];

    fn card_value(metrics: &DashboardMetrics, key: &str) -> u64 {
        match key {
            "open_incidents" => metrics.open_incidents,
            "critical_incidents" => metrics.critical_incidents,
            "resolved_incidents" => metrics.resolved_incidents,
            "requirements_completion" => {
                percentage(metrics.completed_requirements, metrics.total_requirements)
            }
            "active_users" => metrics.active_users,
            _ => 0,
        }
    }
}

fn percentage(part: u64, total: u64) -> u64 {
    if total == 0 {
        0
    } else {
        let ratio = u128::from(part.min(total)) * 100 / u128::from(total);
        u64::try_from(ratio).unwrap_or(100)
    }
}

impl Derivation<DashboardMetrics> for DashboardDerivation {
    type View = DashboardView;

    fn derive(&self, data: Option<&DashboardMetrics>, filter: &FilterSpec) -> DashboardView {
        let cards = Self::CARDS
            .iter()
            .map(|(key, label)| MetricCard {
                key: (*key).to_owned(),
                label: (*label).to_owned(),
                value: data.map_or(0, |metrics| Self::card_value(metrics, key)),
            })
            .collect();

        let Some(metrics) = data else {
            return DashboardView {
                cards,
                series: Vec::new(),
            };
        };

        let range = filter
            .parsed::<usize>(Self::RANGE)
            .unwrap_or(metrics.trend.len())
            .min(metrics.trend.len());
        let window = &metrics.trend[metrics.trend.len() - range..];

        let series_of = |name: &str, pick: fn(&TrendPoint) -> u64| ChartSeries {
            name: name.to_owned(),
            points: window
                .iter()
                .map(|point| ChartPoint {
                    label: point.label.clone(),
                    value: pick(point),
                })
                .collect(),
        };

        DashboardView {
            cards,
            series: vec![
                series_of("Opened", |point| point.opened),
                series_of("Resolved", |point| point.resolved),
            ],
        }
    }
}
