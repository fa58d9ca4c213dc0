// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Sample payloads for the dashboard and user directory slices.

use syncflux_view::{DashboardMetrics, TrendPoint, User};

fn trend_point(label: &str, opened: u64, resolved: u64) -> TrendPoint {
    TrendPoint {
        label: label.to_string(),
        opened,
        resolved,
    }
}

pub fn dashboard_metrics() -> DashboardMetrics {
    DashboardMetrics {
        open_incidents: 12,
        critical_incidents: 3,
        resolved_incidents: 40,
        total_requirements: 80,
        completed_requirements: 60,
        active_users: 25,
        trend: vec![
            trend_point("Mon", 4, 2),
            trend_point("Tue", 6, 5),
            trend_point("Wed", 3, 7),
            trend_point("Thu", 5, 4),
        ],
    }
}

/// Same shape as [`dashboard_metrics`] one refresh later.
pub fn dashboard_metrics_updated() -> DashboardMetrics {
    let mut metrics = dashboard_metrics();
    metrics.open_incidents = 9;
    metrics.resolved_incidents = 43;
    metrics.trend.push(trend_point("Fri", 1, 4));
    metrics
}

fn user(id: u64, name: &str, role: &str, department: &str) -> User {
    User {
        id,
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        role: role.to_string(),
        department: department.to_string(),
        active: true,
    }
}

pub fn user_alice() -> User {
    user(1, "Alice Martin", "admin", "Engineering")
}

pub fn user_bob() -> User {
    user(2, "Bob Stone", "viewer", "Support")
}

pub fn user_carol() -> User {
    user(3, "Carol White", "editor", "Engineering")
}

pub fn user_dave() -> User {
    user(4, "Dave Brown", "viewer", "Engineering")
}

pub fn user_erin() -> User {
    user(5, "Erin Black", "editor", "Quality")
}

pub fn users() -> Vec<User> {
    vec![
        user_alice(),
        user_bob(),
        user_carol(),
        user_dave(),
        user_erin(),
    ]
}
