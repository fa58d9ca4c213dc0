// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use syncflux::prelude::*;
use syncflux::view::{DashboardMetrics, User};
use syncflux_test_utils::fixtures::{dashboard_metrics, users};
use syncflux_test_utils::ScriptedSource;
use tokio::time::pause;

fn config() -> SyncConfig {
    SyncConfig::default().without_polling().without_staleness()
}

fn registry_with_two_slices() -> anyhow::Result<SliceRegistry> {
    let registry = SliceRegistry::new();
    registry.register(SyncEngine::new(
        "dashboard",
        ScriptedSource::returning(dashboard_metrics()),
        config(),
    )?)?;
    registry.register(SyncEngine::new(
        "users",
        ScriptedSource::returning(users()),
        config(),
    )?)?;
    Ok(registry)
}

#[tokio::test]
async fn test_engines_are_retrieved_by_name_and_type() -> anyhow::Result<()> {
    pause();

    // Arrange
    let registry = registry_with_two_slices()?;

    // Act
    let dashboard = registry.get::<SyncEngine<DashboardMetrics>>("dashboard");
    let users = registry.get::<SyncEngine<Vec<User>>>("users");

    // Assert
    assert_eq!(dashboard.map(|engine| engine.name().to_string()).as_deref(), Some("dashboard"));
    assert!(users.is_some());
    assert_eq!(registry.names(), vec!["dashboard", "users"]);
    assert_eq!(registry.len(), 2);

    Ok(())
}

#[tokio::test]
async fn test_lookups_share_one_engine() -> anyhow::Result<()> {
    pause();

    // Arrange
    let registry = registry_with_two_slices()?;

    // Act
    let first = registry.get::<SyncEngine<DashboardMetrics>>("dashboard");
    let second = registry.get::<SyncEngine<DashboardMetrics>>("dashboard");

    // Assert
    match (first, second) {
        (Some(first), Some(second)) => assert!(std::sync::Arc::ptr_eq(&first, &second)),
        _ => panic!("dashboard slice should be registered"),
    }

    Ok(())
}

#[tokio::test]
async fn test_wrong_type_or_name_finds_nothing() -> anyhow::Result<()> {
    pause();

    // Arrange
    let registry = registry_with_two_slices()?;

    // Act & Assert
    assert!(registry.get::<SyncEngine<Vec<User>>>("dashboard").is_none());
    assert!(registry.get::<SyncEngine<DashboardMetrics>>("incidents").is_none());

    Ok(())
}

#[tokio::test]
async fn test_duplicate_names_are_rejected() -> anyhow::Result<()> {
    pause();

    // Arrange
    let registry = registry_with_two_slices()?;
    let duplicate = SyncEngine::new(
        "users",
        ScriptedSource::returning(Vec::<User>::new()),
        config(),
    )?;

    // Act
    let result = registry.register(duplicate);

    // Assert
    assert_eq!(
        result.err(),
        Some(SyncError::DuplicateSlice {
            slice: "users".to_string()
        })
    );
    assert_eq!(registry.len(), 2);

    Ok(())
}

#[tokio::test]
async fn test_destroy_all_tears_down_every_slice() -> anyhow::Result<()> {
    pause();

    // Arrange
    let registry = registry_with_two_slices()?;
    let dashboard = registry
        .get::<SyncEngine<DashboardMetrics>>("dashboard")
        .ok_or_else(|| anyhow::anyhow!("missing dashboard"))?;

    // Act
    registry.destroy_all();

    // Assert
    assert!(registry.is_empty());
    assert!(dashboard.is_destroyed());
    assert!(dashboard.refresh().is_err());

    Ok(())
}

#[tokio::test]
async fn test_remove_destroys_one_slice() -> anyhow::Result<()> {
    pause();

    // Arrange
    let registry = registry_with_two_slices()?;
    let users = registry
        .get::<SyncEngine<Vec<User>>>("users")
        .ok_or_else(|| anyhow::anyhow!("missing users"))?;

    // Act
    let removed = registry.remove("users");

    // Assert
    assert!(removed);
    assert!(users.is_destroyed());
    assert!(!registry.contains("users"));
    assert!(registry.contains("dashboard"));
    assert!(!registry.remove("users"));

    Ok(())
}
