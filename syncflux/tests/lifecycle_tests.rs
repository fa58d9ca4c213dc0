// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::StreamExt;
use std::time::Duration;
use syncflux::prelude::*;
use syncflux_test_utils::fixtures::dashboard_metrics;
use syncflux_test_utils::{next_matching, ScriptedSource};
use tokio::task::yield_now;
use tokio::time::{advance, pause};

#[tokio::test]
async fn test_destroy_completes_subscribers_and_rejects_triggers() -> anyhow::Result<()> {
    pause();

    // Arrange
    let source = ScriptedSource::returning(dashboard_metrics());
    let config = SyncConfig::default().with_polling_interval(Duration::from_secs(1));
    let engine = SyncEngine::new("dashboard", source.clone(), config)?;
    let mut states = engine.subscribe()?;
    next_matching(&mut states, 1_000, |state| state.refresh_count == 1).await;

    // Act
    engine.destroy();

    // Assert
    let remaining = tokio::time::timeout(Duration::from_millis(100), async {
        while states.next().await.is_some() {}
    })
    .await;
    assert!(remaining.is_ok(), "subscriber stream did not complete");
    assert_eq!(
        engine.refresh(),
        Err(SyncError::destroyed("dashboard"))
    );
    assert!(engine.force_refresh().is_err());
    assert!(engine.notify_action("user-created").is_err());
    assert!(engine.subscribe().is_err());
    assert!(engine.project(|state| state.loading).is_err());
    assert!(engine.is_destroyed());

    Ok(())
}

#[tokio::test]
async fn test_destroy_stops_polling_and_staleness_timers() -> anyhow::Result<()> {
    pause();

    // Arrange
    let source = ScriptedSource::returning(dashboard_metrics());
    let config = SyncConfig::default()
        .with_polling_interval(Duration::from_secs(1))
        .with_stale_threshold(Duration::from_secs(2))
        .with_staleness_check_interval(Duration::from_millis(500));
    let engine = SyncEngine::new("dashboard", source.clone(), config)?;
    yield_now().await;
    assert_eq!(source.calls(), 1);

    // Act
    engine.destroy();
    advance(Duration::from_secs(60)).await;
    yield_now().await;

    // Assert
    assert_eq!(source.calls(), 1);
    let state = engine.state();
    assert_eq!(state.refresh_count, 1);
    assert!(!state.is_stale);

    Ok(())
}

#[tokio::test]
async fn test_destroy_abandons_in_flight_fetch() -> anyhow::Result<()> {
    pause();

    // Arrange
    let source =
        ScriptedSource::returning(dashboard_metrics()).with_delay(Duration::from_millis(500));
    let config = SyncConfig::default().without_polling().without_staleness();
    let engine = SyncEngine::new("dashboard", source.clone(), config)?;
    engine.force_refresh()?;
    yield_now().await;
    assert_eq!(source.in_flight(), 1);

    // Act
    engine.destroy();
    yield_now().await;
    advance(Duration::from_secs(1)).await;

    // Assert
    let state = engine.state();
    assert_eq!(source.in_flight(), 0);
    assert_eq!(state.refresh_count, 0);
    assert!(!state.loading);
    assert_eq!(state.data, None);

    Ok(())
}

#[tokio::test]
async fn test_destroy_is_idempotent() -> anyhow::Result<()> {
    pause();

    // Arrange
    let source = ScriptedSource::returning(dashboard_metrics());
    let engine = SyncEngine::new("dashboard", source, SyncConfig::default())?;

    // Act
    engine.destroy();
    engine.destroy();

    // Assert
    assert!(engine.is_destroyed());
    assert_eq!(engine.name(), "dashboard");

    Ok(())
}

#[tokio::test]
async fn test_mutation_after_destroy_fails() -> anyhow::Result<()> {
    pause();

    // Arrange
    let source = ScriptedSource::returning(dashboard_metrics());
    let engine = SyncEngine::new("dashboard", source, SyncConfig::default())?;
    engine.destroy();

    // Act
    let result = engine
        .mutate_and_resync(async { Ok::<_, SyncError>(()) })
        .await;

    // Assert
    assert_eq!(result, Err(SyncError::destroyed("dashboard")));

    Ok(())
}

#[tokio::test]
async fn test_dropping_the_engine_completes_subscribers() -> anyhow::Result<()> {
    pause();

    // Arrange
    let source = ScriptedSource::returning(dashboard_metrics());
    let config = SyncConfig::default().without_polling();
    let engine = SyncEngine::new("dashboard", source, config)?;
    let mut states = engine.subscribe()?;
    assert!(states.next().await.is_some());

    // Act
    drop(engine);

    // Assert
    assert!(states.next().await.is_none());

    Ok(())
}
