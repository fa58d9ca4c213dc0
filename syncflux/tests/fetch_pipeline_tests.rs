// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::sync::Arc;
use std::time::Duration;
use syncflux::{
    ErrorInfo, ErrorKind, FetchError, FetchPipeline, ObservableStore, RefetchTrigger, SyncConfig,
    SyncState, TokioTimer,
};
use syncflux_test_utils::{Reply, ScriptedSource};
use tokio::time::{pause, Instant};

type Store = ObservableStore<SyncState<u32>>;

fn pipeline(
    source: ScriptedSource<u32>,
    config: SyncConfig,
) -> (FetchPipeline<u32, TokioTimer>, Store) {
    let store = Store::new(SyncState::default());
    let pipeline = FetchPipeline::new(Arc::new(source), store.clone(), config, TokioTimer);
    (pipeline, store)
}

#[tokio::test]
async fn test_start_marks_loading_before_the_source_is_called() -> anyhow::Result<()> {
    pause();

    // Arrange
    let source = ScriptedSource::returning(1);
    let (pipeline, store) = pipeline(source.clone(), SyncConfig::default());
    let previous = ErrorInfo {
        kind: ErrorKind::Source,
        message: "previous".to_string(),
        attempts: 1,
    };
    store.modify(|state| state.error = Some(previous))?;

    // Act
    let fetch = pipeline.start(&RefetchTrigger::Manual);

    // Assert
    let state = store.get();
    assert!(state.loading);
    assert!(state.error.is_none());
    assert_eq!(source.calls(), 0);
    let outcome = fetch.await;
    assert_eq!(outcome.result, Ok(1));
    assert_eq!(outcome.attempts, 1);

    Ok(())
}

#[tokio::test]
async fn test_transient_failures_are_retried_until_success() -> anyhow::Result<()> {
    pause();

    // Arrange
    let source = ScriptedSource::returning(42)
        .then_error(FetchError::source("503"))
        .then_after(Duration::ZERO, Reply::Hang);
    let config = SyncConfig::default()
        .with_max_retries(3)
        .with_timeout(Duration::from_millis(100));
    let (pipeline, store) = pipeline(source.clone(), config);

    // Act
    pipeline.run(&RefetchTrigger::Forced).await?;

    // Assert
    let state = store.get();
    assert_eq!(state.data, Some(42));
    assert!(state.error.is_none());
    assert_eq!(state.refresh_count, 1);
    assert_eq!(source.calls(), 3);

    Ok(())
}

#[tokio::test]
async fn test_unknown_errors_are_not_retried() -> anyhow::Result<()> {
    pause();

    // Arrange
    let source = ScriptedSource::failing(FetchError::unknown("malformed payload"));
    let (pipeline, store) = pipeline(source.clone(), SyncConfig::default().with_max_retries(3));

    // Act
    pipeline.run(&RefetchTrigger::Forced).await?;

    // Assert
    let error = store.get().error.expect("failure recorded");
    assert_eq!(error.kind, ErrorKind::Unknown);
    assert_eq!(error.attempts, 1);
    assert_eq!(source.calls(), 1);

    Ok(())
}

#[tokio::test]
async fn test_exhausted_retries_report_the_last_error() -> anyhow::Result<()> {
    pause();

    // Arrange
    let source = ScriptedSource::failing(FetchError::source("still down"))
        .then_error(FetchError::source("down"));
    let (pipeline, store) = pipeline(source.clone(), SyncConfig::default().with_max_retries(2));

    // Act
    pipeline.run(&RefetchTrigger::Forced).await?;

    // Assert
    let state = store.get();
    let error = state.error.expect("failure recorded");
    assert_eq!(error.message, "Source error: still down");
    assert_eq!(error.attempts, 3);
    assert_eq!(state.refresh_count, 1);
    assert!(!state.loading);
    assert_eq!(source.calls(), 3);

    Ok(())
}

#[tokio::test]
async fn test_retries_back_off_exponentially() -> anyhow::Result<()> {
    pause();

    // Arrange
    let source = ScriptedSource::<u32>::failing(FetchError::source("busy"));
    let config = SyncConfig::default()
        .with_max_retries(3)
        .with_retry_backoff(Duration::from_millis(100))
        .with_timeout(Duration::from_secs(1));
    let (pipeline, _store) = pipeline(source, config);
    let started = Instant::now();

    // Act
    let outcome = pipeline.attempt_with_retries().await;

    // Assert
    let elapsed = started.elapsed();
    assert_eq!(outcome.attempts, 4);
    assert!(elapsed >= Duration::from_millis(700), "{elapsed:?}");
    assert!(elapsed < Duration::from_millis(710), "{elapsed:?}");

    Ok(())
}

#[tokio::test]
async fn test_each_attempt_is_bounded_by_the_timeout() -> anyhow::Result<()> {
    pause();

    // Arrange
    let source = ScriptedSource::<u32>::hanging();
    let config = SyncConfig::default()
        .with_max_retries(0)
        .with_timeout(Duration::from_millis(250));
    let (pipeline, store) = pipeline(source.clone(), config);
    let started = Instant::now();

    // Act
    pipeline.run(&RefetchTrigger::Periodic).await?;

    // Assert
    assert!(started.elapsed() >= Duration::from_millis(250));
    let error = store.get().error.expect("timeout recorded");
    assert_eq!(error.kind, ErrorKind::Timeout);
    assert_eq!(source.in_flight(), 0);

    Ok(())
}

#[tokio::test]
async fn test_panicking_source_still_settles() -> anyhow::Result<()> {
    pause();

    // Arrange
    let source = ScriptedSource::<u32>::new(Reply::Panic);
    let (pipeline, store) = pipeline(source, SyncConfig::default());

    // Act
    pipeline.run(&RefetchTrigger::Forced).await?;

    // Assert
    let state = store.get();
    assert!(!state.loading);
    assert_eq!(state.error.map(|error| error.kind), Some(ErrorKind::Unknown));

    Ok(())
}

#[tokio::test]
async fn test_completing_into_a_closed_store_fails() -> anyhow::Result<()> {
    pause();

    // Arrange
    let source = ScriptedSource::returning(5);
    let (pipeline, store) = pipeline(source, SyncConfig::default());
    let fetch = pipeline.start(&RefetchTrigger::Manual);
    store.close();

    // Act
    let result = pipeline.complete(fetch.await);

    // Assert
    assert_eq!(result, Err(syncflux::StoreError::Closed));

    Ok(())
}
