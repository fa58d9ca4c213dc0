// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::future;
use std::time::Duration;
use syncflux_core::FetchError;
use syncflux_runtime::TokioTimer;
use syncflux_time::prelude::*;
use tokio::time::{pause, sleep, Instant};

#[tokio::test]
async fn test_fast_future_completes() -> anyhow::Result<()> {
    pause();

    // Arrange
    let work = async {
        sleep(Duration::from_millis(20)).await;
        "done"
    };

    // Act
    let result = work.timeout(Duration::from_millis(100)).await;

    // Assert
    assert_eq!(result, Ok("done"));

    Ok(())
}

#[tokio::test]
async fn test_slow_future_times_out_at_the_deadline() -> anyhow::Result<()> {
    pause();

    // Arrange
    let started = Instant::now();

    // Act
    let result = future::pending::<()>()
        .timeout_with_timer(Duration::from_millis(50), &TokioTimer)
        .await;

    // Assert
    assert_eq!(result, Err(FetchError::timeout(Duration::from_millis(50))));
    assert!(started.elapsed() >= Duration::from_millis(50));
    assert!(result
        .err()
        .is_some_and(|error| error.to_string().contains("50ms")));

    Ok(())
}

#[tokio::test]
async fn test_ready_future_wins_against_an_elapsed_timer() -> anyhow::Result<()> {
    // Arrange
    let ready = future::ready(7);

    // Act
    let result = ready.timeout(Duration::ZERO).await;

    // Assert
    assert_eq!(result, Ok(7));

    Ok(())
}
