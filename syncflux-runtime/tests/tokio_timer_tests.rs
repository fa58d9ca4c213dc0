// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::time::Duration;
use syncflux_runtime::{Timer, TokioTimer};
use tokio::time::{advance, pause};

#[tokio::test]
async fn test_now_follows_paused_clock() {
    // Arrange
    pause();
    let timer = TokioTimer;
    let start = timer.now();

    // Act
    advance(Duration::from_secs(5)).await;

    // Assert
    assert_eq!(timer.now() - start, Duration::from_secs(5));
}

#[tokio::test]
async fn test_sleep_future_completes_after_duration() {
    // Arrange
    pause();
    let timer = TokioTimer;
    let start = timer.now();

    // Act
    timer.sleep_future(Duration::from_millis(300)).await;

    // Assert
    assert!(timer.now() - start >= Duration::from_millis(300));
}

#[tokio::test]
async fn test_remaining_until_counts_down_to_deadline() {
    // Arrange
    pause();
    let timer = TokioTimer;
    let deadline = timer.now() + Duration::from_secs(10);

    // Act
    advance(Duration::from_secs(4)).await;

    // Assert
    assert_eq!(timer.remaining_until(deadline), Duration::from_secs(6));
}

#[tokio::test]
async fn test_remaining_until_saturates_for_past_deadlines() {
    // Arrange
    pause();
    let timer = TokioTimer;
    let deadline = timer.now();

    // Act
    advance(Duration::from_secs(1)).await;

    // Assert
    assert_eq!(timer.remaining_until(deadline), Duration::ZERO);
}
