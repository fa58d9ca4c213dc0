// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::channel::mpsc;
use futures::StreamExt;
use std::time::Duration;
use syncflux_test_utils::{assert_no_element_emitted, unwrap_stream};
use syncflux_time::prelude::*;
use tokio::task::yield_now;
use tokio::time::{advance, pause};

#[tokio::test]
async fn test_debounce_emits_after_quiet_period() -> anyhow::Result<()> {
    pause();

    // Arrange
    let (tx, rx) = mpsc::unbounded();
    let mut debounced = Box::pin(rx.debounce(Duration::from_millis(500)));

    // Act
    tx.unbounded_send("alice")?;
    yield_now().await;

    // Assert
    assert_no_element_emitted(&mut debounced, 0).await;
    advance(Duration::from_millis(400)).await;
    assert_no_element_emitted(&mut debounced, 0).await;
    advance(Duration::from_millis(100)).await;
    assert_eq!(unwrap_stream(&mut debounced, 10).await, "alice");

    Ok(())
}

#[tokio::test]
async fn test_debounce_resets_on_new_value() -> anyhow::Result<()> {
    pause();

    // Arrange
    let (tx, rx) = mpsc::unbounded();
    let mut debounced = Box::pin(rx.debounce(Duration::from_millis(500)));

    // Act
    tx.unbounded_send("alice")?;
    assert_no_element_emitted(&mut debounced, 300).await;
    tx.unbounded_send("bob")?;
    assert_no_element_emitted(&mut debounced, 300).await;

    // Assert
    assert_eq!(unwrap_stream(&mut debounced, 300).await, "bob");
    assert_no_element_emitted(&mut debounced, 1_000).await;

    Ok(())
}

#[tokio::test]
async fn test_debounce_flushes_pending_value_when_source_ends() -> anyhow::Result<()> {
    pause();

    // Arrange
    let (tx, rx) = mpsc::unbounded();
    let mut debounced = Box::pin(rx.debounce(Duration::from_secs(10)));
    tx.unbounded_send(1)?;
    tx.unbounded_send(2)?;

    // Act
    drop(tx);

    // Assert
    assert_eq!(unwrap_stream(&mut debounced, 1).await, 2);
    assert_eq!(debounced.next().await, None);

    Ok(())
}

#[tokio::test]
async fn test_debounce_of_empty_source_ends_without_emitting() -> anyhow::Result<()> {
    // Arrange
    let debounced = futures::stream::iter(Vec::<u8>::new()).debounce(Duration::from_millis(10));

    // Act
    let items: Vec<u8> = debounced.collect().await;

    // Assert
    assert!(items.is_empty());

    Ok(())
}
