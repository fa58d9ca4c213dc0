// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::stream;
use syncflux_test_utils::{assert_no_element_emitted, next_matching, unwrap_stream};

#[tokio::test]
async fn test_unwrap_stream_returns_next_item() -> anyhow::Result<()> {
    // Arrange
    let mut items = stream::iter(vec![1, 2, 3]);

    // Act
    let first = unwrap_stream(&mut items, 100).await;

    // Assert
    assert_eq!(first, 1);

    Ok(())
}

#[tokio::test]
async fn test_next_matching_skips_until_predicate() -> anyhow::Result<()> {
    // Arrange
    let mut items = stream::iter(vec![1, 2, 3, 4]);

    // Act
    let even = next_matching(&mut items, 100, |item| item % 2 == 0).await;

    // Assert
    assert_eq!(even, 2);
    assert_eq!(unwrap_stream(&mut items, 100).await, 3);

    Ok(())
}

#[tokio::test]
async fn test_silent_stream_passes_no_element_check() -> anyhow::Result<()> {
    // Arrange
    tokio::time::pause();
    let mut silent = stream::pending::<u8>();

    // Act & Assert
    assert_no_element_emitted(&mut silent, 500).await;

    Ok(())
}

#[tokio::test]
#[should_panic(expected = "Unexpected element emitted")]
async fn test_emitting_stream_fails_no_element_check() {
    let mut items = stream::iter(vec![1]);
    assert_no_element_emitted(&mut items, 100).await;
}
