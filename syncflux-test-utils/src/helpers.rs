// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::stream::{Stream, StreamExt};
use std::time::Duration;
use tokio::time::sleep;

pub async fn assert_no_element_emitted<S, T>(stream: &mut S, timeout_ms: u64)
where
    S: Stream<Item = T> + Unpin,
{
    tokio::select! {
        state = stream.next() => {
            assert!(
                state.is_none(),
                "Unexpected element emitted, expected no output."
            );
        }
        () = sleep(Duration::from_millis(timeout_ms)) => {
        }
    }
}

/// Next item of `stream`, failing the test if it ends or stays silent for `timeout_ms`.
pub async fn unwrap_stream<S, T>(stream: &mut S, timeout_ms: u64) -> T
where
    S: Stream<Item = T> + Unpin,
{
    tokio::select! {
        item = stream.next() => item.expect("stream ended, expected an element"),
        () = sleep(Duration::from_millis(timeout_ms)) => {
            panic!("no element emitted within {timeout_ms}ms")
        }
    }
}

/// Skips items until one satisfies `predicate`; fails the test after `timeout_ms`.
pub async fn next_matching<S, T, F>(stream: &mut S, timeout_ms: u64, mut predicate: F) -> T
where
    S: Stream<Item = T> + Unpin,
    F: FnMut(&T) -> bool,
{
    let search = async {
        while let Some(item) = stream.next().await {
            if predicate(&item) {
                return item;
            }
        }
        panic!("stream ended before a matching element");
    };

    tokio::select! {
        item = search => item,
        () = sleep(Duration::from_millis(timeout_ms)) => {
            panic!("no matching element within {timeout_ms}ms")
        }
    }
}
