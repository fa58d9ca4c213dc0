// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::time::Duration;
use syncflux_core::{ConfigError, FetchError, StoreError, SyncError};

#[test]
fn test_transient_classification() {
    assert!(FetchError::timeout(Duration::from_secs(1)).is_transient());
    assert!(FetchError::source("503").is_transient());
    assert!(!FetchError::unknown("corrupt payload").is_transient());
}

#[test]
fn test_boxed_error_converts_to_source_error() {
    let boxed: Box<dyn std::error::Error + Send + Sync> = "connection reset".into();

    let error = FetchError::from(boxed);

    assert_eq!(error, FetchError::Source("connection reset".into()));
}

#[test]
fn test_sync_error_wraps_config_and_store_errors() {
    let config: SyncError = ConfigError::Zero {
        field: "timeout_ms",
    }
    .into();
    let store: SyncError = StoreError::Closed.into();

    assert_eq!(
        config.to_string(),
        "Invalid configuration: `timeout_ms` must be greater than zero"
    );
    assert_eq!(store.to_string(), "Store is closed");
}

#[test]
fn test_destroyed_error_names_the_slice() {
    let error = SyncError::destroyed("users");

    assert_eq!(error.to_string(), "Sync engine `users` has been destroyed");
}
