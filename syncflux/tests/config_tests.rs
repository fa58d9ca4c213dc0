// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::time::Duration;
use syncflux::{CoalescePolicy, ConfigError, SyncConfig};

#[test]
fn test_defaults_match_documented_values() {
    let config = SyncConfig::default();

    assert_eq!(config.polling_interval, Duration::from_millis(30_000));
    assert_eq!(config.stale_threshold, Duration::from_millis(60_000));
    assert_eq!(config.staleness_check_interval, Duration::from_millis(10_000));
    assert_eq!(config.max_retries, 3);
    assert_eq!(config.debounce, Duration::from_millis(300));
    assert_eq!(config.timeout, Duration::from_millis(10_000));
    assert_eq!(config.coalesce, CoalescePolicy::Drop);
    assert!(config.polling_enabled);
    assert!(config.staleness_enabled);
    assert_eq!(config.validate(), Ok(()));
}

#[test]
fn test_empty_toml_yields_defaults() -> anyhow::Result<()> {
    let config = SyncConfig::from_toml_str("")?;

    assert_eq!(config, SyncConfig::default());

    Ok(())
}

#[test]
fn test_toml_accepts_snake_and_camel_case_keys() -> anyhow::Result<()> {
    let config = SyncConfig::from_toml_str(
        r#"
        pollingIntervalMs = 5000
        stale_threshold_ms = 20000
        maxRetries = 2
        debounceMs = 100
        timeout_ms = 50
        coalesce = "follow-up"
        "#,
    )?;

    assert_eq!(config.polling_interval, Duration::from_secs(5));
    assert_eq!(config.stale_threshold, Duration::from_secs(20));
    assert_eq!(config.max_retries, 2);
    assert_eq!(config.debounce, Duration::from_millis(100));
    assert_eq!(config.timeout, Duration::from_millis(50));
    assert_eq!(config.coalesce, CoalescePolicy::FollowUp);

    Ok(())
}

#[test]
fn test_negative_interval_is_rejected() {
    let result = SyncConfig::from_toml_str("polling_interval_ms = -1");

    assert_eq!(
        result,
        Err(ConfigError::Negative {
            field: "polling_interval_ms",
            value: -1
        })
    );
}

#[test]
fn test_negative_retries_are_rejected() {
    let result = SyncConfig::from_toml_str("max_retries = -3");

    assert!(matches!(
        result,
        Err(ConfigError::Negative {
            field: "max_retries",
            ..
        })
    ));
}

#[test]
fn test_zero_timeout_is_rejected() {
    let result = SyncConfig::from_toml_str("timeout_ms = 0");

    assert_eq!(result, Err(ConfigError::Zero { field: "timeout_ms" }));
}

#[test]
fn test_zero_polling_interval_is_allowed_when_polling_is_off() -> anyhow::Result<()> {
    let config = SyncConfig::from_toml_str(
        r#"
        polling_enabled = false
        polling_interval_ms = 0
        "#,
    )?;

    let polling = SyncConfig {
        polling_enabled: true,
        ..config.clone()
    };

    assert!(!config.polling_enabled);
    assert_eq!(config.validate(), Ok(()));
    assert_eq!(
        polling.validate(),
        Err(ConfigError::Zero {
            field: "polling_interval_ms"
        })
    );
    assert_eq!(
        SyncConfig::default()
            .with_polling_interval(Duration::ZERO)
            .validate(),
        Err(ConfigError::Zero {
            field: "polling_interval_ms"
        })
    );

    Ok(())
}

#[test]
fn test_unknown_keys_are_parse_errors() {
    let result = SyncConfig::from_toml_str("refresh_everything = true");

    assert!(matches!(result, Err(ConfigError::Parse(_))));
}

#[test]
fn test_backoff_doubles_and_is_capped_by_timeout() {
    let config = SyncConfig::default()
        .with_retry_backoff(Duration::from_millis(100))
        .with_timeout(Duration::from_millis(500));

    assert_eq!(config.backoff_for(1), Duration::from_millis(100));
    assert_eq!(config.backoff_for(2), Duration::from_millis(200));
    assert_eq!(config.backoff_for(3), Duration::from_millis(400));
    assert_eq!(config.backoff_for(4), Duration::from_millis(500));
    assert_eq!(config.backoff_for(64), Duration::from_millis(500));
}

#[test]
fn test_config_errors_read_well() {
    let error = ConfigError::Zero { field: "timeout_ms" };

    assert_eq!(
        error.to_string(),
        "Invalid configuration: `timeout_ms` must be greater than zero"
    );
}
