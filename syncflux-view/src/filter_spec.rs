// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Plain key/value query owned by the UI layer.
///
/// Keys are kept sorted so two specs with the same entries compare equal
/// regardless of insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSpec {
    entries: BTreeMap<String, String>,
}

impl FilterSpec {
    pub const ROLE: &'static str = "role";
    pub const DEPARTMENT: &'static str = "department";
    pub const SEARCH: &'static str = "search";
    pub const PAGE: &'static str = "page";
    pub const PAGE_SIZE: &'static str = "page_size";

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`FilterSpec::set`].
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Sets `key`; an empty or blank value removes it.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        if value.trim().is_empty() {
            self.entries.remove(&key);
        } else {
            self.entries.insert(key, value);
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.remove(key)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Free-text search term, trimmed.
    #[must_use]
    pub fn search(&self) -> Option<&str> {
        self.get(Self::SEARCH).map(str::trim)
    }

    /// Zero-based page index. Missing or unparsable values mean the first page.
    #[must_use]
    pub fn page(&self) -> usize {
        self.parsed(Self::PAGE).unwrap_or(0)
    }

    /// Page size, falling back to `default` when missing, unparsable or zero.
    #[must_use]
    pub fn page_size(&self, default: usize) -> usize {
        self.parsed(Self::PAGE_SIZE)
            .filter(|size| *size > 0)
            .unwrap_or(default)
    }

    /// Parses the value under `key`.
    pub fn parsed<V: core::str::FromStr>(&self, key: &str) -> Option<V> {
        self.get(key).and_then(|value| value.trim().parse().ok())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FilterSpec {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |spec, (key, value)| spec.with(key, value))
    }
}
