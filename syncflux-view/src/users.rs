// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! User directory slice: filtered, paginated user lists.

use crate::derivation::Derivation;
use crate::filter_spec::FilterSpec;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub role: String,
    pub department: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

const fn default_active() -> bool {
    true
}

/// One page of the filtered directory.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserPage {
    pub users: Vec<User>,
    /// Users matching the filter across all pages.
    pub total_matches: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
}

impl UserPage {
    #[must_use]
    pub const fn empty(page: usize, page_size: usize) -> Self {
        Self {
            users: Vec::new(),
            total_matches: 0,
            page,
            page_size,
            total_pages: 0,
        }
    }

    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page.saturating_add(1) < self.total_pages
    }
}

/// Filters users by role, department and free text, then paginates.
///
/// Role and department match exactly, ignoring case. The search term matches a
/// substring of the name or the email, ignoring case. Pages are zero-based; a
/// page past the end yields no users but still reports the totals.
#[derive(Debug, Clone, Copy)]
pub struct UserDirectoryDerivation {
    pub default_page_size: usize,
}

impl Default for UserDirectoryDerivation {
    fn default() -> Self {
        Self {
            default_page_size: 20,
        }
    }
}

impl UserDirectoryDerivation {
    fn matches(user: &User, filter: &FilterSpec) -> bool {
        let field_matches = |key: &str, value: &str| {
            filter
                .get(key)
                .map_or(true, |wanted| wanted.trim().eq_ignore_ascii_case(value))
        };
        let search_matches = filter.search().map_or(true, |term| {
            let term = term.to_lowercase();
            user.name.to_lowercase().contains(&term) || user.email.to_lowercase().contains(&term)
        });

        field_matches(FilterSpec::ROLE, &user.role)
            && field_matches(FilterSpec::DEPARTMENT, &user.department)
            && search_matches
    }
}

impl Derivation<Vec<User>> for UserDirectoryDerivation {
    type View = UserPage;

    fn derive(&self, data: Option<&Vec<User>>, filter: &FilterSpec) -> UserPage {
        let page = filter.page();
        let page_size = filter.page_size(self.default_page_size.max(1));

        let Some(users) = data else {
            return UserPage::empty(page, page_size);
        };

        let matching: Vec<&User> = users
            .iter()
            .filter(|user| Self::matches(user, filter))
            .collect();
        let total_matches = matching.len();

        UserPage {
            users: matching
                .into_iter()
                .skip(page.saturating_mul(page_size))
                .take(page_size)
                .cloned()
                .collect(),
            total_matches,
            page,
            page_size,
            total_pages: total_matches.div_ceil(page_size),
        }
    }
}
