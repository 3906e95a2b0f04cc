//! Month-based history filter

use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::content::PostRecord;
use crate::error::FeedError;

/// Canonical `YYYY-MM` key of the month containing `timestamp`
pub fn month_key_of(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%Y-%m").to_string()
}

/// Display label of the month, e.g. `January 2024`
pub fn month_label_of(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%B %Y").to_string()
}

/// The history filter currently applied to the feed
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MonthFilter {
    #[default]
    All,
    Month(String),
}

impl MonthFilter {
    /// Whether `post` passes this filter
    pub fn matches(&self, post: &PostRecord) -> bool {
        match self {
            MonthFilter::All => true,
            MonthFilter::Month(key) => month_key_of(&post.timestamp) == *key,
        }
    }
}

impl fmt::Display for MonthFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthFilter::All => f.write_str("all"),
            MonthFilter::Month(key) => f.write_str(key),
        }
    }
}

impl FromStr for MonthFilter {
    type Err = FeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s == "all" {
            return Ok(MonthFilter::All);
        }
        // A key must name a real month and be written zero padded
        let valid = s.len() == 7
            && NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d").is_ok();
        if valid {
            Ok(MonthFilter::Month(s.to_string()))
        } else {
            Err(FeedError::InvalidFilter(s.to_string()))
        }
    }
}

/// Known months and the active filter
#[derive(Debug, Clone, Default)]
pub struct FilterIndex {
    months: BTreeMap<String, String>,
    active: MonthFilter,
}

impl FilterIndex {
    /// Empty index with the `all` filter active
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a month; registering a known key is a no-op
    pub fn register(&mut self, key: impl Into<String>, label: impl Into<String>) {
        self.months.entry(key.into()).or_insert_with(|| label.into());
    }

    /// Register the month of a post
    pub fn register_post(&mut self, post: &PostRecord) {
        self.register(
            month_key_of(&post.timestamp),
            month_label_of(&post.timestamp),
        );
    }

    pub fn contains(&self, key: &str) -> bool {
        self.months.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.months.len()
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    /// Known `(key, label)` pairs, newest month first
    pub fn months(&self) -> impl Iterator<Item = (&str, &str)> {
        self.months
            .iter()
            .rev()
            .map(|(key, label)| (key.as_str(), label.as_str()))
    }

    pub fn active(&self) -> &MonthFilter {
        &self.active
    }

    /// Switch the active filter
    pub fn select(&mut self, filter: MonthFilter) {
        if self.active != filter {
            tracing::debug!("Filter changed: {} -> {}", self.active, filter);
            self.active = filter;
        }
    }

    /// Whether `post` is visible under `filter`
    pub fn is_visible(post: &PostRecord, filter: &MonthFilter) -> bool {
        filter.matches(post)
    }

    /// Whether `post` is visible under the active filter
    pub fn shows(&self, post: &PostRecord) -> bool {
        Self::is_visible(post, &self.active)
    }
}
