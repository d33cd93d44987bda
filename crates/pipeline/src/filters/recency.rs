//! Filters that drop stale postings.
//!
//! Upstreams report freshness either as free text ("5 days ago",
//! "2 months ago") or as a timestamp, so there is one filter for each.

use crate::traits::Filter;
use chrono::{DateTime, TimeDelta, Utc};
use regex::Regex;
use std::sync::LazyLock;

static LEADING_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+").expect("number pattern is valid"));

/// Filters on a free-text "time since updated" field.
///
/// ## Algorithm
/// 1. Any mention of "year" means the posting is at least a year old: reject
/// 2. A mention of "month" keeps the posting only when the first number in
///    the text is at most `max_months` ("a month ago" counts as 1)
/// 3. Anything else (days, hours, minutes) is recent enough
pub struct UpdatedRecencyFilter<T> {
    updated: fn(&T) -> &str,
    max_months: u32,
}

impl<T> UpdatedRecencyFilter<T> {
    pub fn new(updated: fn(&T) -> &str, max_months: u32) -> Self {
        Self {
            updated,
            max_months,
        }
    }

    fn months_ago(text: &str) -> Option<u32> {
        match LEADING_NUMBER.find(text) {
            Some(number) => number.as_str().parse().ok(),
            None if text.contains("a month") || text.contains("one month") => Some(1),
            None => None,
        }
    }
}

impl<T> Filter<T> for UpdatedRecencyFilter<T> {
    fn name(&self) -> &str {
        "UpdatedRecencyFilter"
    }

    fn keep(&self, record: &T) -> bool {
        let text = (self.updated)(record).to_lowercase();

        if text.contains("year") {
            return false;
        }
        if text.contains("month") {
            return Self::months_ago(&text).is_some_and(|months| months <= self.max_months);
        }
        true
    }
}

/// Keeps records whose timestamp falls within `max_age` of `now`.
///
/// Records without a usable timestamp are dropped.
pub struct MaxAgeFilter<T> {
    timestamp: fn(&T) -> Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    max_age: TimeDelta,
}

impl<T> MaxAgeFilter<T> {
    pub fn new(timestamp: fn(&T) -> Option<DateTime<Utc>>, max_age: TimeDelta) -> Self {
        Self::at(timestamp, max_age, Utc::now())
    }

    /// Evaluate ages relative to a fixed instant.
    pub fn at(
        timestamp: fn(&T) -> Option<DateTime<Utc>>,
        max_age: TimeDelta,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            timestamp,
            now,
            max_age,
        }
    }
}

impl<T> Filter<T> for MaxAgeFilter<T> {
    fn name(&self) -> &str {
        "MaxAgeFilter"
    }

    fn keep(&self, record: &T) -> bool {
        match (self.timestamp)(record) {
            Some(at) => self.now.signed_duration_since(at) <= self.max_age,
            None => false,
        }
    }
}
