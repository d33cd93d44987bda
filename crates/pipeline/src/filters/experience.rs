//! Filter for postings that ask for too many years of experience.

use crate::traits::Filter;
use regex::Regex;
use std::sync::LazyLock;

/// Matches "3 year", "5+ years", "7+ Years" and so on.
static THREE_PLUS_YEARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[3-9]\+? [Yy]ear").expect("experience pattern is valid"));

/// Rejects records whose requirement text mentions three or more years.
pub struct ExperienceCapFilter<T> {
    pattern: Regex,
    text: fn(&T) -> &str,
}

impl<T> ExperienceCapFilter<T> {
    /// Reject anything mentioning 3 to 9 years of experience.
    pub fn new(text: fn(&T) -> &str) -> Self {
        Self {
            pattern: THREE_PLUS_YEARS.clone(),
            text,
        }
    }

    /// Use a custom pattern; a match means the record is rejected.
    pub fn with_pattern(text: fn(&T) -> &str, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            text,
        })
    }
}

impl<T> Filter<T> for ExperienceCapFilter<T> {
    fn name(&self) -> &str {
        "ExperienceCapFilter"
    }

    fn keep(&self, record: &T) -> bool {
        !self.pattern.is_match((self.text)(record))
    }
}
