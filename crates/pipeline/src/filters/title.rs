//! Filter for titles that signal a role is too senior.

use crate::traits::Filter;

/// Markers that usually mean the role expects significant experience.
pub const SENIORITY_MARKERS: &[&str] = &["Manager", "Senior", "Sr", "II"];

/// Rejects records whose title contains any configured marker.
///
/// Matching is a case-sensitive substring check, so "II" also catches
/// "III" and "Sr" catches "Sr." without extra entries.
pub struct TitleExcludesFilter<T> {
    markers: Vec<String>,
    title: fn(&T) -> &str,
}

impl<T> TitleExcludesFilter<T> {
    /// Create a filter with an explicit marker list.
    pub fn new<I, S>(title: fn(&T) -> &str, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            markers: markers.into_iter().map(Into::into).collect(),
            title,
        }
    }

    /// Create a filter using [`SENIORITY_MARKERS`].
    pub fn seniority(title: fn(&T) -> &str) -> Self {
        Self::new(title, SENIORITY_MARKERS.iter().copied())
    }
}

impl<T> Filter<T> for TitleExcludesFilter<T> {
    fn name(&self) -> &str {
        "TitleExcludesFilter"
    }

    fn keep(&self, record: &T) -> bool {
        let title = (self.title)(record);
        !self.markers.iter().any(|marker| title.contains(marker.as_str()))
    }
}
