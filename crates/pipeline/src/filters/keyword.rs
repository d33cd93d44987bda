//! Allow-list filter over a text field.

use crate::traits::Filter;

/// Keeps records whose field contains at least one keyword.
///
/// Comparison is case-insensitive. An empty keyword list keeps everything.
pub struct KeywordFilter<T> {
    name: String,
    keywords: Vec<String>,
    field: fn(&T) -> &str,
}

impl<T> KeywordFilter<T> {
    pub fn new<I, S>(name: impl Into<String>, field: fn(&T) -> &str, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            name: name.into(),
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .collect(),
            field,
        }
    }
}

impl<T> Filter<T> for KeywordFilter<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn keep(&self, record: &T) -> bool {
        if self.keywords.is_empty() {
            return true;
        }
        let value = (self.field)(record).to_lowercase();
        self.keywords.iter().any(|keyword| value.contains(keyword.as_str()))
    }
}
