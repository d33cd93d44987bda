//! Turning upstream markup into clean requirement lines.
//!
//! Upstreams hand back qualifications as one blob of text laced with line
//! break tags, bullet glyphs or HTML lists. Sources use these helpers to get
//! one trimmed line per requirement.

use regex::Regex;
use scraper::{Html, Selector};
use std::sync::LazyLock;

/// A line holding nothing but an experience duration, e.g. "3+ years".
///
/// These show up when an upstream breaks a sentence across markup; on their
/// own they carry no requirement.
static BARE_DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\d+\+?\s*(years?|months?)$").expect("duration pattern is valid")
});

/// Splits delimited qualification text into clean lines.
///
/// ## Algorithm
/// 1. Remove every strip token (bullet glyphs, stray markup)
/// 2. Split on any of the delimiters
/// 3. Trim each piece
/// 4. Drop empty pieces, pieces starting with an excluded prefix, and bare
///    durations
#[derive(Debug, Clone)]
pub struct BulletSplitter {
    delimiters: Vec<String>,
    strip: Vec<String>,
    excluded_prefixes: Vec<String>,
}

impl BulletSplitter {
    pub fn new<I, S>(delimiters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            delimiters: delimiters
                .into_iter()
                .map(Into::into)
                .filter(|d: &String| !d.is_empty())
                .collect(),
            strip: Vec::new(),
            excluded_prefixes: Vec::new(),
        }
    }

    /// Tokens removed before splitting (builder pattern).
    pub fn strip_tokens<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.strip
            .extend(tokens.into_iter().map(Into::into).filter(|t: &String| !t.is_empty()));
        self
    }

    /// Lines starting with any of these are dropped (builder pattern).
    pub fn exclude_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_prefixes
            .extend(prefixes.into_iter().map(Into::into));
        self
    }

    /// Split a raw blob into requirement lines.
    pub fn split(&self, raw: &str) -> Vec<String> {
        let mut text = raw.to_string();
        for token in &self.strip {
            text = text.replace(token.as_str(), "");
        }

        let mut pieces = vec![text];
        for delimiter in &self.delimiters {
            pieces = pieces
                .iter()
                .flat_map(|piece| piece.split(delimiter.as_str()))
                .map(str::to_string)
                .collect();
        }

        self.clean_lines(pieces)
    }

    /// Apply trimming and exclusion rules to lines that are already split.
    pub fn clean_lines<I>(&self, lines: I) -> Vec<String>
    where
        I: IntoIterator<Item = String>,
    {
        lines
            .into_iter()
            .map(|line| line.trim().to_string())
            .filter(|line| self.is_requirement(line))
            .collect()
    }

    fn is_requirement(&self, line: &str) -> bool {
        !line.is_empty()
            && !self
                .excluded_prefixes
                .iter()
                .any(|prefix| line.starts_with(prefix.as_str()))
            && !BARE_DURATION.is_match(line)
    }
}

/// Decode one layer of HTML escaping.
///
/// Greenhouse serves posting bodies as escaped markup, so entities written by
/// the posting author arrive escaped twice. This peels off the outer layer and
/// leaves markup that can be parsed with the helpers below.
pub fn unescape_markup(escaped: &str) -> String {
    Html::parse_fragment(escaped)
        .root_element()
        .text()
        .collect()
}

/// All text of an HTML fragment, entities decoded and whitespace collapsed.
pub fn fragment_text(html: &str) -> String {
    collapse_whitespace(Html::parse_fragment(html).root_element().text())
}

/// Text of every element matching `css`, in document order, empty ones skipped.
pub fn element_texts(html: &str, css: &str) -> Vec<String> {
    let Ok(selector) = Selector::parse(css) else {
        return Vec::new();
    };
    Html::parse_fragment(html)
        .select(&selector)
        .map(|element| collapse_whitespace(element.text()))
        .filter(|text| !text.is_empty())
        .collect()
}

/// Items of every HTML list in `html`.
pub fn list_items(html: &str) -> Vec<String> {
    element_texts(html, "li")
}

/// Paragraphs of `html`.
pub fn paragraphs(html: &str) -> Vec<String> {
    element_texts(html, "p")
}

// Text nodes are joined with a space so adjacent blocks don't run together.
// NBSP counts as whitespace, so `&nbsp;` separated words get a plain space.
fn collapse_whitespace<'a>(pieces: impl Iterator<Item = &'a str>) -> String {
    pieces
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// First non-empty paragraph of plain text.
pub fn first_paragraph(text: &str) -> String {
    text.split("\n\n")
        .flat_map(|block| block.split('\n'))
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or_default()
        .to_string()
}
