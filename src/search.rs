//! Match finder for in-article search.
//!
//! The query is always matched as literal text: regex metacharacters are
//! escaped before the matcher is built. Offsets are reported in characters
//! (Unicode scalar values), not bytes, so they line up with what a reader
//! sees and with the ranges the renderer decorates.
//!
//! After every hit the scan resumes one character past that hit's start,
//! which means overlapping occurrences are all reported (`"aa"` in `"aaa"`
//! yields offsets 0 and 1).

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

/// A search query plus its case-sensitivity flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub text: String,
    /// Case-insensitive matching when true (the default).
    pub ignore_case: bool,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ignore_case: true,
        }
    }

    pub fn case_sensitive(mut self) -> Self {
        self.ignore_case = false;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Find every occurrence of this query in `text`.
    pub fn find_in(&self, text: Option<&str>) -> Vec<MatchRange> {
        find_match_ranges(text, self)
    }
}

// ---------------------------------------------------------------------------
// Match range
// ---------------------------------------------------------------------------

/// A half-open `[start, end)` interval of character offsets marking one hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchRange {
    pub start: usize,
    pub end: usize,
}

impl MatchRange {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "match range start {start} > end {end}");
        Self { start, end }
    }

    /// Number of characters covered.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether the character at `offset` lies inside this range.
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }
}

// ---------------------------------------------------------------------------
// Matching engine
// ---------------------------------------------------------------------------

/// Return the character offset of every occurrence of `query` in `text`.
///
/// An absent `text` is treated as empty. An empty `query` never matches,
/// even against a non-empty text.
pub fn find_matches(text: Option<&str>, query: &str, ignore_case: bool) -> Vec<usize> {
    let text = text.unwrap_or_default();
    let hits = scan_byte_ranges(text, query, ignore_case);
    let index = CharIndex::new(text);
    hits.into_iter()
        .map(|(start, _)| index.char_offset(start))
        .collect()
}

/// Like [`find_matches`] but returns full `[start, end)` character ranges.
///
/// `end` is the end of the text actually matched, which for
/// case-insensitive matches is not necessarily `start + query.len()` in
/// bytes.
pub fn find_match_ranges(text: Option<&str>, query: &SearchQuery) -> Vec<MatchRange> {
    let text = text.unwrap_or_default();
    let hits = scan_byte_ranges(text, &query.text, query.ignore_case);
    let index = CharIndex::new(text);
    hits.into_iter()
        .map(|(start, end)| MatchRange::new(index.char_offset(start), index.char_offset(end)))
        .collect()
}

/// Build a literal matcher for `query`.
///
/// Returns `None` only if the regex engine rejects the pattern, which for
/// an escaped literal can only happen when it exceeds the compiled size
/// limit.
fn build_matcher(query: &str, ignore_case: bool) -> Option<Regex> {
    match RegexBuilder::new(&regex::escape(query))
        .case_insensitive(ignore_case)
        .build()
    {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::warn!(query_len = query.len(), error = %e, "search query rejected");
            None
        }
    }
}

/// Scan `text` for `query`, returning byte ranges into `text`.
///
/// The next search starts one character after the previous hit's start,
/// so overlapping hits are kept.
fn scan_byte_ranges(text: &str, query: &str, ignore_case: bool) -> Vec<(usize, usize)> {
    if query.is_empty() || text.is_empty() {
        return Vec::new();
    }
    let Some(matcher) = build_matcher(query, ignore_case) else {
        return Vec::new();
    };

    let mut results = Vec::new();
    let mut pos = 0;
    while pos <= text.len() {
        let Some(m) = matcher.find_at(text, pos) else {
            break;
        };
        results.push((m.start(), m.end()));
        // Step over exactly one character so `pos` stays on a char boundary.
        let step = text[m.start()..]
            .chars()
            .next()
            .map_or(1, char::len_utf8);
        pos = m.start() + step;
    }
    results
}

/// Maps byte offsets in a string to character offsets.
struct CharIndex {
    /// Byte offset of every character start, in order.
    starts: Vec<usize>,
}

impl CharIndex {
    fn new(text: &str) -> Self {
        Self {
            starts: text.char_indices().map(|(b, _)| b).collect(),
        }
    }

    /// Character offset of the char boundary at `byte`. A byte offset equal
    /// to the text length maps to the character count.
    fn char_offset(&self, byte: usize) -> usize {
        self.starts.partition_point(|&s| s < byte)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
