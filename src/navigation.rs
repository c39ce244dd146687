//! Match navigation and the search session that owns it.
//!
//! [`MatchNavigator`] holds the current match set and a focus cursor.
//! [`SearchSession`] layers the search-mode toggle on top: entering and
//! leaving search, re-running the query when it or the text changes, and
//! saving/restoring that state between runs.
//!
//! The session has two states:
//! - **Inactive**: no search; queries are ignored.
//! - **Active**: matches are highlighted and navigable with next/previous.

use serde::{Deserialize, Serialize};

use crate::search::{find_match_ranges, MatchRange, SearchQuery};

// ---------------------------------------------------------------------------
// Match navigator
// ---------------------------------------------------------------------------

/// Ordered match set plus the index of the focused match.
///
/// The focus is `None` exactly when the set is empty; otherwise it is a
/// valid index. Every mutation preserves that.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchNavigator {
    matches: Vec<MatchRange>,
    active: Option<usize>,
}

impl MatchNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the match set and focus the first match.
    pub fn set_matches(&mut self, ranges: Vec<MatchRange>) {
        self.active = if ranges.is_empty() { None } else { Some(0) };
        self.matches = ranges;
    }

    /// Drop all matches.
    pub fn clear(&mut self) {
        self.matches.clear();
        self.active = None;
    }

    /// Focus the next match, wrapping from the last to the first.
    pub fn move_next(&mut self) {
        if let Some(idx) = self.active {
            self.active = Some((idx + 1) % self.matches.len());
        }
    }

    /// Focus the previous match, wrapping from the first to the last.
    pub fn move_previous(&mut self) {
        if let Some(idx) = self.active {
            self.active = Some(if idx == 0 {
                self.matches.len() - 1
            } else {
                idx - 1
            });
        }
    }

    /// Move the focus `steps` matches forward, or backward when negative,
    /// wrapping at either end.
    pub fn move_by(&mut self, steps: i64) {
        if let Some(idx) = self.active {
            let len = self.matches.len();
            // len fits in i64 for any Vec; the remainder is below len.
            let shift = steps.rem_euclid(len as i64) as usize;
            self.active = Some((idx + shift) % len);
        }
    }

    /// Focus the match at `index`. Out-of-range indices are ignored.
    pub fn move_to(&mut self, index: usize) {
        if index < self.matches.len() {
            self.active = Some(index);
        }
    }

    /// The focused match, if any.
    pub fn current(&self) -> Option<MatchRange> {
        self.active.and_then(|idx| self.matches.get(idx).copied())
    }

    /// Every match, in reading order.
    pub fn all(&self) -> &[MatchRange] {
        &self.matches
    }

    pub fn position(&self) -> Option<usize> {
        self.active
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Search session
// ---------------------------------------------------------------------------

/// Whether search mode is on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchMode {
    #[default]
    Inactive,
    Active,
}

/// Search state persisted between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedSearch {
    pub is_search: bool,
    pub query: String,
    pub position: usize,
}

/// A search-mode session over one text body.
#[derive(Debug, Clone)]
pub struct SearchSession {
    mode: SearchMode,
    query: String,
    ignore_case: bool,
    navigator: MatchNavigator,
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new(true)
    }
}

impl SearchSession {
    pub fn new(ignore_case: bool) -> Self {
        Self {
            mode: SearchMode::Inactive,
            query: String::new(),
            ignore_case,
            navigator: MatchNavigator::new(),
        }
    }

    /// Turn search mode on. A previous query is kept so it can be re-run.
    pub fn enter(&mut self) {
        self.mode = SearchMode::Active;
    }

    /// Turn search mode off, discarding the query and all matches.
    pub fn exit(&mut self) {
        self.mode = SearchMode::Inactive;
        self.query.clear();
        self.navigator.clear();
    }

    /// Run `query` against `text`, focusing the first hit.
    ///
    /// Ignored while search mode is off.
    pub fn search(&mut self, text: Option<&str>, query: &str) {
        if self.mode != SearchMode::Active {
            return;
        }
        self.query = query.to_string();
        self.recompute(text);
    }

    /// Re-run the current query after the text body changed.
    pub fn text_changed(&mut self, text: Option<&str>) {
        if self.mode != SearchMode::Active {
            return;
        }
        self.recompute(text);
    }

    fn recompute(&mut self, text: Option<&str>) {
        let query = SearchQuery {
            text: self.query.clone(),
            ignore_case: self.ignore_case,
        };
        let ranges = find_match_ranges(text, &query);
        tracing::debug!(query = %self.query, matches = ranges.len(), "search recomputed");
        self.navigator.set_matches(ranges);
    }

    pub fn next(&mut self) {
        self.navigator.move_next();
    }

    pub fn previous(&mut self) {
        self.navigator.move_previous();
    }

    pub fn move_by(&mut self, steps: i64) {
        self.navigator.move_by(steps);
    }

    pub fn navigator(&self) -> &MatchNavigator {
        &self.navigator
    }

    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    pub fn is_active(&self) -> bool {
        self.mode == SearchMode::Active
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn ignore_case(&self) -> bool {
        self.ignore_case
    }

    pub fn results_count(&self) -> usize {
        self.navigator.len()
    }

    /// Zero-based index of the focused match; 0 when there are none.
    pub fn search_position(&self) -> usize {
        self.navigator.position().unwrap_or(0)
    }

    /// Format the match counter for display (e.g. `"[3/17]"`).
    ///
    /// Returns `None` when search mode is off.
    pub fn match_counter_display(&self) -> Option<String> {
        if !self.is_active() {
            return None;
        }
        match self.navigator.position() {
            Some(idx) => Some(format!("[{}/{}]", idx + 1, self.navigator.len())),
            None => Some("[0/0]".to_string()),
        }
    }

    pub fn snapshot(&self) -> SavedSearch {
        SavedSearch {
            is_search: self.is_active(),
            query: self.query.clone(),
            position: self.search_position(),
        }
    }

    /// Re-enter a saved search over `text`.
    ///
    /// A saved position past the end of the new match set leaves the focus
    /// on the first match.
    pub fn restore(&mut self, saved: &SavedSearch, text: Option<&str>) {
        if !saved.is_search {
            self.exit();
            return;
        }
        self.enter();
        self.search(text, &saved.query);
        self.navigator.move_to(saved.position);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
