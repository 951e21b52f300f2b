//! Bounded, newest-first search history.

use crate::config::DEFAULT_HISTORY_SIZE;
use crate::search::advanced::SearchOptions;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One completed search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHistoryEntry {
    /// Query text
    pub query: String,
    /// Options the search ran with
    pub options: SearchOptions,
    /// Number of results found
    pub result_count: usize,
    /// When the search completed
    pub timestamp: DateTime<Utc>,
}

impl SearchHistoryEntry {
    /// Create an entry stamped with the current time.
    pub fn new(query: impl Into<String>, options: SearchOptions, result_count: usize) -> Self {
        Self {
            query: query.into(),
            options,
            result_count,
            timestamp: Utc::now(),
        }
    }
}

/// Past searches, newest first, never longer than `max_size`.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHistory {
    entries: Vec<SearchHistoryEntry>,
    max_size: usize,
}

impl Default for SearchHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_SIZE)
    }
}

impl SearchHistory {
    /// Create a history holding at most `max_size` entries.
    ///
    /// A size of 0 falls back to the default of 50.
    pub fn new(max_size: usize) -> Self {
        let max_size = if max_size == 0 {
            DEFAULT_HISTORY_SIZE
        } else {
            max_size
        };
        Self {
            entries: Vec::new(),
            max_size,
        }
    }

    /// Prepend an entry, dropping the oldest entries beyond the bound.
    pub fn add(&mut self, entry: SearchHistoryEntry) {
        self.entries.insert(0, entry);
        self.entries.truncate(self.max_size);
    }

    /// Record a search that just completed.
    pub fn record(&mut self, query: &str, options: &SearchOptions, result_count: usize) {
        self.add(SearchHistoryEntry::new(query, options.clone(), result_count));
    }

    /// Entries, newest first.
    pub fn entries(&self) -> &[SearchHistoryEntry] {
        &self.entries
    }

    /// Entry at `index` (0 is the newest).
    pub fn get(&self, index: usize) -> Option<&SearchHistoryEntry> {
        self.entries.get(index)
    }

    /// Forget every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no search has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of entries.
    pub fn max_size(&self) -> usize {
        self.max_size
    }
}
