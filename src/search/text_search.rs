//! Simple search and navigable result sets.
//!
//! Simple search is a case-insensitive substring scan over every line of
//! every page. Results come back page by page, line by line, left to right.

use crate::document::Document;
use crate::error::Result;
use crate::search::advanced::{AdvancedSearchResult, SearchOptions};
use crate::search::matching::{extract_context, find_all_positions, search_chars, text_to_lines};
use serde::Serialize;

/// A single match location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    /// Page number (1-indexed)
    pub page_num: usize,
    /// Line number within the page (1-indexed)
    pub line_num: usize,
    /// Column of the match start in chars (1-indexed)
    pub column_num: usize,
    /// The matched text as it appears on the page
    pub match_text: String,
    /// Text before the match on the same line
    pub context_before: String,
    /// Text after the match on the same line
    pub context_after: String,
}

/// Case-insensitive matches of `query` in one page's text.
pub fn search_page_text(
    page_num: usize,
    text: &str,
    query: &str,
    context_chars: usize,
) -> Vec<SearchResult> {
    let needle = search_chars(query, false);
    if needle.is_empty() {
        return Vec::new();
    }

    let mut results = Vec::new();
    for line in text_to_lines(text) {
        let original: Vec<char> = line.text.chars().collect();
        let folded = search_chars(line.text, false);

        for pos in find_all_positions(&folded, &needle, false) {
            let (before, matched, after) =
                extract_context(&original, pos, needle.len(), context_chars);
            results.push(SearchResult {
                page_num,
                line_num: line.line_num,
                column_num: pos + 1,
                match_text: matched,
                context_before: before,
                context_after: after,
            });
        }
    }

    results
}

impl Document {
    /// Case-insensitive search across every page.
    ///
    /// An empty query yields no results. Pages that fail to extract are
    /// skipped and the remaining pages are still searched.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use pdf_pager::Document;
    ///
    /// let doc = Document::open("sample.pdf")?;
    /// for hit in doc.search("hello")? {
    ///     println!("page {} line {}: {}", hit.page_num, hit.line_num, hit.match_text);
    /// }
    /// # Ok::<(), pdf_pager::Error>(())
    /// ```
    pub fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let context = self.config().context_chars;
        let mut results = Vec::new();

        for page_num in 1..=self.page_count() {
            let page = match self.get_page(page_num) {
                Ok(page) => page,
                Err(e) => {
                    log::warn!("Skipping page {} during search: {}", page_num, e);
                    continue;
                },
            };
            results.extend(search_page_text(page_num, &page.text, query, context));
        }

        log::debug!("Search for {:?}: {} results", query, results.len());
        Ok(results)
    }
}

/// A result set with a cursor, as browsed by a reader jumping from hit to hit.
///
/// Moving past either end fails and leaves the cursor in place.
#[derive(Debug, Clone)]
pub struct SearchSession<R> {
    query: String,
    results: Vec<R>,
    current: usize,
}

impl<R> SearchSession<R> {
    /// Wrap an already computed result set.
    pub fn new(query: impl Into<String>, results: Vec<R>) -> Self {
        Self {
            query: query.into(),
            results,
            current: 0,
        }
    }

    /// The query that produced the results.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// All results.
    pub fn results(&self) -> &[R] {
        &self.results
    }

    /// Number of results.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Whether the search found nothing.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// The result under the cursor.
    pub fn current(&self) -> Option<&R> {
        self.results.get(self.current)
    }

    /// Cursor position.
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Move to the next result. Returns false at the last result.
    pub fn next_result(&mut self) -> bool {
        if self.current + 1 < self.results.len() {
            self.current += 1;
            true
        } else {
            false
        }
    }

    /// Move to the previous result. Returns false at the first result.
    pub fn previous_result(&mut self) -> bool {
        if self.current > 0 {
            self.current -= 1;
            true
        } else {
            false
        }
    }

    /// Move to `index`. Returns false if there is no such result.
    pub fn jump_to(&mut self, index: usize) -> bool {
        if index < self.results.len() {
            self.current = index;
            true
        } else {
            false
        }
    }

    /// Move back to the first result.
    pub fn reset(&mut self) {
        self.current = 0;
    }
}

impl SearchSession<SearchResult> {
    /// Run a simple search and start browsing at the first result.
    pub fn execute(doc: &Document, query: &str) -> Result<Self> {
        Ok(Self::new(query, doc.search(query)?))
    }
}

impl SearchSession<AdvancedSearchResult> {
    /// Run an advanced search and start browsing at the first result.
    pub fn execute_advanced(doc: &Document, query: &str, options: &SearchOptions) -> Result<Self> {
        Ok(Self::new(query, doc.advanced_search(query, options)?))
    }
}
