//! Advanced search: case, whole-word and regex modes over a page range.
//!
//! Options are normalized rather than rejected. The only hard error is a
//! regular expression that fails to compile.

use crate::document::Document;
use crate::error::Result;
use crate::search::matching::{
    HIGHLIGHT_END, HIGHLIGHT_START, find_all_positions, line_and_column, search_chars,
    text_to_lines,
};
use crate::search::text_search::SearchResult;
use regex::{Regex, RegexBuilder};
use serde::Serialize;

/// Context chars kept around literal matches.
const LINE_CONTEXT_CHARS: usize = 30;

/// Context chars kept around regex matches, which may cross lines.
const REGEX_CONTEXT_CHARS: usize = 40;

/// Previews longer than this are cut and end in `"..."`.
const PREVIEW_MAX_CHARS: usize = 60;

/// Highest relevance a match that differs from the query can score.
const MAX_INEXACT_RELEVANCE: f64 = 0.99;

/// Options for advanced search.
///
/// Numeric fields are signed so that callers can pass raw user input;
/// see [`SearchOptions::normalized`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchOptions {
    /// Match case exactly
    pub case_sensitive: bool,
    /// Require word boundaries on both sides (ignored in regex mode)
    pub whole_word: bool,
    /// Treat the query as a regular expression
    pub regex_mode: bool,
    /// Maximum number of results (0 = unlimited)
    pub max_results: i64,
    /// First page to search (1-indexed)
    pub start_page: i64,
    /// Last page to search (0 = last page of the document)
    pub end_page: i64,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            whole_word: false,
            regex_mode: false,
            max_results: 0,
            start_page: 1,
            end_page: 0,
        }
    }
}

impl SearchOptions {
    /// Create new default search options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set case sensitivity.
    pub fn with_case_sensitive(mut self, value: bool) -> Self {
        self.case_sensitive = value;
        self
    }

    /// Match whole words only.
    pub fn with_whole_word(mut self, value: bool) -> Self {
        self.whole_word = value;
        self
    }

    /// Treat the query as a regular expression.
    pub fn with_regex(mut self, value: bool) -> Self {
        self.regex_mode = value;
        self
    }

    /// Limit the number of results.
    pub fn with_max_results(mut self, max: i64) -> Self {
        self.max_results = max;
        self
    }

    /// Search only within a page range (inclusive, 1-indexed).
    pub fn with_page_range(mut self, start: i64, end: i64) -> Self {
        self.start_page = start;
        self.end_page = end;
        self
    }

    /// Options with out-of-range values replaced.
    ///
    /// - `max_results < 0` becomes 0 (unlimited)
    /// - `start_page < 1` becomes 1
    /// - `end_page <= 0` or past the last page becomes `page_count`
    pub fn normalized(&self, page_count: usize) -> Self {
        let last = i64::try_from(page_count).unwrap_or(i64::MAX);
        Self {
            max_results: self.max_results.max(0),
            start_page: self.start_page.max(1),
            end_page: if self.end_page <= 0 || self.end_page > last {
                last
            } else {
                self.end_page
            },
            ..self.clone()
        }
    }
}

/// A search result with scoring and a one-line preview.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdvancedSearchResult {
    /// Match location and context
    #[serde(flatten)]
    pub result: SearchResult,
    /// Number of matches on the same page
    pub match_count: usize,
    /// Relevance in `[0, 1]`; exactly 1.0 only when the match equals the query
    pub relevance: f64,
    /// `"...before [match] after..."`
    pub preview: String,
}

/// Relevance of a match against the query.
///
/// An exact match scores 1.0. Anything else scores the symmetric length
/// ratio `min(q/m, m/q)`, capped just below 1.0.
///
/// # Examples
///
/// ```
/// use pdf_pager::search::calculate_relevance;
///
/// assert_eq!(calculate_relevance("hello", "hello"), 1.0);
/// assert!((calculate_relevance("hello", "hel") - 0.6).abs() < 1e-9);
/// assert!(calculate_relevance("Hello", "hello") < 1.0);
/// ```
pub fn calculate_relevance(match_text: &str, query: &str) -> f64 {
    if match_text == query {
        return 1.0;
    }

    let match_len = match_text.chars().count();
    if match_len == 0 {
        return 0.0;
    }

    let ratio = query.chars().count() as f64 / match_len as f64;
    let ratio = if ratio > 1.0 { 1.0 / ratio } else { ratio };
    ratio.min(MAX_INEXACT_RELEVANCE)
}

/// Format `"...{before} [{match}] {after}..."`, cut to 60 chars plus `"..."`.
pub fn format_preview(before: &str, matched: &str, after: &str) -> String {
    let preview = format!("...{} [{}] {}...", before, matched, after);
    if preview.chars().count() > PREVIEW_MAX_CHARS {
        let mut cut: String = preview.chars().take(PREVIEW_MAX_CHARS).collect();
        cut.push_str("...");
        cut
    } else {
        preview
    }
}

/// Compiled form of a query.
enum Matcher {
    Literal {
        needle: Vec<char>,
        case_sensitive: bool,
        whole_word: bool,
    },
    Regex(Regex),
}

impl Matcher {
    fn new(query: &str, options: &SearchOptions) -> Result<Self> {
        if options.regex_mode {
            let regex = RegexBuilder::new(query)
                .case_insensitive(!options.case_sensitive)
                .build()?;
            Ok(Matcher::Regex(regex))
        } else {
            Ok(Matcher::Literal {
                needle: search_chars(query, options.case_sensitive),
                case_sensitive: options.case_sensitive,
                whole_word: options.whole_word,
            })
        }
    }

    /// All matches in one page's text, in reading order.
    fn find(&self, page_num: usize, text: &str) -> Vec<SearchResult> {
        match self {
            Matcher::Literal {
                needle,
                case_sensitive,
                whole_word,
            } => find_literal(page_num, text, needle, *case_sensitive, *whole_word),
            Matcher::Regex(regex) => find_regex(page_num, text, regex),
        }
    }
}

fn trimmed(chars: &[char]) -> String {
    chars.iter().collect::<String>().trim().to_string()
}

fn find_literal(
    page_num: usize,
    text: &str,
    needle: &[char],
    case_sensitive: bool,
    whole_word: bool,
) -> Vec<SearchResult> {
    let mut results = Vec::new();

    for line in text_to_lines(text) {
        let original: Vec<char> = line.text.chars().collect();
        let haystack = search_chars(line.text, case_sensitive);

        for pos in find_all_positions(&haystack, needle, whole_word) {
            let end = pos + needle.len();
            let before = &original[pos.saturating_sub(LINE_CONTEXT_CHARS)..pos];
            let after = &original[end..(end + LINE_CONTEXT_CHARS).min(original.len())];
            results.push(SearchResult {
                page_num,
                line_num: line.line_num,
                column_num: pos + 1,
                match_text: original[pos..end].iter().collect(),
                context_before: trimmed(before),
                context_after: trimmed(after),
            });
        }
    }

    results
}

fn find_regex(page_num: usize, text: &str, regex: &Regex) -> Vec<SearchResult> {
    regex
        .find_iter(text)
        .filter(|m| !m.as_str().is_empty())
        .map(|m| {
            let (line_num, column_num) = line_and_column(text, m.start());
            let mut before: Vec<char> =
                text[..m.start()].chars().rev().take(REGEX_CONTEXT_CHARS).collect();
            before.reverse();
            let after: Vec<char> = text[m.end()..].chars().take(REGEX_CONTEXT_CHARS).collect();

            SearchResult {
                page_num,
                line_num,
                column_num,
                match_text: m.as_str().to_string(),
                context_before: trimmed(&before),
                context_after: trimmed(&after),
            }
        })
        .collect()
}

impl Document {
    /// Search with case, whole-word, regex, result limit and page range options.
    ///
    /// Results are ordered by page, line and column. Pages that fail to
    /// extract are skipped.
    ///
    /// # Errors
    ///
    /// [`crate::Error::InvalidRegex`] if `regex_mode` is set and the query
    /// does not compile.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use pdf_pager::Document;
    /// use pdf_pager::search::SearchOptions;
    ///
    /// let doc = Document::open("sample.pdf")?;
    /// let options = SearchOptions::new().with_whole_word(true).with_max_results(10);
    /// for hit in doc.advanced_search("the", &options)? {
    ///     println!("{:.2} {}", hit.relevance, hit.preview);
    /// }
    /// # Ok::<(), pdf_pager::Error>(())
    /// ```
    pub fn advanced_search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<Vec<AdvancedSearchResult>> {
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let options = options.normalized(self.page_count());
        let matcher = Matcher::new(query, &options)?;
        let max_results = usize::try_from(options.max_results).unwrap_or(0);
        let limit_reached = |count: usize| max_results > 0 && count >= max_results;

        let mut results = Vec::new();
        for page_num in options.start_page..=options.end_page {
            if limit_reached(results.len()) {
                break;
            }

            // Normalized bounds are within 1..=page_count
            let page_num = page_num as usize;
            let page = match self.get_page(page_num) {
                Ok(page) => page,
                Err(e) => {
                    log::warn!("Skipping page {} during search: {}", page_num, e);
                    continue;
                },
            };

            let matches = matcher.find(page_num, &page.text);
            let match_count = matches.len();
            for result in matches {
                if limit_reached(results.len()) {
                    break;
                }
                results.push(AdvancedSearchResult {
                    relevance: calculate_relevance(&result.match_text, query),
                    preview: format_preview(
                        &result.context_before,
                        &result.match_text,
                        &result.context_after,
                    ),
                    match_count,
                    result,
                });
            }
        }

        log::debug!(
            "Advanced search for {:?} (regex: {}): {} results",
            query,
            options.regex_mode,
            results.len()
        );
        Ok(results)
    }
}

/// Post-processing applied to advanced search results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchFilter {
    /// Drop results with fewer context chars than this (before and after combined)
    pub min_context_length: usize,
    /// Mark the match in the preview with a terminal highlight instead of brackets
    pub highlight_match: bool,
    /// Order results by page, line and column
    pub sort_by_page: bool,
}

impl SearchFilter {
    /// Create a filter that keeps everything unchanged.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply the filter.
    pub fn apply(&self, mut results: Vec<AdvancedSearchResult>) -> Vec<AdvancedSearchResult> {
        results.retain(|r| {
            let context =
                r.result.context_before.chars().count() + r.result.context_after.chars().count();
            context >= self.min_context_length
        });

        if self.highlight_match {
            for r in &mut results {
                r.preview = format!(
                    "...{} {}{}{} {}...",
                    r.result.context_before,
                    HIGHLIGHT_START,
                    r.result.match_text,
                    HIGHLIGHT_END,
                    r.result.context_after
                );
            }
        }

        if self.sort_by_page {
            results.sort_by_key(|r| (r.result.page_num, r.result.line_num, r.result.column_num));
        }

        results
    }
}
