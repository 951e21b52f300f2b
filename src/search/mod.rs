//! Text search over document pages.
//!
//! This module provides:
//! - Simple case-insensitive search with per-line context
//! - Advanced search with case, whole-word and regex modes, a result limit
//!   and a page range
//! - Relevance scoring and result previews
//! - A navigable result cursor and a bounded search history
//!
//! ## Example
//!
//! ```no_run
//! use pdf_pager::Document;
//! use pdf_pager::search::{SearchHistory, SearchOptions, SearchSession};
//!
//! let doc = Document::open("document.pdf")?;
//!
//! // Simple search
//! for hit in doc.search("hello")? {
//!     println!("page {}: {}", hit.page_num, hit.match_text);
//! }
//!
//! // Regex search, browsed one hit at a time
//! let options = SearchOptions::new().with_regex(true);
//! let mut session = SearchSession::execute_advanced(&doc, r"\d{4}", &options)?;
//! while let Some(hit) = session.current() {
//!     println!("{}", hit.preview);
//!     if !session.next_result() {
//!         break;
//!     }
//! }
//!
//! let mut history = SearchHistory::default();
//! history.record(r"\d{4}", &options, session.len());
//! # Ok::<(), pdf_pager::Error>(())
//! ```

pub mod advanced;
pub mod history;
pub mod matching;
mod text_search;

pub use advanced::{
    AdvancedSearchResult, SearchFilter, SearchOptions, calculate_relevance, format_preview,
};
pub use history::{SearchHistory, SearchHistoryEntry};
pub use matching::{
    LineInfo, case_insensitive_match, case_sensitive_match, extract_context, find_all_positions,
    find_match_on_line, highlight_matches, line_and_column, text_to_lines, word_match,
};
pub use text_search::{SearchResult, SearchSession, search_page_text};
