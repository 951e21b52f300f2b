// Allow some clippy lints that are too pedantic for this project
#![allow(clippy::type_complexity)]
// Allow unused for tests
#![cfg_attr(test, allow(dead_code))]

//! # PDF Pager
//!
//! Paged text engine for terminal PDF readers.
//!
//! ## Core Features
//!
//! - **Page Cache**: bounded LRU of page text, safe to share between threads
//! - **Layout Analysis**: reading-order reconstruction, column detection and
//!   heading candidates from positioned text runs
//! - **Search**: case-insensitive search, plus case, whole-word and regex
//!   modes with relevance scores, previews and a bounded history
//! - **Outline**: bookmarks when the document has them, heading detection
//!   otherwise
//!
//! ## Architecture
//!
//! A [`Document`] never parses files itself. It asks a
//! [`extractors::PageExtractor`] for one page at a time; the default
//! backend reads PDFs with `lopdf`. Page text is produced by the
//! [`layout::LayoutAnalyzer`] and served through the [`cache::PageCache`].
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdf_pager::{Document, PagerConfig};
//! use pdf_pager::search::SearchOptions;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let doc = Document::open_with_config("paper.pdf", PagerConfig::new().with_cache_capacity(8))?;
//!
//! let page = doc.get_page(1)?;
//! println!("{} lines, {} words", page.line_count, page.word_count);
//!
//! let hits = doc.advanced_search("introduction", &SearchOptions::new().with_whole_word(true))?;
//! println!("{} hits", hits.len());
//!
//! println!("{}", doc.extract_outline()?.format());
//! # Ok(())
//! # }
//! ```
//!
//! ## License
//!
//! Licensed under either of:
//!
//! * Apache License, Version 2.0 (<http://www.apache.org/licenses/LICENSE-2.0>)
//! * MIT license (<http://opensource.org/licenses/MIT>)
//!
//! at your option.

#![warn(missing_docs)]

// Error handling
pub mod error;

// Configuration
pub mod config;

// Page cache
pub mod cache;

// Layout analysis
pub mod layout;

// Page extraction backends
pub mod extractors;

// Document model
pub mod document;

// Text search
pub mod search;

// Table of contents
pub mod outline;

// Re-exports
pub use cache::{CacheStatistics, CacheStats, PageCache};
pub use config::{ExtractionMode, LayoutConfig, PagerConfig};
pub use document::{Document, Metadata, PageInfo};
pub use error::{Error, Result};
pub use outline::{Outline, OutlineEntry, OutlineSource};
pub use search::{AdvancedSearchResult, SearchOptions, SearchResult};

// Internal utilities
pub(crate) mod utils {
    //! Internal utility functions for the library.

    use std::cmp::Ordering;

    /// Compare two floats for sorting without panicking on NaN.
    ///
    /// NaN values are equal to each other and greater than all other values.
    #[inline]
    pub fn safe_float_cmp(a: f32, b: f32) -> Ordering {
        match (a.is_nan(), b.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        }
    }

}

// Version info
/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
