//! Page extraction backends.
//!
//! The document store never parses files itself. It asks a [`PageExtractor`]
//! for the page count, the info dictionary, the raw content of one page and
//! the bookmark tree. Every call receives the source path and opens the file
//! on its own, so concurrent extractions of different pages share no handle.

pub mod pdf;

pub use pdf::LopdfExtractor;

use crate::error::Result;
use crate::layout::TextRun;
use serde::Serialize;
use std::path::Path;

/// Raw content of one page as produced by a backend.
#[derive(Debug, Clone, PartialEq)]
pub enum PageContent {
    /// Backend already produced final text.
    Text(String),
    /// Positioned runs, to be turned into text by the layout analyzer.
    Runs(Vec<TextRun>),
}

/// Document info dictionary entries. Missing entries are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocumentInfo {
    /// Document title
    pub title: String,
    /// Author
    pub author: String,
    /// Subject
    pub subject: String,
    /// Creating application
    pub creator: String,
}

/// What a backend learns when it first opens a source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceInfo {
    /// Number of pages
    pub page_count: usize,
    /// Info dictionary
    pub info: DocumentInfo,
}

/// A bookmark from the document's own outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bookmark {
    /// Bookmark title
    pub title: String,
    /// Target page (1-indexed)
    pub page: usize,
    /// Nested bookmarks
    pub children: Vec<Bookmark>,
}

impl Bookmark {
    /// Create a bookmark without children.
    pub fn new(title: impl Into<String>, page: usize) -> Self {
        Self {
            title: title.into(),
            page,
            children: Vec::new(),
        }
    }

    /// Attach children.
    pub fn with_children(mut self, children: Vec<Bookmark>) -> Self {
        self.children = children;
        self
    }
}

/// Source of page content for a [`crate::Document`].
pub trait PageExtractor: Send + Sync {
    /// Open the source and read its page count and info dictionary.
    fn probe(&self, path: &Path) -> Result<SourceInfo>;

    /// Extract the content of `page` (1-indexed).
    ///
    /// A page number the source has no page object for is reported as
    /// [`crate::Error::NullPage`].
    fn extract_page(&self, path: &Path, page: usize) -> Result<PageContent>;

    /// Read the bookmark tree. Sources without bookmarks return an empty list.
    fn bookmarks(&self, _path: &Path) -> Result<Vec<Bookmark>> {
        Ok(Vec::new())
    }
}
