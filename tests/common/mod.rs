//! In-memory page extractor shared by the integration tests.
#![allow(dead_code)]

use pdf_pager::extractors::{Bookmark, DocumentInfo, PageContent, PageExtractor, SourceInfo};
use pdf_pager::{Document, Error, PagerConfig, Result};
use std::collections::HashSet;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Serves fixed page texts, optionally failing on some pages.
pub struct MemoryExtractor {
    pages: Vec<String>,
    failing: HashSet<usize>,
    bookmarks: Vec<Bookmark>,
    calls: AtomicUsize,
}

impl MemoryExtractor {
    pub fn new<S: Into<String>>(pages: impl IntoIterator<Item = S>) -> Self {
        Self {
            pages: pages.into_iter().map(Into::into).collect(),
            failing: HashSet::new(),
            bookmarks: Vec::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing_on(mut self, page: usize) -> Self {
        self.failing.insert(page);
        self
    }

    pub fn with_bookmarks(mut self, bookmarks: Vec<Bookmark>) -> Self {
        self.bookmarks = bookmarks;
        self
    }

    /// Number of `extract_page` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PageExtractor for MemoryExtractor {
    fn probe(&self, _path: &Path) -> Result<SourceInfo> {
        Ok(SourceInfo {
            page_count: self.pages.len(),
            info: DocumentInfo {
                title: "Memory Document".to_string(),
                author: "Test Suite".to_string(),
                ..DocumentInfo::default()
            },
        })
    }

    fn extract_page(&self, _path: &Path, page: usize) -> Result<PageContent> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(&page) {
            return Err(Error::ExtractFailed {
                page,
                reason: "corrupt content stream".to_string(),
            });
        }
        self.pages
            .get(page - 1)
            .cloned()
            .map(PageContent::Text)
            .ok_or(Error::NullPage(page))
    }

    fn bookmarks(&self, _path: &Path) -> Result<Vec<Bookmark>> {
        Ok(self.bookmarks.clone())
    }
}

/// Open a document over `extractor` with the default configuration.
pub fn open(extractor: MemoryExtractor) -> (Document, Arc<MemoryExtractor>) {
    open_with_config(extractor, PagerConfig::default())
}

/// Open a document over `extractor` with `config`.
pub fn open_with_config(
    extractor: MemoryExtractor,
    config: PagerConfig,
) -> (Document, Arc<MemoryExtractor>) {
    let extractor = Arc::new(extractor);
    let doc = Document::open_with("memory.pdf", extractor.clone(), config)
        .expect("memory document should open");
    (doc, extractor)
}

/// `count` pages, each reading `"Page N content"`.
pub fn numbered_pages(count: usize) -> MemoryExtractor {
    MemoryExtractor::new((1..=count).map(|n| format!("Page {} content", n)))
}
