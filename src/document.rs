//! Paged document model.
//!
//! A [`Document`] owns the page count and info dictionary read at open time,
//! asks its [`PageExtractor`] for one page at a time, turns the page content
//! into text with the [`LayoutAnalyzer`], and serves the text through a
//! [`PageCache`]. All methods take `&self`; the cache is the only mutable
//! state and carries its own lock, so a document can be shared between a UI
//! thread and background prefetch threads.

use crate::cache::{CacheStatistics, CacheStats, PageCache};
use crate::config::PagerConfig;
use crate::error::{Error, Result};
use crate::extractors::{Bookmark, DocumentInfo, LopdfExtractor, PageContent, PageExtractor};
use crate::layout::LayoutAnalyzer;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Text of one page plus simple statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    /// Page number (1-indexed)
    pub page_num: usize,
    /// Page text
    pub text: String,
    /// Number of newline separated segments (empty text counts as one line)
    pub line_count: usize,
    /// Number of whitespace separated words
    pub word_count: usize,
    /// Whether the page holds images (not detected, always false)
    pub has_images: bool,
    /// Whether the page holds tables (not detected, always false)
    pub has_tables: bool,
}

impl PageInfo {
    /// Build page info from page text.
    pub fn from_text(page_num: usize, text: String) -> Self {
        Self {
            page_num,
            line_count: count_lines(&text),
            word_count: count_words(&text),
            text,
            has_images: false,
            has_tables: false,
        }
    }
}

/// Document level metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metadata {
    /// Path the document was opened from
    pub file_path: String,
    /// Number of pages
    pub pages: usize,
    /// Document title
    pub title: String,
    /// Author
    pub author: String,
    /// Subject
    pub subject: String,
    /// Creating application
    pub creator: String,
}

/// An opened paginated document.
pub struct Document {
    path: PathBuf,
    page_count: usize,
    info: DocumentInfo,
    extractor: Arc<dyn PageExtractor>,
    analyzer: LayoutAnalyzer,
    cache: PageCache,
    config: PagerConfig,
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("path", &self.path)
            .field("page_count", &self.page_count)
            .field("info", &self.info)
            .field("cache", &self.cache.stats())
            .finish_non_exhaustive()
    }
}

impl Document {
    /// Open a PDF document from a file path with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be opened or parsed
    /// - The document has no pages
    ///
    /// # Example
    ///
    /// ```no_run
    /// use pdf_pager::Document;
    ///
    /// let doc = Document::open("sample.pdf")?;
    /// println!("{} pages", doc.page_count());
    /// # Ok::<(), pdf_pager::Error>(())
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_config(path, PagerConfig::default())
    }

    /// Open a PDF document with a custom configuration.
    pub fn open_with_config(path: impl AsRef<Path>, config: PagerConfig) -> Result<Self> {
        Self::open_with(path, Arc::new(LopdfExtractor::new()), config)
    }

    /// Open a document through any page extractor.
    pub fn open_with(
        path: impl AsRef<Path>,
        extractor: Arc<dyn PageExtractor>,
        config: PagerConfig,
    ) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let source = extractor.probe(&path)?;
        if source.page_count == 0 {
            return Err(Error::EmptyDocument);
        }

        log::info!(
            "Opened {} ({} pages, cache capacity {})",
            path.display(),
            source.page_count,
            config.cache_capacity
        );

        Ok(Self {
            page_count: source.page_count,
            info: source.info,
            extractor,
            analyzer: LayoutAnalyzer::with_config(config.layout),
            cache: PageCache::new(config.cache_capacity),
            config,
            path,
        })
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Path the document was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Configuration in use.
    pub fn config(&self) -> &PagerConfig {
        &self.config
    }

    /// Whether `page` lies in `1..=page_count`.
    pub fn is_valid_page(&self, page: usize) -> bool {
        (1..=self.page_count).contains(&page)
    }

    fn check_page(&self, page: usize) -> Result<()> {
        if self.is_valid_page(page) {
            Ok(())
        } else {
            Err(Error::PageOutOfRange {
                page,
                page_count: self.page_count,
            })
        }
    }

    /// Get the text of a page (1-indexed).
    ///
    /// Cached text is returned without touching the extractor. On a miss
    /// the page is extracted, converted to text and cached.
    ///
    /// # Errors
    ///
    /// [`Error::PageOutOfRange`] for pages outside `1..=page_count` (the
    /// cache is left untouched), or the extractor's error.
    pub fn get_page(&self, page: usize) -> Result<PageInfo> {
        self.check_page(page)?;

        if let Some(text) = self.cache.get(page) {
            log::trace!("Page {} served from cache", page);
            return Ok(PageInfo::from_text(page, text));
        }

        let text = match self.extractor.extract_page(&self.path, page)? {
            PageContent::Text(text) => text,
            PageContent::Runs(runs) => self.analyzer.page_text(&runs, self.config.extraction_mode),
        };
        log::debug!("Extracted page {} ({} bytes)", page, text.len());

        self.cache.put(page, text.clone());
        Ok(PageInfo::from_text(page, text))
    }

    /// Get the text of pages `start..=end`, each followed by a newline.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidPageRange`] unless `1 <= start <= end <= page_count`.
    /// The first page that fails to extract aborts the whole range.
    pub fn get_page_range(&self, start: usize, end: usize) -> Result<String> {
        if start < 1 || start > end || end > self.page_count {
            return Err(Error::InvalidPageRange {
                start,
                end,
                page_count: self.page_count,
            });
        }

        let mut text = String::new();
        for page in start..=end {
            text.push_str(&self.get_page(page)?.text);
            text.push('\n');
        }
        Ok(text)
    }

    /// Document metadata.
    pub fn metadata(&self) -> Metadata {
        Metadata {
            file_path: self.path.display().to_string(),
            pages: self.page_count,
            title: self.info.title.clone(),
            author: self.info.author.clone(),
            subject: self.info.subject.clone(),
            creator: self.info.creator.clone(),
        }
    }

    /// Bookmarks stored in the document itself.
    pub fn bookmarks(&self) -> Result<Vec<Bookmark>> {
        self.extractor.bookmarks(&self.path)
    }

    /// Drop all cached pages. Hit and miss counters are kept.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Number of cached pages and cache capacity.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Cache size, capacity, hit and miss counters.
    pub fn detailed_cache_stats(&self) -> CacheStatistics {
        self.cache.detailed_stats()
    }

    /// The page cache.
    pub fn cache(&self) -> &PageCache {
        &self.cache
    }
}

/// Number of newline separated segments. Empty text is one line.
pub fn count_lines(text: &str) -> usize {
    text.matches('\n').count() + 1
}

/// Number of words separated by runs of spaces, tabs and newlines.
pub fn count_words(text: &str) -> usize {
    text.split([' ', '\t', '\n'])
        .filter(|word| !word.is_empty())
        .count()
}
