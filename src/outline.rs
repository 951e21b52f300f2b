//! Document outline (table of contents).
//!
//! The outline comes from the document's own bookmarks when it has any.
//! Otherwise the first pages are scanned for heading-like lines: short,
//! capitalized lines whose word count decides their level.

use crate::document::Document;
use crate::error::Result;
use crate::extractors::Bookmark;
use crate::search::text_to_lines;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::fmt;

/// Number of leading pages scanned for headings.
pub const HEADING_SCAN_PAGES: usize = 10;

/// Lines longer than this (in chars) are treated as body text.
pub const MAX_HEADING_CHARS: usize = 100;

/// Headings kept per page.
pub const MAX_HEADINGS_PER_PAGE: usize = 5;

/// Lines scanned per page.
pub const MAX_SCANNED_LINES: usize = 50;

/// Where an outline came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutlineSource {
    /// The document's own bookmarks
    Metadata,
    /// Headings detected in page text
    Headings,
    /// Nothing found
    None,
}

impl OutlineSource {
    /// Name as shown to the reader.
    pub fn as_str(&self) -> &'static str {
        match self {
            OutlineSource::Metadata => "metadata",
            OutlineSource::Headings => "headings",
            OutlineSource::None => "none",
        }
    }
}

impl fmt::Display for OutlineSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single outline entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutlineEntry {
    /// Entry title
    pub title: String,
    /// Target page (1-indexed)
    pub page: usize,
    /// Hierarchy level (1 = top)
    pub level: usize,
    /// Entries nested under this one
    pub children: Vec<OutlineEntry>,
}

impl OutlineEntry {
    /// Create an entry without children.
    pub fn new(title: impl Into<String>, page: usize, level: usize) -> Self {
        Self {
            title: title.into(),
            page,
            level,
            children: Vec::new(),
        }
    }

    /// Page this entry points at.
    pub fn page(&self) -> usize {
        self.page
    }

    fn from_bookmark(bookmark: &Bookmark, level: usize) -> Self {
        Self {
            title: bookmark.title.clone(),
            page: bookmark.page,
            level,
            children: bookmark
                .children
                .iter()
                .map(|child| Self::from_bookmark(child, level + 1))
                .collect(),
        }
    }
}

/// A document outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outline {
    /// Top-level entries
    pub entries: Vec<OutlineEntry>,
    /// Where the entries came from
    pub source: OutlineSource,
}

impl Outline {
    /// An outline with no entries.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
            source: OutlineSource::None,
        }
    }

    /// Whether the outline has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Nest the flat entry list under its level-1 entries.
    ///
    /// See [`build_hierarchy`].
    pub fn build_hierarchy(&self) -> Outline {
        Outline {
            entries: build_hierarchy(&self.entries),
            source: self.source,
        }
    }

    /// Every entry, at any depth, pointing at `page`.
    pub fn find_entries_by_page(&self, page: usize) -> Vec<&OutlineEntry> {
        fn collect<'a>(
            entries: &'a [OutlineEntry],
            page: usize,
            out: &mut Vec<&'a OutlineEntry>,
        ) {
            for entry in entries {
                if entry.page == page {
                    out.push(entry);
                }
                collect(&entry.children, page, out);
            }
        }

        let mut found = Vec::new();
        collect(&self.entries, page, &mut found);
        found
    }

    /// Entries in depth-first order with their depth (0 = top level).
    pub fn flatten(&self) -> Vec<(usize, &OutlineEntry)> {
        fn walk<'a>(
            entries: &'a [OutlineEntry],
            depth: usize,
            out: &mut Vec<(usize, &'a OutlineEntry)>,
        ) {
            for entry in entries {
                out.push((depth, entry));
                walk(&entry.children, depth + 1, out);
            }
        }

        let mut flat = Vec::new();
        walk(&self.entries, 0, &mut flat);
        flat
    }

    /// Render as text, two spaces of indent per depth.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_pager::outline::{Outline, OutlineEntry, OutlineSource};
    ///
    /// let mut intro = OutlineEntry::new("Introduction", 1, 1);
    /// intro.children.push(OutlineEntry::new("Scope of this work", 2, 2));
    /// let outline = Outline { entries: vec![intro], source: OutlineSource::Headings };
    ///
    /// assert_eq!(
    ///     outline.format(),
    ///     "Table of Contents (from headings)\n\n\
    ///      • Introduction (page 1)\n  \
    ///      • Scope of this work (page 2)\n"
    /// );
    /// ```
    pub fn format(&self) -> String {
        let mut out = format!("Table of Contents (from {})\n\n", self.source);
        for (depth, entry) in self.flatten() {
            out.push_str(&"  ".repeat(depth));
            out.push_str(&format!("• {} (page {})\n", entry.title, entry.page));
        }
        out
    }
}

/// Heading level from word count: up to 2 words is 1, up to 5 is 2, else 3.
pub fn heading_level(text: &str) -> usize {
    match text.split_whitespace().count() {
        0..=2 => 1,
        3..=5 => 2,
        _ => 3,
    }
}

/// Heading-like lines of one page's text.
///
/// A line qualifies when, after trimming, it is non-empty, at most 100
/// chars long and starts with an ASCII uppercase letter. Single-word lines
/// are dropped at level 1 and a title equal to the previous one is skipped.
/// At most 5 headings are kept and only the first 50 lines are scanned.
pub fn find_headings(page_num: usize, text: &str) -> Vec<OutlineEntry> {
    let mut headings: Vec<OutlineEntry> = Vec::new();

    for line in text_to_lines(text).into_iter().take(MAX_SCANNED_LINES) {
        let title = line.text.trim();
        if title.is_empty() || title.chars().count() > MAX_HEADING_CHARS {
            continue;
        }
        if !title.starts_with(|c: char| c.is_ascii_uppercase()) {
            continue;
        }

        let level = heading_level(title);
        if level == 1 && title.split_whitespace().count() < 2 {
            continue;
        }
        if headings.last().is_some_and(|last| last.title == title) {
            continue;
        }

        headings.push(OutlineEntry::new(title, page_num, level));
        if headings.len() >= MAX_HEADINGS_PER_PAGE {
            break;
        }
    }

    headings
}

/// Nest a flat entry list.
///
/// Every level-1 entry becomes a root, and the run of entries with a
/// deeper level that follows it becomes its direct children, whatever
/// their own level. Deeper entries before the first level-1 entry have no
/// root and are dropped.
pub fn build_hierarchy(entries: &[OutlineEntry]) -> Vec<OutlineEntry> {
    let mut roots: Vec<OutlineEntry> = Vec::new();

    for entry in entries {
        let flat = OutlineEntry::new(entry.title.clone(), entry.page, entry.level);
        if entry.level <= 1 {
            roots.push(flat);
        } else if let Some(root) = roots.last_mut() {
            root.children.push(flat);
        }
    }

    roots
}

impl Document {
    /// Heading-like lines on `page`. Pages that fail to load have none.
    pub fn find_headings(&self, page: usize) -> Vec<OutlineEntry> {
        match self.get_page(page) {
            Ok(info) => find_headings(page, &info.text),
            Err(e) => {
                log::warn!("No headings for page {}: {}", page, e);
                Vec::new()
            },
        }
    }

    /// Build the document outline.
    ///
    /// Bookmarks stored in the document are used when present. Otherwise
    /// the first 10 pages are scanned for headings, returned as a flat
    /// list in page order (see [`Outline::build_hierarchy`]).
    pub fn extract_outline(&self) -> Result<Outline> {
        match self.bookmarks() {
            Ok(bookmarks) if !bookmarks.is_empty() => {
                log::debug!("Outline from {} top-level bookmarks", bookmarks.len());
                return Ok(Outline {
                    entries: bookmarks
                        .iter()
                        .map(|b| OutlineEntry::from_bookmark(b, 1))
                        .collect(),
                    source: OutlineSource::Metadata,
                });
            },
            Ok(_) => {},
            Err(e) => log::warn!("Could not read bookmarks: {}", e),
        }

        let last = HEADING_SCAN_PAGES.min(self.page_count());
        let entries: Vec<OutlineEntry> =
            (1..=last).flat_map(|page| self.find_headings(page)).collect();

        if entries.is_empty() {
            return Ok(Outline::empty());
        }

        log::debug!("Outline from {} detected headings", entries.len());
        Ok(Outline {
            entries,
            source: OutlineSource::Headings,
        })
    }
}

lazy_static! {
    static ref HEADING_PATTERNS: Vec<Regex> = [
        r"^Chapter\s+\d+",
        r"^[A-Z][A-Za-z\s]{2,}$",
        r"^\d+\.\s+[A-Z]",
    ]
    .iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .collect();
}

/// Pattern based heading check for documents with numbered or titled sections.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexHeadingDetector;

impl RegexHeadingDetector {
    /// Create a detector using the built-in patterns.
    pub fn new() -> Self {
        Self
    }

    /// Whether `text` matches any heading pattern.
    pub fn matches_pattern(&self, text: &str) -> bool {
        HEADING_PATTERNS.iter().any(|pattern| pattern.is_match(text))
    }
}
