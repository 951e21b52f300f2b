//! Error types for the paging engine.
//!
//! This module defines all error types that can occur while opening documents,
//! extracting pages and running searches.

/// Result type alias for paging engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while paging through a document.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Page number outside `[1, page_count]`
    #[error("Page number out of range: {page} (document has {page_count} pages)")]
    PageOutOfRange {
        /// Requested page (1-indexed)
        page: usize,
        /// Number of pages in the document
        page_count: usize,
    },

    /// Page range that is reversed or exceeds the document
    #[error("Invalid page range: {start}-{end} (document has {page_count} pages)")]
    InvalidPageRange {
        /// First page of the requested range
        start: usize,
        /// Last page of the requested range
        end: usize,
        /// Number of pages in the document
        page_count: usize,
    },

    /// Document has no pages at open time
    #[error("Document has no pages")]
    EmptyDocument,

    /// The backend has no page object for this page number
    #[error("Page {0} is empty or null")]
    NullPage(usize),

    /// Text extraction failed for a single page
    #[error("Failed to extract page {page}: {reason}")]
    ExtractFailed {
        /// Page that failed (1-indexed)
        page: usize,
        /// Reason for the failure
        reason: String,
    },

    /// Regular expression failed to compile
    #[error("Invalid regex pattern: {0}")]
    InvalidRegex(String),

    /// The PDF backend could not read the file
    #[error("Failed to open PDF: {0}")]
    Pdf(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        Error::Pdf(err.to_string())
    }
}

impl From<regex::Error> for Error {
    fn from(err: regex::Error) -> Self {
        Error::InvalidRegex(err.to_string())
    }
}
