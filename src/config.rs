//! Configuration for document paging.

use serde::Serialize;

/// Default number of pages kept in the page cache.
pub const DEFAULT_CACHE_CAPACITY: usize = 5;

/// Default number of searches remembered by the search history.
pub const DEFAULT_HISTORY_SIZE: usize = 50;

/// Default number of context characters shown around a match.
pub const DEFAULT_CONTEXT_CHARS: usize = 30;

/// How page text is produced from the runs returned by the extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMode {
    /// Concatenate runs in content-stream order without reordering.
    Plain,
    /// Reading-order reconstruction with line breaks.
    #[default]
    Lines,
    /// Line reconstruction plus column detection (`" | "` between columns).
    Columns,
}

/// Thresholds used by the layout analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LayoutConfig {
    /// Y-distance (points) above which a run starts a new line.
    pub line_threshold: f32,

    /// X-gap (points) above which a new column starts.
    pub column_threshold: f32,

    /// Use `0.5 × font size` of the current run instead of `line_threshold`.
    pub use_relative_threshold: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutConfig {
    /// Create a layout configuration with the default thresholds.
    pub fn new() -> Self {
        Self {
            line_threshold: 5.0,
            column_threshold: 20.0,
            use_relative_threshold: true,
        }
    }

    /// Set the absolute line threshold.
    pub fn with_line_threshold(mut self, threshold: f32) -> Self {
        self.line_threshold = threshold;
        self
    }

    /// Set the column gap threshold.
    pub fn with_column_threshold(mut self, threshold: f32) -> Self {
        self.column_threshold = threshold;
        self
    }

    /// Enable or disable the font-size relative line threshold.
    pub fn with_relative_threshold(mut self, enable: bool) -> Self {
        self.use_relative_threshold = enable;
        self
    }
}

/// Document paging configuration.
#[derive(Debug, Clone, Serialize)]
pub struct PagerConfig {
    /// Maximum number of pages held in the page cache.
    pub cache_capacity: usize,

    /// How extracted runs become page text.
    pub extraction_mode: ExtractionMode,

    /// Layout analyzer thresholds.
    pub layout: LayoutConfig,

    /// Maximum number of remembered searches.
    pub history_size: usize,

    /// Characters of context kept on each side of a simple-search match.
    pub context_chars: usize,
}

impl Default for PagerConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl PagerConfig {
    /// Create new configuration with defaults.
    pub fn new() -> Self {
        Self {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            extraction_mode: ExtractionMode::default(),
            layout: LayoutConfig::default(),
            history_size: DEFAULT_HISTORY_SIZE,
            context_chars: DEFAULT_CONTEXT_CHARS,
        }
    }

    /// Set the page cache capacity. Zero falls back to the default.
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// Set the extraction mode.
    pub fn with_extraction_mode(mut self, mode: ExtractionMode) -> Self {
        self.extraction_mode = mode;
        self
    }

    /// Set the layout thresholds.
    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    /// Set the search history size.
    pub fn with_history_size(mut self, size: usize) -> Self {
        self.history_size = size;
        self
    }

    /// Set the simple-search context width.
    pub fn with_context_chars(mut self, chars: usize) -> Self {
        self.context_chars = chars;
        self
    }
}
