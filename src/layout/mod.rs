//! Layout analysis for positioned text runs.
//!
//! This module turns the runs a page extractor emits into readable text:
//! - Reading order and line grouping (Y descending, then X ascending)
//! - Column detection from uncovered X gaps
//! - Heading candidates from font size relative to the median

pub mod column_detector;
pub mod heading_detector;
pub mod lines;
pub mod text_run;

// Re-export main types
pub use column_detector::{COLUMN_SEPARATOR, Column, detect_column_boundaries, detect_columns};
pub use heading_detector::{HEADING_SIZE_RATIO, detect_headings, median_font_size};
pub use lines::{Line, concatenate, group_into_lines, line_text, reconstruct_text};
pub use text_run::TextRun;

use crate::config::{ExtractionMode, LayoutConfig};

/// Layout analyzer bound to a set of thresholds.
///
/// # Examples
///
/// ```
/// use pdf_pager::layout::{LayoutAnalyzer, TextRun};
///
/// let analyzer = LayoutAnalyzer::new();
/// let runs = vec![
///     TextRun::new("World", 60.0, 700.0, 12.0, 30.0),
///     TextRun::new("Hello", 10.0, 700.0, 12.0, 30.0),
///     TextRun::new("Next", 10.0, 680.0, 12.0, 24.0),
/// ];
/// assert_eq!(analyzer.reconstruct_text(&runs), "Hello World\nNext");
/// ```
#[derive(Debug, Clone, Default)]
pub struct LayoutAnalyzer {
    config: LayoutConfig,
}

impl LayoutAnalyzer {
    /// Create an analyzer with the default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an analyzer with custom thresholds.
    pub fn with_config(config: LayoutConfig) -> Self {
        Self { config }
    }

    /// Thresholds in use.
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Group runs into visual lines, top line first.
    pub fn group_into_lines(&self, runs: &[TextRun]) -> Vec<Line> {
        group_into_lines(runs, &self.config)
    }

    /// Rebuild page text in reading order, one output line per visual line.
    pub fn reconstruct_text(&self, runs: &[TextRun]) -> String {
        reconstruct_text(runs, &self.config)
    }

    /// Group runs into lines, split them into columns and render the page.
    pub fn detect_columns(&self, runs: &[TextRun]) -> (String, Vec<Column>) {
        let lines = self.group_into_lines(runs);
        detect_columns(&lines, self.config.column_threshold)
    }

    /// Indices of runs that look like headings.
    pub fn detect_headings(&self, runs: &[TextRun]) -> Vec<usize> {
        detect_headings(runs)
    }

    /// Produce page text from runs according to `mode`.
    pub fn page_text(&self, runs: &[TextRun], mode: ExtractionMode) -> String {
        match mode {
            ExtractionMode::Plain => concatenate(runs),
            ExtractionMode::Lines => self.reconstruct_text(runs),
            ExtractionMode::Columns => self.detect_columns(runs).0,
        }
    }
}
