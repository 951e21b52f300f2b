//! Heading detection from font sizes.
//!
//! A run is a heading candidate when its font size is clearly larger than
//! the body text of the page. The body size is estimated with the median of
//! all positive font sizes, which a handful of large titles cannot skew.

use crate::layout::text_run::TextRun;
use crate::utils::safe_float_cmp;

/// Size ratio over the median above which a run counts as a heading.
pub const HEADING_SIZE_RATIO: f32 = 1.2;

/// Median of the positive font sizes, or `None` if no run has a size.
///
/// For an even number of sizes the upper middle value is used.
pub fn median_font_size(runs: &[TextRun]) -> Option<f32> {
    let mut sizes: Vec<f32> = runs
        .iter()
        .map(|run| run.font_size)
        .filter(|&size| size > 0.0)
        .collect();

    if sizes.is_empty() {
        return None;
    }

    sizes.sort_by(|a, b| safe_float_cmp(*a, *b));
    Some(sizes[sizes.len() / 2])
}

/// Detect heading candidates.
///
/// Returns the indices (in input order) of runs whose font size exceeds
/// `1.2 × median`.
///
/// # Examples
///
/// ```
/// use pdf_pager::layout::{detect_headings, TextRun};
///
/// let runs = vec![
///     TextRun::new("Title", 10.0, 700.0, 24.0, 60.0),
///     TextRun::new("body", 10.0, 680.0, 12.0, 24.0),
///     TextRun::new("text", 40.0, 680.0, 12.0, 24.0),
/// ];
/// assert_eq!(detect_headings(&runs), vec![0]);
/// ```
pub fn detect_headings(runs: &[TextRun]) -> Vec<usize> {
    let median = match median_font_size(runs) {
        Some(median) => median,
        None => return Vec::new(),
    };

    let cutoff = median * HEADING_SIZE_RATIO;
    let headings: Vec<usize> = runs
        .iter()
        .enumerate()
        .filter(|(_, run)| run.font_size > cutoff)
        .map(|(i, _)| i)
        .collect();

    log::debug!(
        "Median font size {:.1}, {} heading candidate(s)",
        median,
        headings.len()
    );
    headings
}
