//! Column detection from run edges.
//!
//! All left and right run edges across the page are collected and sorted;
//! an uncovered gap wider than the column threshold between two consecutive
//! edges marks the start of a new column. Each run is then assigned to the
//! column that contains its left edge and the page is rendered line by line
//! with `" | "` between the column segments of a line.

use crate::layout::lines::{Line, line_text};
use crate::layout::text_run::TextRun;
use crate::utils::safe_float_cmp;
use serde::Serialize;

/// Separator placed between column segments on the same line.
pub const COLUMN_SEPARATOR: &str = " | ";

/// A vertical region of text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    /// Minimum X coordinate
    pub left: f32,
    /// Maximum X coordinate (start of the next column, or the rightmost edge)
    pub right: f32,
    /// `right - left`
    pub width: f32,
    /// Text of this column for each page line (empty when the line has nothing here)
    pub lines: Vec<String>,
}

impl Column {
    fn new(left: f32, right: f32) -> Self {
        Self {
            left,
            right,
            width: right - left,
            lines: Vec::new(),
        }
    }
}

/// Find column boundaries from the X edges of every run.
///
/// Only gaps that no run covers count, so a wide run never splits itself.
pub fn detect_column_boundaries(lines: &[Line], column_threshold: f32) -> Vec<Column> {
    let mut spans: Vec<(f32, f32)> = lines
        .iter()
        .flatten()
        .map(|run| (run.x.min(run.right()), run.x.max(run.right())))
        .collect();

    if spans.is_empty() {
        return Vec::new();
    }

    spans.sort_by(|a, b| safe_float_cmp(a.0, b.0));

    let mut starts = vec![spans[0].0];
    let mut covered_to = spans[0].1;
    for &(left, right) in &spans[1..] {
        if left - covered_to > column_threshold {
            starts.push(left);
        }
        covered_to = covered_to.max(right);
    }

    let columns: Vec<Column> = starts
        .iter()
        .enumerate()
        .map(|(i, &left)| {
            let right = starts.get(i + 1).copied().unwrap_or(covered_to);
            Column::new(left, right)
        })
        .collect();

    log::debug!("Detected {} column(s) from {} runs", columns.len(), spans.len());
    columns
}

/// Index of the column whose range holds `run`'s left edge.
fn column_for(run: &TextRun, columns: &[Column]) -> usize {
    columns
        .iter()
        .rposition(|col| run.x >= col.left)
        .unwrap_or(0)
}

/// Render lines column by column, filling each column's `lines`.
pub fn format_by_columns(lines: &[Line], columns: &mut [Column]) -> String {
    if columns.is_empty() {
        return lines
            .iter()
            .map(|line| line_text(line))
            .collect::<Vec<_>>()
            .join("\n");
    }

    let mut output = Vec::with_capacity(lines.len());
    for line in lines {
        let mut segments: Vec<Vec<&str>> = vec![Vec::new(); columns.len()];
        for run in line {
            segments[column_for(run, columns)].push(run.text.as_str());
        }

        let mut rendered = Vec::new();
        for (column, parts) in columns.iter_mut().zip(segments) {
            let text = parts.join(" ");
            if !text.is_empty() {
                rendered.push(text.clone());
            }
            column.lines.push(text);
        }
        output.push(rendered.join(COLUMN_SEPARATOR));
    }

    output.join("\n")
}

/// Detect columns over already grouped lines and render the page text.
pub fn detect_columns(lines: &[Line], column_threshold: f32) -> (String, Vec<Column>) {
    let mut columns = detect_column_boundaries(lines, column_threshold);
    let text = format_by_columns(lines, &mut columns);
    (text, columns)
}
