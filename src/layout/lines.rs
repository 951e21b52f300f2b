//! Line grouping and reading-order reconstruction.
//!
//! Runs are sorted top of page first (Y descending, since page Y increases
//! upward) and left to right (X ascending). Walking that order, a run starts
//! a new line when its baseline drops below the previous run's baseline by
//! more than the line threshold.

use crate::config::LayoutConfig;
use crate::layout::text_run::TextRun;
use crate::utils::safe_float_cmp;

/// A group of runs sharing a visual line, ordered left to right.
pub type Line = Vec<TextRun>;

/// Sort runs into reading order: Y descending, ties broken by X ascending.
pub fn sort_reading_order(runs: &mut [TextRun]) {
    runs.sort_by(|a, b| safe_float_cmp(b.y, a.y).then(safe_float_cmp(a.x, b.x)));
}

/// Threshold for the Y gap in front of `run`.
///
/// In relative mode a large-font heading tolerates proportionally larger
/// baseline shifts than small body text.
fn line_threshold(run: &TextRun, config: &LayoutConfig) -> f32 {
    if config.use_relative_threshold && run.font_size > 0.0 {
        run.font_size * 0.5
    } else {
        config.line_threshold
    }
}

/// Group runs into lines, top line first.
pub fn group_into_lines(runs: &[TextRun], config: &LayoutConfig) -> Vec<Line> {
    if runs.is_empty() {
        return Vec::new();
    }

    let mut sorted = runs.to_vec();
    sort_reading_order(&mut sorted);

    let mut lines: Vec<Line> = Vec::new();
    let mut current: Line = Vec::new();
    let mut last_y: Option<f32> = None;

    for run in sorted {
        if let Some(prev_y) = last_y {
            if prev_y - run.y > line_threshold(&run, config) {
                lines.push(std::mem::take(&mut current));
            }
        }
        last_y = Some(run.y);
        current.push(run);
    }

    if !current.is_empty() {
        lines.push(current);
    }

    // Baseline jitter inside a line can leave runs out of X order
    for line in &mut lines {
        line.sort_by(|a, b| safe_float_cmp(a.x, b.x));
    }

    log::debug!("Grouped {} runs into {} lines", runs.len(), lines.len());
    lines
}

/// Join a line's runs with single spaces.
pub fn line_text(line: &[TextRun]) -> String {
    line.iter()
        .map(|run| run.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Rebuild page text in reading order with one output line per visual line.
pub fn reconstruct_text(runs: &[TextRun], config: &LayoutConfig) -> String {
    group_into_lines(runs, config)
        .iter()
        .map(|line| line_text(line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Concatenate runs in extraction order without separators.
///
/// Parsers often split words into tiny fragments, so no spacing is added;
/// whatever spacing the document encodes shows through.
pub fn concatenate(runs: &[TextRun]) -> String {
    runs.iter().map(|run| run.text.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(text: &str, x: f32, y: f32, size: f32) -> TextRun {
        TextRun::new(text, x, y, size, text.len() as f32 * size * 0.5)
    }

    #[test]
    fn test_single_line() {
        let runs = vec![run("World", 60.0, 700.0, 12.0), run("Hello", 10.0, 700.0, 12.0)];
        assert_eq!(reconstruct_text(&runs, &LayoutConfig::default()), "Hello World");
    }

    #[test]
    fn test_multi_line_top_first() {
        let runs = vec![
            run("Line3", 10.0, 660.0, 12.0),
            run("Line1", 10.0, 700.0, 12.0),
            run("Line2", 10.0, 680.0, 12.0),
        ];
        assert_eq!(
            reconstruct_text(&runs, &LayoutConfig::default()),
            "Line1\nLine2\nLine3"
        );
    }

    #[test]
    fn test_relative_threshold_tolerates_heading_shift() {
        // 8pt baseline shift: below 0.5 × 24pt, above the 5pt absolute threshold
        let runs = vec![run("Big", 10.0, 700.0, 24.0), run("Title", 80.0, 692.0, 24.0)];

        let relative = LayoutConfig::default();
        assert_eq!(reconstruct_text(&runs, &relative), "Big Title");

        let absolute = LayoutConfig::default().with_relative_threshold(false);
        assert_eq!(reconstruct_text(&runs, &absolute), "Big\nTitle");
    }

    #[test]
    fn test_small_text_breaks_on_small_gap() {
        // 5pt gap exceeds 0.5 × 8pt
        let runs = vec![run("small", 10.0, 100.0, 8.0), run("print", 10.0, 95.0, 8.0)];
        assert_eq!(reconstruct_text(&runs, &LayoutConfig::default()), "small\nprint");
    }

    #[test]
    fn test_zero_font_size_uses_absolute_threshold() {
        let runs = vec![run("a", 10.0, 100.0, 0.0), run("b", 20.0, 97.0, 0.0)];
        assert_eq!(reconstruct_text(&runs, &LayoutConfig::default()), "a b");
    }

    #[test]
    fn test_group_into_lines() {
        let runs = vec![
            run("B", 50.0, 700.0, 12.0),
            run("A", 10.0, 701.0, 12.0),
            run("C", 10.0, 680.0, 12.0),
        ];
        let lines = group_into_lines(&runs, &LayoutConfig::default());
        assert_eq!(lines.len(), 2);
        assert_eq!(line_text(&lines[0]), "A B");
        assert_eq!(line_text(&lines[1]), "C");
    }

    #[test]
    fn test_empty_input() {
        assert!(group_into_lines(&[], &LayoutConfig::default()).is_empty());
        assert_eq!(reconstruct_text(&[], &LayoutConfig::default()), "");
        assert_eq!(concatenate(&[]), "");
    }

    #[test]
    fn test_concatenate_keeps_stream_order() {
        let runs = vec![run("He", 10.0, 600.0, 12.0), run("llo", 5.0, 700.0, 12.0)];
        assert_eq!(concatenate(&runs), "Hello");
    }
}
