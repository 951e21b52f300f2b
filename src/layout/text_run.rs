//! Positioned text runs as emitted by the page extractor.

use serde::Serialize;

/// A positioned text run (complete string from a text-showing operator).
///
/// Coordinates are in page space: `x` is the left edge, `y` is the baseline,
/// and Y increases upward, so larger `y` values are higher on the page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextRun {
    /// The text content
    pub text: String,
    /// Left edge in points
    pub x: f32,
    /// Baseline in points
    pub y: f32,
    /// Font resource name
    pub font_name: String,
    /// Font size in points
    pub font_size: f32,
    /// Advance width of the run in points
    pub width: f32,
}

impl TextRun {
    /// Create a run with an empty font name.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_pager::layout::TextRun;
    ///
    /// let run = TextRun::new("Hello", 72.0, 700.0, 12.0, 30.0);
    /// assert_eq!(run.right(), 102.0);
    /// ```
    pub fn new(text: impl Into<String>, x: f32, y: f32, font_size: f32, width: f32) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            font_name: String::new(),
            font_size,
            width,
        }
    }

    /// Set the font name.
    pub fn with_font(mut self, font_name: impl Into<String>) -> Self {
        self.font_name = font_name.into();
        self
    }

    /// Right edge (`x + width`).
    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}
