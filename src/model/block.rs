//! Styled text block types.

use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in page coordinates.
///
/// Y grows downward: `y0` is the top edge, `y1` the bottom edge.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge
    pub x0: f32,
    /// Top edge
    pub y0: f32,
    /// Right edge
    pub x1: f32,
    /// Bottom edge
    pub y1: f32,
}

impl BoundingBox {
    /// Create a new bounding box.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Height of the box.
    pub fn height(&self) -> f32 {
        (self.y1 - self.y0).max(0.0)
    }

    /// Union of two boxes.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    /// Vertical gap between the bottom of this box and the top of `other`.
    ///
    /// Negative when the boxes overlap vertically.
    pub fn gap_to(&self, other: &BoundingBox) -> f32 {
        other.y0 - self.y1
    }
}

/// A positioned text block with style metadata.
///
/// Produced by the block source, cleaned by normalization, and immutable
/// afterward. One block roughly corresponds to one visual line or short
/// paragraph fragment on a page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextBlock {
    /// Page number (1-indexed)
    pub page: u32,

    /// Position on the page
    pub bbox: BoundingBox,

    /// Text content
    pub text: String,

    /// Dominant font size in points
    pub font_size: f32,

    /// Whether the dominant font is bold
    pub bold: bool,

    /// Whether the dominant font is italic
    pub italic: bool,

    /// ISO 639-3 code of the detected dominant language, or "unknown"
    pub language: String,
}

impl TextBlock {
    /// Create a new text block with an undetected language.
    pub fn new(page: u32, bbox: BoundingBox, text: impl Into<String>, font_size: f32) -> Self {
        Self {
            page,
            bbox,
            text: text.into(),
            font_size,
            bold: false,
            italic: false,
            language: "unknown".to_string(),
        }
    }

    /// Mark the block as bold.
    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    /// Mark the block as italic.
    pub fn with_italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }

    /// Number of whitespace-separated words.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    /// Whether the text ends with sentence-ending punctuation.
    pub fn ends_sentence(&self) -> bool {
        matches!(
            self.text.trim_end().chars().last(),
            Some('.') | Some('!') | Some('?') | Some('。') | Some('！') | Some('？')
        )
    }
}
