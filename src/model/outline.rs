//! Outline and heading classification types.

use serde::{Deserialize, Serialize};

/// Level of a heading in the document hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HeadingLevel {
    /// Document title (at most one per document, first page only)
    Title,
    /// Top-level heading
    H1,
    /// Second-level heading
    H2,
    /// Third-level heading
    H3,
}

impl HeadingLevel {
    /// Nesting depth: Title = 0, H1 = 1, H2 = 2, H3 = 3.
    pub fn depth(&self) -> u8 {
        match self {
            HeadingLevel::Title => 0,
            HeadingLevel::H1 => 1,
            HeadingLevel::H2 => 2,
            HeadingLevel::H3 => 3,
        }
    }

    /// Heading level for a nesting depth, clamped to H3.
    pub fn from_depth(depth: u8) -> Self {
        match depth {
            0 => HeadingLevel::Title,
            1 => HeadingLevel::H1,
            2 => HeadingLevel::H2,
            _ => HeadingLevel::H3,
        }
    }

    /// Display name ("Title", "H1", ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            HeadingLevel::Title => "Title",
            HeadingLevel::H1 => "H1",
            HeadingLevel::H2 => "H2",
            HeadingLevel::H3 => "H3",
        }
    }
}

/// Classification label assigned to a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Label {
    /// The block is a heading at the given level
    Heading(HeadingLevel),
    /// The block is body text
    Body,
}

/// A block annotated with its classification.
///
/// Derived by the heading classifier; never mutated after creation.
#[derive(Debug, Clone)]
pub struct HeadingCandidate {
    /// Index into the normalized block sequence
    pub block_index: usize,
    /// Assigned label
    pub label: Label,
    /// Classifier confidence (heading score, 0 for body)
    pub confidence: f32,
}

/// One entry of the document outline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlineNode {
    /// Heading level
    pub level: HeadingLevel,
    /// Heading text
    pub text: String,
    /// Page the heading appears on (1-indexed)
    pub page: u32,
}

impl OutlineNode {
    /// Create a new outline node.
    pub fn new(level: HeadingLevel, text: impl Into<String>, page: u32) -> Self {
        Self {
            level,
            text: text.into(),
            page,
        }
    }
}

/// The ordered outline of one document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Outline {
    /// Document title text, empty when no block qualified
    pub title: String,
    /// Heading nodes in document order (the title is not repeated here)
    pub nodes: Vec<OutlineNode>,
}

impl Outline {
    /// Whether the outline has neither title nor headings.
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.nodes.is_empty()
    }
}
