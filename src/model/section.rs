//! Section, scoring, and summary types.

use serde::{Deserialize, Serialize};

use super::OutlineNode;

/// A heading together with the body text it owns.
///
/// The body is everything between this heading and the next heading of
/// equal-or-shallower level. Created by the outline assembler; read-only
/// afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    /// The owning outline node
    pub node: OutlineNode,
    /// Identifier of the document this section belongs to
    pub document: String,
    /// Concatenated body text (may be empty)
    pub body: String,
    /// First page covered by the section
    pub page_start: u32,
    /// Last page covered by the section
    pub page_end: u32,
}

impl Section {
    /// Create a section with an empty body starting at the node's page.
    pub fn new(node: OutlineNode, document: impl Into<String>) -> Self {
        let page = node.page;
        Self {
            node,
            document: document.into(),
            body: String::new(),
            page_start: page,
            page_end: page,
        }
    }

    /// Append a body fragment, extending the page range.
    pub fn push_body(&mut self, text: &str, page: u32) {
        if !self.body.is_empty() {
            self.body.push(' ');
        }
        self.body.push_str(text);
        self.page_end = self.page_end.max(page);
    }
}

/// A section scored against the run query.
///
/// Ephemeral: produced and consumed within a single run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredSection {
    /// The underlying section
    pub section: Section,
    /// Cosine similarity to the query, in [-1, 1]
    pub score: f32,
    /// 1-based importance rank after selection
    pub rank: u32,
}

/// Extractive summary of one selected section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Summary {
    /// Selected sentences in original document order
    pub sentences: Vec<String>,
    /// The sentences joined into one string
    pub text: String,
}

impl Summary {
    /// Build a summary from sentences already in document order.
    pub fn from_sentences(sentences: Vec<String>) -> Self {
        let text = sentences.join(" ");
        Self { sentences, text }
    }

    /// Whether the summary is empty.
    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }
}
