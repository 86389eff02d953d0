//! Per-document structural analysis.
//!
//! Normalizer, font profiler, heading classifier, and outline assembler,
//! chained by [`analyze`]. Documents are analyzed independently: nothing in
//! this module shares mutable state across documents, which is what makes
//! the multi-document phase embarrassingly parallel.

mod assemble;
mod classify;
mod normalize;
mod options;
mod profile;

pub use assemble::assemble;
pub use classify::HeadingClassifier;
pub use normalize::normalize;
pub use options::AnalyzeOptions;
pub use profile::StyleProfile;

use crate::error::{Error, Result};
use crate::model::{Outline, Section, TextBlock};

/// Structural analysis result for one document.
#[derive(Debug, Clone)]
pub struct DocumentAnalysis {
    /// Document identifier
    pub document: String,
    /// The leveled outline
    pub outline: Outline,
    /// One section per outline node, in document order
    pub sections: Vec<Section>,
}

/// Run the full structural chain for one document.
///
/// Returns an extraction failure when normalization leaves no usable
/// blocks (corrupt, empty, or image-only input).
pub fn analyze(
    document: &str,
    blocks: Vec<TextBlock>,
    page_count: u32,
    options: &AnalyzeOptions,
) -> Result<DocumentAnalysis> {
    if blocks.is_empty() {
        return Err(Error::extraction(document, "no text blocks extracted"));
    }

    let blocks = normalize(blocks, page_count, options);
    if blocks.is_empty() {
        return Err(Error::extraction(
            document,
            "no usable text blocks after normalization",
        ));
    }

    let profile = StyleProfile::build(&blocks);
    let classifier = HeadingClassifier::new(options.clone());
    let candidates = classifier.classify(&blocks, &profile);

    if candidates
        .iter()
        .all(|c| matches!(c.label, crate::model::Label::Body))
    {
        log::debug!("{document}: no headings detected, falling back to a single section");
    }

    let (outline, sections) = assemble(document, &blocks, &candidates);

    Ok(DocumentAnalysis {
        document: document.to_string(),
        outline,
        sections,
    })
}
