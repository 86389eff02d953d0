//! # docrank
//!
//! Document outline extraction and persona-driven section ranking.
//!
//! This library takes styled text blocks extracted from documents, infers
//! each document's heading hierarchy from layout signals (font sizes,
//! weight, spacing), then ranks the resulting sections against a persona
//! and job-to-be-done and produces extractive summaries of the best ones.
//!
//! ## Quick Start
//!
//! ```
//! use docrank::{
//!     BlockSource, BoundingBox, Embedder, JsonFormat, Result, RunConfig, TextBlock,
//! };
//!
//! // Any embedding model works behind the `Embedder` trait. This stand-in
//! // counts vocabulary hits.
//! struct BagOfWords;
//!
//! impl Embedder for BagOfWords {
//!     fn embed(&self, text: &str) -> Result<Vec<f32>> {
//!         let lower = text.to_lowercase();
//!         Ok(["photosynthesis", "light", "root"]
//!             .iter()
//!             .map(|term| 1.0 + lower.matches(term).count() as f32)
//!             .collect())
//!     }
//!
//!     fn max_input_len(&self) -> usize {
//!         4096
//!     }
//! }
//!
//! struct Extracted;
//!
//! impl BlockSource for Extracted {
//!     fn document(&self) -> &str {
//!         "notes.pdf"
//!     }
//!
//!     fn page_count(&self) -> u32 {
//!         1
//!     }
//!
//!     fn blocks(&self) -> Result<Vec<TextBlock>> {
//!         Ok(vec![
//!             TextBlock::new(1, BoundingBox::new(50.0, 60.0, 300.0, 78.0), "Photosynthesis", 18.0)
//!                 .with_bold(true),
//!             TextBlock::new(
//!                 1,
//!                 BoundingBox::new(50.0, 100.0, 400.0, 111.0),
//!                 "Plants use light to make sugar from carbon dioxide.",
//!                 11.0,
//!             ),
//!         ])
//!     }
//! }
//!
//! fn main() -> Result<()> {
//!     let doc = Extracted;
//!     let sources: Vec<&dyn BlockSource> = vec![&doc];
//!     let config = RunConfig::new("A biology student", "revise photosynthesis")
//!         .with_top_sections(3);
//!
//!     let output = docrank::process(&BagOfWords, &sources, &config)?;
//!     println!("{}", output.to_json(JsonFormat::Pretty)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Outline detection**: title and H1-H3 headings from layout signals,
//!   no hardcoded font sizes
//! - **Persona ranking**: sections scored by cosine similarity against a
//!   persona + job query
//! - **Extractive summaries**: verbatim sentences, query-relevant, in
//!   document order
//! - **Fault isolation**: one unreadable document never aborts a run
//! - **Parallel processing**: documents analyzed on the Rayon thread pool

pub mod analyze;
pub mod detect;
pub mod error;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod rank;

// Re-export commonly used types
pub use analyze::{analyze, AnalyzeOptions, DocumentAnalysis, HeadingClassifier, StyleProfile};
pub use detect::detect_language;
pub use error::{Error, Result};
pub use model::{
    BoundingBox, HeadingCandidate, HeadingLevel, Label, Outline, OutlineNode, Query,
    ScoredSection, Section, Summary, TextBlock,
};
pub use output::{JsonFormat, RunOutput};
pub use pipeline::{run, BlockSource, FailedDocument, RankedSection, RunConfig, RunResult};
pub use rank::{cosine_similarity, encode_query, rank_sections, summarize_section, Embedder};

/// Run the full pipeline and return the serializable output.
///
/// Convenience wrapper around [`pipeline::run`] and
/// [`RunOutput::from_result`].
pub fn process(
    embedder: &dyn Embedder,
    sources: &[&dyn BlockSource],
    config: &RunConfig,
) -> Result<RunOutput> {
    let result = pipeline::run(embedder, sources, config)?;
    Ok(RunOutput::from_result(&result))
}

/// Run the full pipeline and return the output as JSON.
pub fn process_to_json(
    embedder: &dyn Embedder,
    sources: &[&dyn BlockSource],
    config: &RunConfig,
    format: JsonFormat,
) -> Result<String> {
    process(embedder, sources, config)?.to_json(format)
}

/// Extract the outline of a single document.
///
/// Shortcut for callers that only need structure, not ranking.
pub fn extract_outline(
    document: &str,
    blocks: Vec<TextBlock>,
    page_count: u32,
) -> Result<Outline> {
    let analysis = analyze(document, blocks, page_count, &AnalyzeOptions::default())?;
    Ok(analysis.outline)
}
