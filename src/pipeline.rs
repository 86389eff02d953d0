//! Multi-document orchestration: analyze, rank, summarize.
//!
//! Documents are analyzed independently (in parallel by default), then the
//! surviving sections are ranked against the run query in a single pass
//! and only the selected ones are summarized. One bad document never
//! aborts a run; it is recorded and the rest proceed.

use rayon::prelude::*;

use crate::analyze::{analyze, AnalyzeOptions, DocumentAnalysis};
use crate::error::{Error, Result};
use crate::model::{Query, ScoredSection, Summary, TextBlock};
use crate::rank::{encode_query, rank_sections, summarize_section, Embedder};

/// A provider of extracted text blocks for one document.
///
/// Implementations wrap whatever extraction backend produced the styled
/// blocks. `blocks` is called once per run, from a worker thread when
/// parallel processing is enabled.
pub trait BlockSource: Send + Sync {
    /// Stable identifier of the document (usually its file name).
    fn document(&self) -> &str;

    /// Number of pages in the document.
    fn page_count(&self) -> u32;

    /// Extracted blocks in reading order.
    fn blocks(&self) -> Result<Vec<TextBlock>>;
}

/// Configuration for a ranking run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Persona description
    pub persona: String,
    /// Job-to-be-done statement
    pub job: String,
    /// Number of sections to select across all documents
    pub top_sections: usize,
    /// Maximum sentences per section summary
    pub summary_sentences: usize,
    /// Per-document cap on selected sections (0 disables the cap)
    pub per_document_cap: usize,
    /// Cosine similarity above which summary sentences count as duplicates
    pub dedup_threshold: f32,
    /// Analyze documents on the rayon thread pool
    pub parallel: bool,
    /// Per-document analysis options
    pub analyze_options: AnalyzeOptions,
}

impl RunConfig {
    /// Create a configuration with defaults for the given persona and job.
    pub fn new(persona: impl Into<String>, job: impl Into<String>) -> Self {
        Self {
            persona: persona.into(),
            job: job.into(),
            top_sections: 5,
            summary_sentences: 3,
            per_document_cap: 0,
            dedup_threshold: 0.92,
            parallel: true,
            analyze_options: AnalyzeOptions::default(),
        }
    }

    /// Set the number of sections to select.
    pub fn with_top_sections(mut self, n: usize) -> Self {
        self.top_sections = n;
        self
    }

    /// Set the maximum sentences per summary.
    pub fn with_summary_sentences(mut self, k: usize) -> Self {
        self.summary_sentences = k;
        self
    }

    /// Set the per-document selection cap (0 disables it).
    pub fn with_per_document_cap(mut self, cap: usize) -> Self {
        self.per_document_cap = cap;
        self
    }

    /// Set the summary near-duplicate threshold.
    pub fn with_dedup_threshold(mut self, threshold: f32) -> Self {
        self.dedup_threshold = threshold;
        self
    }

    /// Disable parallel document analysis.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Set the per-document analysis options.
    pub fn with_analyze_options(mut self, options: AnalyzeOptions) -> Self {
        self.analyze_options = options;
        self
    }

    fn validate(&self, source_count: usize) -> Result<()> {
        if self.persona.trim().is_empty() && self.job.trim().is_empty() {
            return Err(Error::Configuration(
                "persona and job-to-be-done are both empty".to_string(),
            ));
        }
        if self.top_sections == 0 {
            return Err(Error::Configuration(
                "top_sections must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.dedup_threshold) {
            return Err(Error::Configuration(format!(
                "dedup_threshold {} outside [0, 1]",
                self.dedup_threshold
            )));
        }
        if source_count == 0 {
            return Err(Error::Configuration("no documents to process".to_string()));
        }
        Ok(())
    }
}

/// A selected section with its summary.
#[derive(Debug, Clone)]
pub struct RankedSection {
    /// The section, its score, and its 1-based rank
    pub scored: ScoredSection,
    /// Extractive summary of the section body
    pub summary: Summary,
}

/// A document that could not be analyzed.
#[derive(Debug, Clone)]
pub struct FailedDocument {
    /// Document identifier
    pub document: String,
    /// Human-readable failure reason
    pub reason: String,
}

/// The complete result of one run.
#[derive(Debug, Clone)]
pub struct RunResult {
    /// The encoded run query
    pub query: Query,
    /// All input document identifiers, in the order they were given
    pub documents: Vec<String>,
    /// Per-document structural analyses, in input order
    pub analyses: Vec<DocumentAnalysis>,
    /// Selected sections with summaries, rank 1 first
    pub sections: Vec<RankedSection>,
    /// Documents skipped because analysis failed, in input order
    pub failures: Vec<FailedDocument>,
}

/// Run the full pipeline over a set of documents.
///
/// Configuration problems are fatal and reported before any document is
/// touched. Per-document extraction failures are downgraded to entries in
/// [`RunResult::failures`] so the remaining documents still produce a
/// ranking. Fails when every document failed.
pub fn run(
    embedder: &dyn Embedder,
    sources: &[&dyn BlockSource],
    config: &RunConfig,
) -> Result<RunResult> {
    config.validate(sources.len())?;

    let query = encode_query(embedder, &config.persona, &config.job)?;
    let documents: Vec<String> = sources.iter().map(|s| s.document().to_string()).collect();

    let outcomes: Vec<std::result::Result<DocumentAnalysis, FailedDocument>> = if config.parallel {
        sources.par_iter().map(|s| analyze_source(*s, config)).collect()
    } else {
        sources.iter().map(|s| analyze_source(*s, config)).collect()
    };

    let mut analyses = Vec::new();
    let mut failures = Vec::new();
    for outcome in outcomes {
        match outcome {
            Ok(analysis) => analyses.push(analysis),
            Err(failure) => failures.push(failure),
        }
    }

    if analyses.is_empty() {
        return Err(Error::Configuration(
            "no valid documents after filtering".to_string(),
        ));
    }

    let scored = rank_sections(
        embedder,
        &query,
        &analyses,
        config.top_sections,
        config.per_document_cap,
    );

    // Summarize only what was selected.
    let sections = scored
        .into_iter()
        .map(|scored| {
            let summary = summarize_section(
                embedder,
                &query,
                &scored.section,
                config.summary_sentences,
                config.dedup_threshold,
            );
            RankedSection { scored, summary }
        })
        .collect();

    Ok(RunResult {
        query,
        documents,
        analyses,
        sections,
        failures,
    })
}

fn analyze_source(
    source: &dyn BlockSource,
    config: &RunConfig,
) -> std::result::Result<DocumentAnalysis, FailedDocument> {
    let document = source.document().to_string();
    let blocks = match source.blocks() {
        Ok(blocks) => blocks,
        Err(err) => {
            log::warn!("{document}: block extraction failed: {err}");
            return Err(FailedDocument {
                document,
                reason: err.to_string(),
            });
        }
    };

    match analyze(&document, blocks, source.page_count(), &config.analyze_options) {
        Ok(analysis) => Ok(analysis),
        Err(err) => {
            log::warn!("{document}: analysis failed: {err}");
            Err(FailedDocument {
                document,
                reason: err.to_string(),
            })
        }
    }
}
