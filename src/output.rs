//! Serializable run output.
//!
//! Flattens a [`RunResult`] into a stable JSON shape: run metadata, the
//! ranked section list, the per-section refined text, per-document
//! outlines, and any skipped documents.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::pipeline::RunResult;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonFormat {
    /// Pretty-printed with indentation
    Pretty,
    /// Compact single-line
    Compact,
}

/// Run-level metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMetadata {
    /// Identifiers of all input documents in the order they were given,
    /// analyzed and failed alike
    pub input_documents: Vec<String>,
    /// Persona description the run was scored for
    pub persona: String,
    /// Job-to-be-done statement
    pub job_to_be_done: String,
    /// RFC 3339 timestamp of when the output was built
    pub processing_timestamp: String,
}

/// One ranked section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedSection {
    /// Source document identifier
    pub document: String,
    /// Heading text of the section
    pub section_title: String,
    /// Heading level name ("Title", "H1", ...)
    pub level: String,
    /// Page the heading appears on
    pub page: u32,
    /// 1-based importance rank
    pub importance_rank: u32,
    /// Cosine similarity to the run query
    pub score: f32,
}

/// Refined text for one ranked section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubsectionAnalysis {
    /// Source document identifier
    pub document: String,
    /// Extractive summary of the section body
    pub refined_text: String,
    /// Page the section starts on
    pub page: u32,
}

/// One heading of a document outline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutlineEntry {
    /// Heading level name
    pub level: String,
    /// Heading text
    pub text: String,
    /// Page the heading appears on
    pub page: u32,
}

/// The outline of one analyzed document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentOutline {
    /// Document identifier
    pub document: String,
    /// Detected title, empty when none qualified
    pub title: String,
    /// Headings in document order
    pub headings: Vec<OutlineEntry>,
}

/// A document the run skipped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedDocument {
    /// Document identifier
    pub document: String,
    /// Why analysis failed
    pub reason: String,
}

/// The complete serializable output of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunOutput {
    /// Run-level metadata
    pub metadata: RunMetadata,
    /// Ranked sections, rank 1 first
    pub extracted_sections: Vec<ExtractedSection>,
    /// Refined text per ranked section, same order
    pub subsection_analysis: Vec<SubsectionAnalysis>,
    /// Per-document outlines in input order
    pub outlines: Vec<DocumentOutline>,
    /// Documents skipped because analysis failed
    pub skipped_documents: Vec<SkippedDocument>,
}

impl RunOutput {
    /// Build the output view of a run result.
    pub fn from_result(result: &RunResult) -> Self {
        let extracted_sections = result
            .sections
            .iter()
            .map(|s| ExtractedSection {
                document: s.scored.section.document.clone(),
                section_title: s.scored.section.node.text.clone(),
                level: s.scored.section.node.level.as_str().to_string(),
                page: s.scored.section.node.page,
                importance_rank: s.scored.rank,
                score: s.scored.score,
            })
            .collect();

        let subsection_analysis = result
            .sections
            .iter()
            .map(|s| SubsectionAnalysis {
                document: s.scored.section.document.clone(),
                refined_text: s.summary.text.clone(),
                page: s.scored.section.page_start,
            })
            .collect();

        let outlines = result
            .analyses
            .iter()
            .map(|a| DocumentOutline {
                document: a.document.clone(),
                title: a.outline.title.clone(),
                headings: a
                    .outline
                    .nodes
                    .iter()
                    .map(|n| OutlineEntry {
                        level: n.level.as_str().to_string(),
                        text: n.text.clone(),
                        page: n.page,
                    })
                    .collect(),
            })
            .collect();

        let skipped_documents = result
            .failures
            .iter()
            .map(|f| SkippedDocument {
                document: f.document.clone(),
                reason: f.reason.clone(),
            })
            .collect();

        Self {
            metadata: RunMetadata {
                input_documents: result.documents.clone(),
                persona: result.query.persona.clone(),
                job_to_be_done: result.query.job.clone(),
                processing_timestamp: Utc::now().to_rfc3339(),
            },
            extracted_sections,
            subsection_analysis,
            outlines,
            skipped_documents,
        }
    }

    /// Serialize to JSON in the given format.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        let json = match format {
            JsonFormat::Pretty => serde_json::to_string_pretty(self),
            JsonFormat::Compact => serde_json::to_string(self),
        };
        json.map_err(|e| Error::Output(e.to_string()))
    }
}
