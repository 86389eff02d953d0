//! Relevance ranking: scoring sections against the query and selecting the
//! top-N with per-document fairness.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::analyze::DocumentAnalysis;
use crate::model::{Query, ScoredSection, Section};

use super::embed::{cosine_similarity, embed_chunked, Embedder};

/// Score every section of every document against the query and return the
/// top `top_n`, ranked 1-based.
///
/// When more than one document contributed sections, no single document may
/// fill more than `per_document_cap` of the `top_n` slots; remaining slots
/// are refilled in global score order so the total stays at `top_n`
/// whenever enough sections exist. Sections whose embedding fails are
/// logged and excluded.
pub fn rank_sections(
    embedder: &dyn Embedder,
    query: &Query,
    analyses: &[DocumentAnalysis],
    top_n: usize,
    per_document_cap: usize,
) -> Vec<ScoredSection> {
    // (doc order, score, section) for every embeddable section.
    let mut scored: Vec<(usize, f32, &Section)> = Vec::new();
    for (doc_order, analysis) in analyses.iter().enumerate() {
        for section in &analysis.sections {
            let text = section_text(section);
            match embed_chunked(embedder, &text) {
                Ok(vector) => {
                    let score = cosine_similarity(&query.embedding, &vector);
                    scored.push((doc_order, score, section));
                }
                Err(err) => {
                    log::warn!(
                        "skipping section {:?} of {}: {err}",
                        section.node.text,
                        section.document
                    );
                }
            }
        }
    }

    scored.sort_by(compare_scored);

    let mut selected = select_with_cap(&scored, top_n, per_document_cap, analyses.len());
    // Refilled entries land at the back; restore global score order so the
    // final list is non-increasing.
    selected.sort_by(compare_scored);

    selected
        .into_iter()
        .enumerate()
        .map(|(i, (_, score, section))| ScoredSection {
            section: section.clone(),
            score,
            rank: (i + 1) as u32,
        })
        .collect()
}

/// Descending score; ties go to the shallower heading, then earlier
/// document, then earlier page.
fn compare_scored(a: &(usize, f32, &Section), b: &(usize, f32, &Section)) -> Ordering {
    b.1.partial_cmp(&a.1)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.2.node.level.depth().cmp(&b.2.node.level.depth()))
        .then_with(|| a.0.cmp(&b.0))
        .then_with(|| a.2.page_start.cmp(&b.2.page_start))
}

/// The text a section is scored on: heading plus owned body.
fn section_text(section: &Section) -> String {
    if section.body.is_empty() {
        section.node.text.clone()
    } else {
        format!("{}. {}", section.node.text, section.body)
    }
}

/// Top-N selection with the per-document cap and best-effort refill.
fn select_with_cap<'a>(
    scored: &[(usize, f32, &'a Section)],
    top_n: usize,
    per_document_cap: usize,
    document_count: usize,
) -> Vec<(usize, f32, &'a Section)> {
    // The cap only applies when more than one document is present.
    if document_count <= 1 || per_document_cap == 0 {
        return scored.iter().take(top_n).cloned().collect();
    }

    let mut taken: Vec<(usize, f32, &Section)> = Vec::with_capacity(top_n);
    let mut per_doc: HashMap<usize, usize> = HashMap::new();
    let mut overflow: Vec<(usize, f32, &Section)> = Vec::new();

    for entry in scored {
        if taken.len() == top_n {
            break;
        }
        let count = per_doc.entry(entry.0).or_insert(0);
        if *count < per_document_cap {
            *count += 1;
            taken.push(*entry);
        } else {
            overflow.push(*entry);
        }
    }

    // Refill from capped-out sections, best score first, so the run still
    // returns top_n results when the other documents ran dry.
    for entry in overflow {
        if taken.len() == top_n {
            break;
        }
        taken.push(entry);
    }

    taken
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::model::{HeadingLevel, Outline, OutlineNode};

    /// Scores sections by a number hidden in their text ("relevance N").
    struct PlantedEmbedder;

    impl Embedder for PlantedEmbedder {
        fn embed(&self, text: &str) -> Result<Vec<f32>> {
            if text.contains("poison") {
                return Err(crate::error::Error::Embedding("poisoned".to_string()));
            }
            let planted = text
                .split_whitespace()
                .filter_map(|w| w.parse::<f32>().ok())
                .next_back()
                .unwrap_or(0.0);
            // Angle encodes relevance, so cosine against the query vector
            // [1, 0] orders sections by the planted value.
            let angle = planted.clamp(0.0, 1.0) * std::f32::consts::FRAC_PI_2;
            Ok(vec![angle.cos(), angle.sin()])
        }

        fn max_input_len(&self) -> usize {
            4096
        }
    }

    fn query() -> Query {
        Query {
            persona: "tester".to_string(),
            job: "rank".to_string(),
            text: "tester. Task: rank.".to_string(),
            embedding: vec![1.0, 0.0],
        }
    }

    fn analysis(document: &str, relevances: &[f32]) -> DocumentAnalysis {
        let sections = relevances
            .iter()
            .enumerate()
            .map(|(i, r)| {
                let node =
                    OutlineNode::new(HeadingLevel::H1, format!("S{i}"), (i + 1) as u32);
                let mut section = Section::new(node, document);
                // Lower planted value = higher cosine against [1, 0].
                section.push_body(&format!("body {r}"), (i + 1) as u32);
                section
            })
            .collect();
        DocumentAnalysis {
            document: document.to_string(),
            outline: Outline::default(),
            sections,
        }
    }

    #[test]
    fn test_sorted_non_increasing_with_ranks() {
        let analyses = vec![analysis("a.pdf", &[0.9, 0.1, 0.5])];
        let ranked = rank_sections(&PlantedEmbedder, &query(), &analyses, 3, 0);

        assert_eq!(ranked.len(), 3);
        for window in ranked.windows(2) {
            assert!(window[0].score >= window[1].score);
        }
        assert_eq!(
            ranked.iter().map(|s| s.rank).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert_eq!(ranked[0].section.node.text, "S1");
    }

    #[test]
    fn test_scores_within_bounds() {
        let analyses = vec![analysis("a.pdf", &[0.0, 1.0, 0.3])];
        let ranked = rank_sections(&PlantedEmbedder, &query(), &analyses, 3, 0);
        assert!(ranked.iter().all(|s| (-1.0..=1.0).contains(&s.score)));
    }

    #[test]
    fn test_per_document_cap_enforced() {
        // a.pdf has the three best sections but may only contribute two.
        let analyses = vec![
            analysis("a.pdf", &[0.0, 0.05, 0.1]),
            analysis("b.pdf", &[0.5, 0.6]),
        ];
        let ranked = rank_sections(&PlantedEmbedder, &query(), &analyses, 3, 2);

        assert_eq!(ranked.len(), 3);
        let from_a = ranked.iter().filter(|s| s.section.document == "a.pdf").count();
        assert_eq!(from_a, 2);
        assert_eq!(ranked[2].section.document, "b.pdf");
    }

    #[test]
    fn test_cap_refilled_when_others_run_dry() {
        // b.pdf has a single section, so a.pdf overfills its cap to reach N.
        let analyses = vec![
            analysis("a.pdf", &[0.0, 0.1, 0.2]),
            analysis("b.pdf", &[0.9]),
        ];
        let ranked = rank_sections(&PlantedEmbedder, &query(), &analyses, 4, 2);

        assert_eq!(ranked.len(), 4);
        let from_a = ranked.iter().filter(|s| s.section.document == "a.pdf").count();
        assert_eq!(from_a, 3);
    }

    #[test]
    fn test_single_document_ignores_cap() {
        let analyses = vec![analysis("only.pdf", &[0.1, 0.2, 0.3, 0.4])];
        let ranked = rank_sections(&PlantedEmbedder, &query(), &analyses, 4, 1);
        assert_eq!(ranked.len(), 4);
    }

    #[test]
    fn test_embedding_failure_excludes_section() {
        let mut analyses = vec![analysis("a.pdf", &[0.2, 0.4])];
        analyses[0].sections[0].body = "poison 0.2".to_string();
        let ranked = rank_sections(&PlantedEmbedder, &query(), &analyses, 5, 0);

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].section.node.text, "S1");
    }

    #[test]
    fn test_no_duplicate_sections_selected() {
        let analyses = vec![
            analysis("a.pdf", &[0.0, 0.1]),
            analysis("b.pdf", &[0.2, 0.3]),
        ];
        let ranked = rank_sections(&PlantedEmbedder, &query(), &analyses, 4, 1);

        assert_eq!(ranked.len(), 4);
        let mut keys: Vec<(String, String)> = ranked
            .iter()
            .map(|s| (s.section.document.clone(), s.section.node.text.clone()))
            .collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), 4);
    }
}
