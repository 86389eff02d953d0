//! Extractive summarization of selected sections.
//!
//! Sentences are scored against the run query and the top K are kept,
//! minus near-duplicates, then restored to original document order so the
//! summary reads as prose rather than a similarity-sorted fragment list.
//! Every summary sentence is verbatim from the section body.

use std::cmp::Ordering;

use crate::model::{Query, Section, Summary};

use super::embed::{cosine_similarity, embed_chunked, Embedder};

/// Abbreviations whose trailing period does not end a sentence.
const ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "prof", "st", "vs", "etc", "fig", "no", "e.g", "i.e", "al",
];

/// Summarize one section: the top `k` sentences by query similarity, in
/// original order, with near-duplicates removed.
///
/// `dedup_threshold` is the cosine similarity above which two candidate
/// sentences count as duplicates (the later-scoring one is excluded).
/// A section with no sentences yields an empty summary.
pub fn summarize_section(
    embedder: &dyn Embedder,
    query: &Query,
    section: &Section,
    k: usize,
    dedup_threshold: f32,
) -> Summary {
    let sentences = split_sentences(&section.body);
    if sentences.is_empty() || k == 0 {
        return Summary::default();
    }

    // Score each sentence; embedding failures drop the sentence.
    let mut candidates: Vec<(usize, f32, Vec<f32>)> = Vec::new();
    for (i, sentence) in sentences.iter().enumerate() {
        match embed_chunked(embedder, sentence) {
            Ok(vector) => {
                let score = cosine_similarity(&query.embedding, &vector);
                candidates.push((i, score, vector));
            }
            Err(err) => {
                log::warn!(
                    "skipping sentence {i} of section {:?}: {err}",
                    section.node.text
                );
            }
        }
    }

    // Greedy selection, best first; ties go to the earlier sentence.
    candidates.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });

    let mut selected: Vec<(usize, &Vec<f32>)> = Vec::new();
    for (i, _, vector) in &candidates {
        if selected.len() == k {
            break;
        }
        let duplicate = selected
            .iter()
            .any(|(_, kept)| cosine_similarity(kept, vector) > dedup_threshold);
        if !duplicate {
            selected.push((*i, vector));
        }
    }

    // Restore document order.
    selected.sort_by_key(|(i, _)| *i);
    Summary::from_sentences(
        selected
            .into_iter()
            .map(|(i, _)| sentences[i].clone())
            .collect(),
    )
}

/// Split text into sentences.
///
/// Handles Latin terminators (`.!?`, requiring a following uppercase
/// letter, digit, or end of text), fullwidth CJK terminators (which always
/// end a sentence), decimal numbers, and common abbreviations.
pub fn split_sentences(text: &str) -> Vec<String> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }

    let chars: Vec<char> = text.chars().collect();
    let mut sentences = Vec::new();
    let mut start = 0usize;

    let mut i = 0usize;
    while i < chars.len() {
        let c = chars[i];
        let is_latin_end = matches!(c, '.' | '!' | '?');
        let is_cjk_end = matches!(c, '。' | '！' | '？');

        if is_cjk_end {
            push_sentence(&chars[start..=i], &mut sentences);
            start = i + 1;
            i += 1;
            continue;
        }

        if is_latin_end {
            let splittable = !(c == '.'
                && (is_decimal_point(&chars, i) || ends_with_abbreviation(&chars[start..i])));
            if splittable && boundary_follows(&chars, i) {
                // Keep trailing closers (quotes, parens) with the sentence.
                let mut end = i;
                while end + 1 < chars.len() && matches!(chars[end + 1], '"' | '\'' | ')' | '”' | '’')
                {
                    end += 1;
                }
                push_sentence(&chars[start..=end], &mut sentences);
                start = end + 1;
                i = end + 1;
                continue;
            }
        }

        i += 1;
    }

    if start < chars.len() {
        push_sentence(&chars[start..], &mut sentences);
    }

    sentences
}

fn push_sentence(chars: &[char], sentences: &mut Vec<String>) {
    let sentence: String = chars.iter().collect::<String>().trim().to_string();
    if !sentence.is_empty() {
        sentences.push(sentence);
    }
}

/// Whitespace then an uppercase letter, digit, or end of text follows the
/// terminator at `i`.
fn boundary_follows(chars: &[char], i: usize) -> bool {
    let mut j = i + 1;
    while j < chars.len() && matches!(chars[j], '"' | '\'' | ')' | '”' | '’') {
        j += 1;
    }
    if j >= chars.len() {
        return true;
    }
    if !chars[j].is_whitespace() {
        return false;
    }
    while j < chars.len() && chars[j].is_whitespace() {
        j += 1;
    }
    match chars.get(j) {
        None => true,
        Some(next) => next.is_uppercase() || next.is_ascii_digit() || !next.is_ascii(),
    }
}

/// The period at `i` sits between two digits ("3.14").
fn is_decimal_point(chars: &[char], i: usize) -> bool {
    i > 0
        && chars[i - 1].is_ascii_digit()
        && chars.get(i + 1).is_some_and(|c| c.is_ascii_digit())
}

/// The text before the period ends in a known abbreviation or an initial.
fn ends_with_abbreviation(before: &[char]) -> bool {
    let text: String = before.iter().collect();
    let last_word = match text.split_whitespace().next_back() {
        Some(w) => w.trim_start_matches(['(', '"', '\'']),
        None => return false,
    };
    // Single-letter initials like "J."
    if last_word.chars().count() == 1 && last_word.chars().all(|c| c.is_uppercase()) {
        return true;
    }
    let lower = last_word.to_lowercase();
    ABBREVIATIONS.contains(&lower.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::model::{HeadingLevel, OutlineNode};

    fn section(body: &str) -> Section {
        let node = OutlineNode::new(HeadingLevel::H1, "Photosynthesis", 1);
        let mut section = Section::new(node, "doc.pdf");
        if !body.is_empty() {
            section.push_body(body, 1);
        }
        section
    }

    /// Counts hits per term of a small vocabulary, one axis per term.
    struct LightEmbedder;

    const VOCABULARY: &[&str] = &["light", "leaf", "root", "chlorophyll", "fungi", "water"];

    impl Embedder for LightEmbedder {
        fn embed(&self, text: &str) -> Result<Vec<f32>> {
            let lower = text.to_lowercase();
            Ok(VOCABULARY
                .iter()
                .map(|term| lower.matches(term).count() as f32)
                .collect())
        }

        fn max_input_len(&self) -> usize {
            4096
        }
    }

    fn query() -> Query {
        // The "light" axis.
        Query {
            persona: "student".to_string(),
            job: "light facts".to_string(),
            text: "student. Task: light facts.".to_string(),
            embedding: vec![1.0, 0.0, 0.0, 0.0, 0.0, 0.0],
        }
    }

    #[test]
    fn test_split_basic_sentences() {
        let sentences = split_sentences(
            "Plants absorb light. Water moves up the stem! Does oxygen escape? Yes.",
        );
        assert_eq!(
            sentences,
            vec![
                "Plants absorb light.",
                "Water moves up the stem!",
                "Does oxygen escape?",
                "Yes.",
            ]
        );
    }

    #[test]
    fn test_split_handles_abbreviations_and_decimals() {
        let sentences =
            split_sentences("Dr. Smith measured 3.14 liters. The result held, e.g. at night.");
        assert_eq!(
            sentences,
            vec![
                "Dr. Smith measured 3.14 liters.",
                "The result held, e.g. at night.",
            ]
        );
    }

    #[test]
    fn test_split_cjk_terminators() {
        let sentences = split_sentences("光合成は重要です。植物は光を使います。");
        assert_eq!(sentences.len(), 2);
    }

    #[test]
    fn test_summary_is_extractive_subset_in_order() {
        let body = "Light drives photosynthesis in the leaf. \
                    Roots absorb minerals from soil. \
                    Chlorophyll captures light energy with high efficiency. \
                    Some fungi live near the roots.";
        let section = section(body);
        let summary = summarize_section(&LightEmbedder, &query(), &section, 2, 0.95);

        let original = split_sentences(body);
        assert_eq!(summary.sentences.len(), 2);
        for sentence in &summary.sentences {
            assert!(original.contains(sentence));
        }
        // Original order: the leaf sentence precedes the chlorophyll one.
        assert!(summary.sentences[0].starts_with("Light drives"));
        assert!(summary.sentences[1].starts_with("Chlorophyll"));
    }

    #[test]
    fn test_k_capped_at_available_sentences() {
        let section = section("Only one sentence about light here.");
        let summary = summarize_section(&LightEmbedder, &query(), &section, 5, 0.95);
        assert_eq!(summary.sentences.len(), 1);
    }

    #[test]
    fn test_empty_section_yields_empty_summary() {
        let section = section("");
        let summary = summarize_section(&LightEmbedder, &query(), &section, 3, 0.95);
        assert!(summary.is_empty());
        assert_eq!(summary.text, "");
    }

    #[test]
    fn test_near_duplicates_excluded() {
        let body = "Light powers the light reactions. \
                    Light powers the light processes. \
                    Water splits into oxygen under light.";
        let section = section(body);
        let summary = summarize_section(&LightEmbedder, &query(), &section, 2, 0.98);

        assert_eq!(summary.sentences.len(), 2);
        // The two near-identical openers must not both appear.
        let dupes = summary
            .sentences
            .iter()
            .filter(|s| s.starts_with("Light powers"))
            .count();
        assert_eq!(dupes, 1);
    }
}
