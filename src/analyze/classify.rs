//! Heading classification: labeling blocks as Title, H1-H3, or Body.
//!
//! Each block gets a weighted score from style and text signals; blocks
//! above the threshold become headings, with levels derived from the
//! document's font rank profile. Classification is deterministic: identical
//! blocks and profile always yield identical labels.

use regex::Regex;

use crate::model::{HeadingCandidate, HeadingLevel, Label, TextBlock};

use super::options::AnalyzeOptions;
use super::profile::StyleProfile;

/// Signal weights. The threshold in [`AnalyzeOptions`] is calibrated
/// against these, so they are fixed rather than configurable.
const WEIGHT_FONT_RANK: f32 = 3.0;
const WEIGHT_BOLD: f32 = 1.5;
const WEIGHT_SHORT: f32 = 1.0;
const WEIGHT_CASE: f32 = 1.0;
const WEIGHT_NUMBERING: f32 = 1.5;
const WEIGHT_GAP: f32 = 1.0;

/// Multi-signal heading classifier for one document.
pub struct HeadingClassifier {
    options: AnalyzeOptions,
    numbering: Regex,
    boilerplate: Regex,
}

impl HeadingClassifier {
    /// Create a classifier with the given options.
    pub fn new(options: AnalyzeOptions) -> Self {
        Self {
            options,
            // "1.", "2)", "A.", "IV.", "Chapter 2", "Section 3.1", "Appendix B"
            numbering: Regex::new(
                r"(?i)^(\d+(\.\d+)*[.)]?\s+|[A-Z][.)]\s+|[IVXLC]+\.\s+|(chapter|section|appendix|part)\s+[\dIVXLC]+)",
            )
            .unwrap(),
            boilerplate: Regex::new(
                r"(?i)(all rights reserved|copyright|confidential|continued on|page \d+ of|^www\.|@[a-z0-9.-]+\.[a-z]{2,}|^https?://|^tel[:.]|^fax[:.])",
            )
            .unwrap(),
        }
    }

    /// Classify every block, returning one candidate per block.
    ///
    /// Exactly one first-page block satisfying the title constraints is
    /// labeled `Title`; if none qualifies there is no title.
    pub fn classify(&self, blocks: &[TextBlock], profile: &StyleProfile) -> Vec<HeadingCandidate> {
        let avg_gap = average_gap(blocks);

        let scores: Vec<f32> = (0..blocks.len())
            .map(|i| self.heading_score(blocks, i, profile, avg_gap))
            .collect();

        let title_index = self.pick_title(blocks, profile, &scores);

        // Distinct font ranks of non-title headings, mapped in rank order
        // onto at most three heading levels.
        let mut heading_ranks: Vec<usize> = Vec::new();
        for (i, &score) in scores.iter().enumerate() {
            if score >= self.options.heading_threshold && Some(i) != title_index {
                let rank = profile.rank_of(blocks[i].font_size);
                if !heading_ranks.contains(&rank) {
                    heading_ranks.push(rank);
                }
            }
        }
        heading_ranks.sort_unstable();

        blocks
            .iter()
            .enumerate()
            .map(|(i, block)| {
                let label = if Some(i) == title_index {
                    Label::Heading(HeadingLevel::Title)
                } else if scores[i] >= self.options.heading_threshold {
                    let rank = profile.rank_of(block.font_size);
                    let position = heading_ranks.iter().position(|&r| r == rank).unwrap_or(0);
                    Label::Heading(HeadingLevel::from_depth(position.min(2) as u8 + 1))
                } else {
                    Label::Body
                };
                HeadingCandidate {
                    block_index: i,
                    label,
                    confidence: if matches!(label, Label::Body) {
                        0.0
                    } else {
                        scores[i]
                    },
                }
            })
            .collect()
    }

    /// Weighted heading score for one block; 0.0 when an exclusion filter
    /// rejects it outright.
    fn heading_score(
        &self,
        blocks: &[TextBlock],
        index: usize,
        profile: &StyleProfile,
        avg_gap: f32,
    ) -> f32 {
        let block = &blocks[index];
        let text = block.text.trim();
        let word_count = block.word_count();

        // Exclusion filters, cheapest first.
        if text.len() < 3 || text.len() > 200 || word_count > self.options.max_heading_words {
            return 0.0;
        }
        if alpha_ratio(text) < 0.25 {
            return 0.0;
        }
        if block.ends_sentence() && word_count > 10 {
            return 0.0;
        }
        if has_interior_sentence_break(text) {
            return 0.0;
        }
        if punctuation_density(text) > 0.15 {
            return 0.0;
        }
        if self.boilerplate.is_match(text) {
            return 0.0;
        }

        let mut score = 0.0;

        let rank = profile.rank_of(block.font_size);
        let body_rank = profile.body_rank();
        if rank < body_rank {
            score += WEIGHT_FONT_RANK * (body_rank - rank) as f32 / body_rank as f32;
        }

        if block.bold {
            score += WEIGHT_BOLD;
        }
        if word_count <= self.options.short_heading_words {
            score += WEIGHT_SHORT;
        }
        if is_title_case(text) || is_all_caps(text) {
            score += WEIGHT_CASE;
        }
        if self.numbering.is_match(text) {
            score += WEIGHT_NUMBERING;
        }
        if gap_before(blocks, index) > avg_gap * 1.5 {
            score += WEIGHT_GAP;
        }

        score
    }

    /// Pick the single best title candidate on page 1, if any.
    ///
    /// Title constraints: largest font rank, first page, upper half of the
    /// page. Ties go to the block higher on the page.
    fn pick_title(
        &self,
        blocks: &[TextBlock],
        profile: &StyleProfile,
        scores: &[f32],
    ) -> Option<usize> {
        let page1_bottom = blocks
            .iter()
            .filter(|b| b.page == 1)
            .map(|b| b.bbox.y1)
            .fold(0.0f32, f32::max);

        let mut best: Option<(usize, f32)> = None;
        for (i, block) in blocks.iter().enumerate() {
            if block.page != 1
                || scores[i] < self.options.heading_threshold
                || profile.rank_of(block.font_size) != 0
                || block.bbox.y0 > page1_bottom * 0.5
            {
                continue;
            }
            let better = match best {
                None => true,
                Some((j, s)) => {
                    scores[i] > s || (scores[i] == s && block.bbox.y0 < blocks[j].bbox.y0)
                }
            };
            if better {
                best = Some((i, scores[i]));
            }
        }
        best.map(|(i, _)| i)
    }
}

/// Average vertical gap between consecutive same-page blocks.
fn average_gap(blocks: &[TextBlock]) -> f32 {
    let gaps: Vec<f32> = blocks
        .windows(2)
        .filter(|w| w[0].page == w[1].page)
        .map(|w| w[0].bbox.gap_to(&w[1].bbox))
        .filter(|g| *g > 0.0)
        .collect();
    if gaps.is_empty() {
        return 12.0;
    }
    gaps.iter().sum::<f32>() / gaps.len() as f32
}

/// Vertical whitespace before a block. A page break counts as a large gap,
/// since headings often open a page.
fn gap_before(blocks: &[TextBlock], index: usize) -> f32 {
    if index == 0 {
        return f32::MAX;
    }
    let prev = &blocks[index - 1];
    let curr = &blocks[index];
    if prev.page != curr.page {
        f32::MAX
    } else {
        prev.bbox.gap_to(&curr.bbox)
    }
}

fn alpha_ratio(text: &str) -> f32 {
    let total = text.chars().count();
    if total == 0 {
        return 0.0;
    }
    let alpha = text.chars().filter(|c| c.is_alphabetic()).count();
    alpha as f32 / total as f32
}

/// Punctuation typical of running prose (commas, semicolons, parentheses).
fn punctuation_density(text: &str) -> f32 {
    let total = text.chars().count();
    if total == 0 {
        return 0.0;
    }
    let punct = text
        .chars()
        .filter(|c| matches!(c, ',' | ';' | '(' | ')' | '"' | '\''))
        .count();
    punct as f32 / total as f32
}

/// A period followed by more words marks body text, not a heading.
/// Numbering prefixes like "2.1 Scope" are exempt.
fn has_interior_sentence_break(text: &str) -> bool {
    let words: Vec<&str> = text.split_whitespace().collect();
    for (i, word) in words.iter().enumerate() {
        if i + 1 == words.len() {
            break;
        }
        if word.ends_with('.') && !word.chars().any(|c| c.is_ascii_digit()) && word.len() > 3 {
            return true;
        }
    }
    false
}

fn is_all_caps(text: &str) -> bool {
    let letters: Vec<char> = text.chars().filter(|c| c.is_alphabetic()).collect();
    !letters.is_empty() && letters.iter().all(|c| c.is_uppercase())
}

/// Most words start with an uppercase letter (articles and prepositions
/// excepted).
fn is_title_case(text: &str) -> bool {
    let words: Vec<&str> = text
        .split_whitespace()
        .filter(|w| w.chars().any(|c| c.is_alphabetic()))
        .collect();
    if words.is_empty() {
        return false;
    }
    let capitalized = words
        .iter()
        .filter(|w| w.chars().find(|c| c.is_alphabetic()).is_some_and(|c| c.is_uppercase()))
        .count();
    capitalized as f32 / words.len() as f32 >= 0.7
}
