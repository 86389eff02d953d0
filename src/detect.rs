//! Language identification for text blocks.
//!
//! Detection runs at sentence granularity and the block is tagged with the
//! majority language, which is more robust than whole-block detection for
//! short mixed-language fragments. Failures default to `"unknown"`.

use std::collections::HashMap;

/// Language tag used when detection fails or the text is empty.
pub const UNKNOWN_LANGUAGE: &str = "unknown";

/// Detect the dominant language of a text, as an ISO 639-3 code.
///
/// Returns [`UNKNOWN_LANGUAGE`] for empty input or when no sentence yields
/// a reliable detection.
pub fn detect_language(text: &str) -> String {
    let text = text.trim();
    if text.is_empty() {
        return UNKNOWN_LANGUAGE.to_string();
    }

    let mut votes: HashMap<&'static str, usize> = HashMap::new();
    for sentence in split_rough_sentences(text) {
        if let Some(info) = whatlang::detect(sentence) {
            if info.is_reliable() {
                *votes.entry(info.lang().code()).or_insert(0) += 1;
            }
        }
    }

    // Majority vote; ties broken by code for determinism.
    if let Some((code, _)) = votes
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(a.0)))
    {
        return code.to_string();
    }

    // Fall back to whole-text detection without the reliability gate.
    whatlang::detect(text)
        .map(|info| info.lang().code().to_string())
        .unwrap_or_else(|| UNKNOWN_LANGUAGE.to_string())
}

/// Rough sentence split used only for language voting.
///
/// Boundary detection for summarization lives in [`crate::rank`]; here a
/// coarse split on terminal punctuation is enough.
fn split_rough_sentences(text: &str) -> impl Iterator<Item = &str> {
    text.split_inclusive(['.', '!', '?', '。', '！', '？'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
}
