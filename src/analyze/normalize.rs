//! Block normalization: continuation merging, header/footer removal,
//! language tagging.
//!
//! Normalization is idempotent: running it over an already-normalized
//! sequence performs no further merges or drops. No errors propagate out of
//! this stage; malformed blocks are dropped silently.

use std::collections::HashMap;

use unicode_normalization::UnicodeNormalization;

use crate::detect::detect_language;
use crate::model::TextBlock;

use super::options::AnalyzeOptions;

/// Normalize a document's raw ordered block sequence.
///
/// Joins visually broken lines, drops repeated headers/footers, and tags
/// each surviving block's dominant language.
pub fn normalize(blocks: Vec<TextBlock>, page_count: u32, options: &AnalyzeOptions) -> Vec<TextBlock> {
    let cleaned = clean_blocks(blocks);
    let merged = merge_continuations(cleaned, options);
    let mut kept = drop_repeated_furniture(merged, page_count, options);

    if options.detect_language {
        for block in &mut kept {
            if block.language == crate::detect::UNKNOWN_LANGUAGE {
                block.language = detect_language(&block.text);
            }
        }
    }

    kept
}

/// NFC-normalize text, collapse whitespace, and drop empty blocks.
fn clean_blocks(blocks: Vec<TextBlock>) -> Vec<TextBlock> {
    blocks
        .into_iter()
        .filter_map(|mut block| {
            let text: String = block.text.nfc().collect();
            let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
            if text.is_empty() {
                return None;
            }
            block.text = text;
            Some(block)
        })
        .collect()
}

/// Join blocks that continue a visually broken line.
///
/// A block continues the previous one when both are on the same page, the
/// previous text lacks sentence-ending punctuation, and the vertical gap is
/// below `continuation_gap_factor` times the incoming block's font size.
/// The merged block keeps the larger font's metadata; its bottom edge is the
/// last fragment's, so a second pass finds the same chain boundaries.
fn merge_continuations(blocks: Vec<TextBlock>, options: &AnalyzeOptions) -> Vec<TextBlock> {
    let mut merged: Vec<TextBlock> = Vec::with_capacity(blocks.len());

    for block in blocks {
        let continues = merged.last().is_some_and(|prev| {
            let gap = prev.bbox.gap_to(&block.bbox);
            prev.page == block.page
                && !prev.ends_sentence()
                && gap > -2.0
                && gap < options.continuation_gap_factor * block.font_size
        });

        if continues {
            let prev = merged.last_mut().unwrap();
            join_text(&mut prev.text, &block.text);
            prev.bbox = prev.bbox.union(&block.bbox);
            if block.font_size > prev.font_size {
                prev.font_size = block.font_size;
                prev.bold = block.bold;
                prev.italic = block.italic;
            }
        } else {
            merged.push(block);
        }
    }

    merged
}

/// Append a continuation fragment, undoing end-of-line hyphenation.
fn join_text(text: &mut String, fragment: &str) {
    if let Some(stripped) = text.strip_suffix('-') {
        // Hyphenated line break: rejoin the split word.
        if fragment.chars().next().is_some_and(|c| c.is_lowercase()) {
            text.truncate(stripped.len());
            text.push_str(fragment);
            return;
        }
    }
    text.push(' ');
    text.push_str(fragment);
}

/// Drop blocks that repeat near-identically on enough pages at the same
/// vertical band (running headers, footers, page decorations).
fn drop_repeated_furniture(
    blocks: Vec<TextBlock>,
    page_count: u32,
    options: &AnalyzeOptions,
) -> Vec<TextBlock> {
    if page_count < 2 {
        return blocks;
    }

    // Key blocks by folded text and quantized vertical band, then count the
    // distinct pages each key appears on.
    let mut pages_per_key: HashMap<(String, i32), Vec<u32>> = HashMap::new();
    for block in &blocks {
        let key = furniture_key(block, options.header_footer_band);
        let pages = pages_per_key.entry(key).or_default();
        if !pages.contains(&block.page) {
            pages.push(block.page);
        }
    }

    let min_pages = ((page_count as f32 * options.header_footer_ratio).ceil() as usize).max(2);

    blocks
        .into_iter()
        .filter(|block| {
            let key = furniture_key(block, options.header_footer_band);
            let repeats = pages_per_key.get(&key).map_or(0, Vec::len);
            if repeats >= min_pages {
                log::debug!(
                    "dropping repeated furniture on page {}: {:?}",
                    block.page,
                    block.text
                );
                false
            } else {
                true
            }
        })
        .collect()
}

/// Grouping key for header/footer detection.
///
/// Digits are masked so "Page 3" and "Page 17" land in the same group.
fn furniture_key(block: &TextBlock, band: f32) -> (String, i32) {
    let folded: String = block
        .text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_digit() { '#' } else { c })
        .collect();
    let band_index = (block.bbox.y0 / band.max(0.1)) as i32;
    (folded, band_index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BoundingBox;

    fn block(page: u32, y0: f32, text: &str, size: f32) -> TextBlock {
        TextBlock::new(page, BoundingBox::new(50.0, y0, 400.0, y0 + size), text, size)
    }

    #[test]
    fn test_empty_blocks_dropped() {
        let blocks = vec![block(1, 100.0, "   ", 12.0), block(1, 120.0, "Kept.", 12.0)];
        let out = normalize(blocks, 1, &AnalyzeOptions::default());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].text, "Kept.");
    }

    #[test]
    fn test_continuation_merge() {
        let blocks = vec![
            block(1, 100.0, "Understanding the role of", 12.0),
            block(1, 114.0, "chlorophyll in photosynthesis.", 12.0),
            block(1, 140.0, "A separate paragraph follows here.", 12.0),
        ];
        let out = normalize(blocks, 1, &AnalyzeOptions::default());
        assert_eq!(out.len(), 2);
        assert_eq!(
            out[0].text,
            "Understanding the role of chlorophyll in photosynthesis."
        );
    }

    #[test]
    fn test_merge_keeps_larger_font() {
        let mut first = block(1, 100.0, "Broken", 14.0);
        first.bold = true;
        let blocks = vec![first, block(1, 116.0, "headline text", 18.0)];
        let out = normalize(blocks, 1, &AnalyzeOptions::default());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].font_size, 18.0);
        assert!(!out[0].bold);
    }

    #[test]
    fn test_no_merge_across_pages() {
        let blocks = vec![
            block(1, 700.0, "Ends without punctuation", 12.0),
            block(2, 60.0, "next page starts here.", 12.0),
        ];
        let out = normalize(blocks, 2, &AnalyzeOptions::default());
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_hyphenation_rejoined() {
        let blocks = vec![
            block(1, 100.0, "The experi-", 12.0),
            block(1, 114.0, "ment succeeded.", 12.0),
        ];
        let out = normalize(blocks, 1, &AnalyzeOptions::default());
        assert_eq!(out[0].text, "The experiment succeeded.");
    }

    #[test]
    fn test_header_footer_dropped() {
        let topics = ["soil", "light", "water", "carbon", "growth"];
        let mut blocks = Vec::new();
        for page in 1..=5u32 {
            blocks.push(block(page, 20.0, "Annual Report 2024", 9.0));
            blocks.push(block(
                page,
                200.0,
                &format!("A paragraph about {}.", topics[(page - 1) as usize]),
                12.0,
            ));
            blocks.push(block(page, 780.0, &format!("Page {page}"), 9.0));
        }
        let out = normalize(blocks, 5, &AnalyzeOptions::default());
        assert_eq!(out.len(), 5);
        assert!(out.iter().all(|b| b.text.starts_with("A paragraph about")));
    }

    #[test]
    fn test_normalization_idempotent() {
        let topics = ["roots", "stems", "leaves", "flowers"];
        let mut blocks = Vec::new();
        blocks.push(block(1, 80.0, "A title that wraps", 18.0));
        blocks.push(block(1, 100.0, "across two lines", 18.0));
        for page in 1..=4u32 {
            blocks.push(block(page, 20.0, "Running header", 9.0));
            blocks.push(block(
                page,
                300.0,
                &format!("Body text about {}.", topics[(page - 1) as usize]),
                12.0,
            ));
        }

        let options = AnalyzeOptions::default();
        let once = normalize(blocks, 4, &options);
        let twice = normalize(once.clone(), 4, &options);

        assert_eq!(once.len(), twice.len());
        for (a, b) in once.iter().zip(&twice) {
            assert_eq!(a.text, b.text);
            assert_eq!(a.page, b.page);
            assert_eq!(a.language, b.language);
        }
    }

    #[test]
    fn test_language_tagged() {
        let blocks = vec![block(
            1,
            100.0,
            "Photosynthesis converts light energy into chemical energy stored in glucose.",
            12.0,
        )];
        let out = normalize(blocks, 1, &AnalyzeOptions::default());
        assert_eq!(out[0].language, "eng");
    }
}
