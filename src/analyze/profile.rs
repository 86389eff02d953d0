//! Font/style profiling: clustering observed font sizes into rank levels.
//!
//! Absolute font sizes vary wildly across documents, so heading detection
//! works on per-document ordinal ranks (0 = largest) instead of fixed
//! thresholds. The profile is built once per document and read-only after.

use std::collections::HashMap;

use crate::model::TextBlock;

/// Per-document mapping from observed font size to rank level.
#[derive(Debug, Clone)]
pub struct StyleProfile {
    /// Representative size per rank, sorted descending (rank 0 = largest)
    ranks: Vec<f32>,
    /// Rank of the modal (body text) size
    body_rank: usize,
}

impl StyleProfile {
    /// Build a profile from a document's normalized blocks.
    ///
    /// At least one rank exists even for an empty document, so rank
    /// assignment stays total.
    pub fn build(blocks: &[TextBlock]) -> Self {
        // Histogram at 0.1pt precision.
        let mut histogram: HashMap<i32, usize> = HashMap::new();
        for block in blocks {
            *histogram.entry(quantize(block.font_size)).or_insert(0) += 1;
        }

        if histogram.is_empty() {
            return Self {
                ranks: vec![12.0],
                body_rank: 0,
            };
        }

        let mut sizes: Vec<f32> = histogram.keys().map(|k| *k as f32 / 10.0).collect();
        sizes.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));

        // Gap-based split: a new rank starts where consecutive sizes are
        // further apart than 8% of the larger size (at least 0.7pt).
        let mut clusters: Vec<Vec<f32>> = vec![vec![sizes[0]]];
        for window in sizes.windows(2) {
            let (prev, curr) = (window[0], window[1]);
            let split_at = (prev * 0.08).max(0.7);
            if prev - curr > split_at {
                clusters.push(vec![curr]);
            } else {
                clusters.last_mut().unwrap().push(curr);
            }
        }

        let ranks: Vec<f32> = clusters
            .iter()
            .map(|c| c.iter().sum::<f32>() / c.len() as f32)
            .collect();

        // Body rank is the cluster holding the most frequent size.
        let (modal_key, _) = histogram
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
            .unwrap();
        let modal_size = *modal_key as f32 / 10.0;
        let body_rank = clusters
            .iter()
            .position(|c| c.iter().any(|s| (s - modal_size).abs() < 0.05))
            .unwrap_or(ranks.len() - 1);

        Self { ranks, body_rank }
    }

    /// Rank level for a font size (nearest representative).
    pub fn rank_of(&self, font_size: f32) -> usize {
        let mut best = 0;
        let mut best_dist = f32::MAX;
        for (i, &rep) in self.ranks.iter().enumerate() {
            let dist = (rep - font_size).abs();
            if dist < best_dist {
                best = i;
                best_dist = dist;
            }
        }
        best
    }

    /// Number of rank levels.
    pub fn rank_count(&self) -> usize {
        self.ranks.len()
    }

    /// Rank of the body text size.
    pub fn body_rank(&self) -> usize {
        self.body_rank
    }

    /// Representative font size of a rank, if it exists.
    pub fn size_of_rank(&self, rank: usize) -> Option<f32> {
        self.ranks.get(rank).copied()
    }

    /// Whether a rank is strictly larger-typed than body text.
    pub fn is_above_body(&self, rank: usize) -> bool {
        rank < self.body_rank
    }
}

fn quantize(size: f32) -> i32 {
    (size * 10.0).round() as i32
}
