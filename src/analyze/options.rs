//! Tunable thresholds for per-document structural analysis.

/// Options controlling normalization and heading classification.
#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    /// Minimum weighted score for a block to be labeled a heading
    pub heading_threshold: f32,

    /// Blocks with more words than this are never heading candidates
    pub max_heading_words: usize,

    /// Word count below which the short-length signal applies
    pub short_heading_words: usize,

    /// Fraction of pages a near-identical block must repeat on (at the same
    /// vertical band) to be dropped as a header/footer
    pub header_footer_ratio: f32,

    /// Vertical tolerance in points when matching header/footer bands
    pub header_footer_band: f32,

    /// A block continues the previous one when the vertical gap between them
    /// is below this factor times the larger font size
    pub continuation_gap_factor: f32,

    /// Whether to tag each block's dominant language
    pub detect_language: bool,
}

impl AnalyzeOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the heading score threshold.
    pub fn with_heading_threshold(mut self, threshold: f32) -> Self {
        self.heading_threshold = threshold;
        self
    }

    /// Set the maximum word count for heading candidates.
    pub fn with_max_heading_words(mut self, words: usize) -> Self {
        self.max_heading_words = words;
        self
    }

    /// Set the header/footer repetition ratio.
    pub fn with_header_footer_ratio(mut self, ratio: f32) -> Self {
        self.header_footer_ratio = ratio;
        self
    }

    /// Set the continuation gap factor.
    pub fn with_continuation_gap_factor(mut self, factor: f32) -> Self {
        self.continuation_gap_factor = factor;
        self
    }

    /// Disable language detection.
    pub fn without_language_detection(mut self) -> Self {
        self.detect_language = false;
        self
    }
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            heading_threshold: 3.5,
            max_heading_words: 20,
            short_heading_words: 12,
            header_footer_ratio: 0.6,
            header_footer_band: 3.0,
            continuation_gap_factor: 0.6,
            detect_language: true,
        }
    }
}
