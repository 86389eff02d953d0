//! End-to-end pipeline tests with mock block sources and a mock embedder.

use docrank::{
    process, run, BlockSource, BoundingBox, Embedder, Error, JsonFormat, Result, RunConfig,
    TextBlock,
};

/// Counts hits against a small travel vocabulary, with a baseline component
/// so no text embeds to the zero vector. Deterministic.
struct TravelEmbedder;

impl Embedder for TravelEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let vocabulary = ["coast", "beach", "museum", "tax", "law"];
        let lower = text.to_lowercase();
        let mut vector = vec![1.0];
        vector.extend(
            vocabulary
                .iter()
                .map(|term| lower.matches(term).count() as f32),
        );
        Ok(vector)
    }

    fn max_input_len(&self) -> usize {
        4096
    }
}

struct VecSource {
    name: String,
    pages: u32,
    blocks: Vec<TextBlock>,
    corrupt: bool,
}

impl VecSource {
    fn new(name: &str, pages: u32, blocks: Vec<TextBlock>) -> Self {
        Self {
            name: name.to_string(),
            pages,
            blocks,
            corrupt: false,
        }
    }

    fn corrupt(name: &str) -> Self {
        Self {
            name: name.to_string(),
            pages: 0,
            blocks: Vec::new(),
            corrupt: true,
        }
    }
}

impl BlockSource for VecSource {
    fn document(&self) -> &str {
        &self.name
    }

    fn page_count(&self) -> u32 {
        self.pages
    }

    fn blocks(&self) -> Result<Vec<TextBlock>> {
        if self.corrupt {
            return Err(Error::extraction(&self.name, "damaged cross-reference table"));
        }
        Ok(self.blocks.clone())
    }
}

fn block(page: u32, y0: f32, text: &str, size: f32, bold: bool) -> TextBlock {
    TextBlock::new(page, BoundingBox::new(50.0, y0, 420.0, y0 + size), text, size).with_bold(bold)
}

/// A guide with one clearly relevant section, one mildly relevant, one not.
fn travel_guide(name: &str) -> VecSource {
    VecSource::new(
        name,
        2,
        vec![
            block(1, 50.0, "Riviera Guide", 24.0, true),
            block(1, 130.0, "Coastal Beaches", 16.0, true),
            block(
                1,
                160.0,
                "The coast offers sandy beach stretches and calm coves. \
                 Every beach lies within walking distance of the old town. \
                 Sunset on the coast draws crowds all summer.",
                11.0,
                false,
            ),
            block(2, 60.0, "Local Museums", 16.0, true),
            block(
                2,
                90.0,
                "The maritime museum documents three centuries of seafaring. \
                 A smaller museum covers regional painting.",
                11.0,
                false,
            ),
            block(2, 200.0, "Tax Regulations", 16.0, true),
            block(
                2,
                230.0,
                "Visitors owe a nightly city tax under local law. \
                 The tax is collected at checkout.",
                11.0,
                false,
            ),
        ],
    )
}

fn config() -> RunConfig {
    RunConfig::new("A travel blogger", "find coastal beach attractions")
        .with_top_sections(3)
        .with_summary_sentences(3)
}

#[test]
fn test_single_document_run() {
    let doc = travel_guide("riviera.pdf");
    let sources: Vec<&dyn BlockSource> = vec![&doc];

    let result = run(&TravelEmbedder, &sources, &config()).unwrap();

    assert_eq!(result.sections.len(), 3);
    assert_eq!(
        result.sections.iter().map(|s| s.scored.rank).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );
    for window in result.sections.windows(2) {
        assert!(window[0].scored.score >= window[1].scored.score);
    }
    assert_eq!(result.sections[0].scored.section.node.text, "Coastal Beaches");

    let outline = &result.analyses[0].outline;
    assert_eq!(outline.title, "Riviera Guide");
    assert_eq!(outline.nodes.len(), 3);
}

#[test]
fn test_corrupt_document_is_isolated() {
    let good_a = travel_guide("a.pdf");
    let bad = VecSource::corrupt("damaged.pdf");
    let good_b = travel_guide("b.pdf");
    let sources: Vec<&dyn BlockSource> = vec![&good_a, &bad, &good_b];

    let output = process(&TravelEmbedder, &sources, &config()).unwrap();

    assert_eq!(output.skipped_documents.len(), 1);
    assert_eq!(output.skipped_documents[0].document, "damaged.pdf");
    assert!(output
        .skipped_documents[0]
        .reason
        .contains("damaged cross-reference table"));

    // Ranking proceeded over the healthy documents.
    assert_eq!(output.extracted_sections.len(), 3);
    assert!(output
        .extracted_sections
        .iter()
        .all(|s| s.document != "damaged.pdf"));
    assert_eq!(
        output.metadata.input_documents,
        vec!["a.pdf", "damaged.pdf", "b.pdf"]
    );
}

#[test]
fn test_headingless_document_still_ranks() {
    let prose = VecSource::new(
        "plain.pdf",
        1,
        vec![
            block(
                1,
                60.0,
                "The beach along this coast stays warm well into autumn, \
                 and the beach bars keep serving past midnight.",
                11.0,
                false,
            ),
            block(
                1,
                120.0,
                "Boats leave the coast marina every morning for the islands.",
                11.0,
                false,
            ),
        ],
    );
    let sources: Vec<&dyn BlockSource> = vec![&prose];

    let result = run(&TravelEmbedder, &sources, &config()).unwrap();

    assert!(result.analyses[0].outline.is_empty());
    assert_eq!(result.sections.len(), 1);
    assert_eq!(result.sections[0].scored.section.node.text, "Untitled");
    assert!(!result.sections[0].summary.is_empty());
}

#[test]
fn test_per_document_cap_spreads_selection() {
    let a = travel_guide("a.pdf");
    let b = travel_guide("b.pdf");
    let sources: Vec<&dyn BlockSource> = vec![&a, &b];
    let config = config().with_top_sections(2).with_per_document_cap(1);

    let result = run(&TravelEmbedder, &sources, &config).unwrap();

    assert_eq!(result.sections.len(), 2);
    let mut documents: Vec<&str> = result
        .sections
        .iter()
        .map(|s| s.scored.section.document.as_str())
        .collect();
    documents.sort();
    documents.dedup();
    assert_eq!(documents, vec!["a.pdf", "b.pdf"]);
}

#[test]
fn test_summaries_are_verbatim_and_ordered() {
    let doc = travel_guide("riviera.pdf");
    let sources: Vec<&dyn BlockSource> = vec![&doc];

    let result = run(&TravelEmbedder, &sources, &config()).unwrap();

    for ranked in &result.sections {
        let body = &ranked.scored.section.body;
        let mut cursor = 0usize;
        for sentence in &ranked.summary.sentences {
            // Verbatim, and in original order.
            let position = body[cursor..]
                .find(sentence.as_str())
                .unwrap_or_else(|| panic!("sentence not found in order: {sentence}"));
            cursor += position + sentence.len();
        }
        assert!(ranked.summary.sentences.len() <= 3);
    }
}

#[test]
fn test_runs_are_deterministic() {
    let doc = travel_guide("riviera.pdf");
    let sources: Vec<&dyn BlockSource> = vec![&doc];

    let first = process(&TravelEmbedder, &sources, &config()).unwrap();
    let second = process(&TravelEmbedder, &sources, &config()).unwrap();

    // Everything except the timestamp must match exactly.
    let strip = |output: &docrank::RunOutput| {
        let mut value = serde_json::to_value(output).unwrap();
        value["metadata"]
            .as_object_mut()
            .unwrap()
            .remove("processing_timestamp");
        value
    };
    assert_eq!(strip(&first), strip(&second));
}

#[test]
fn test_json_output_shape() {
    let doc = travel_guide("riviera.pdf");
    let sources: Vec<&dyn BlockSource> = vec![&doc];

    let json =
        docrank::process_to_json(&TravelEmbedder, &sources, &config(), JsonFormat::Compact)
            .unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["metadata"]["persona"], "A travel blogger");
    assert_eq!(
        value["extracted_sections"][0]["section_title"],
        "Coastal Beaches"
    );
    assert_eq!(value["extracted_sections"][0]["importance_rank"], 1);
    assert!(value["subsection_analysis"][0]["refined_text"]
        .as_str()
        .unwrap()
        .contains("beach"));
}
