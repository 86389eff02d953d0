//! Outline assembly: turning labeled blocks into a hierarchy and sections.
//!
//! A single walk over the labeled sequence maintains a stack of open
//! ancestor levels. Every outline node owns exactly one section whose body
//! is everything between its heading and the next heading of
//! equal-or-shallower level.

use crate::model::{HeadingCandidate, HeadingLevel, Label, Outline, OutlineNode, Section, TextBlock};

/// Title used for the synthetic section of a document with unowned body.
const UNTITLED: &str = "Untitled";

/// Assemble the outline and section list for one document.
///
/// `candidates` must parallel `blocks` (one label per block, as produced by
/// the classifier). A document with no detected headings yields a single
/// synthetic section covering the entire body.
pub fn assemble(
    document: &str,
    blocks: &[TextBlock],
    candidates: &[HeadingCandidate],
) -> (Outline, Vec<Section>) {
    debug_assert_eq!(blocks.len(), candidates.len());

    let mut outline = Outline::default();
    let mut sections: Vec<Section> = Vec::new();
    // Indices into `sections` of currently open ancestors, shallowest first.
    let mut stack: Vec<usize> = Vec::new();

    for (block, candidate) in blocks.iter().zip(candidates) {
        match candidate.label {
            Label::Heading(HeadingLevel::Title) => {
                outline.title = block.text.clone();
                stack.clear();
                let node = OutlineNode::new(HeadingLevel::Title, block.text.clone(), block.page);
                sections.push(Section::new(node, document));
                stack.push(sections.len() - 1);
            }
            Label::Heading(level) => {
                let depth = level.depth();

                // Close open nodes at equal-or-deeper level.
                while stack
                    .last()
                    .is_some_and(|&i| sections[i].node.level.depth() >= depth)
                {
                    stack.pop();
                }

                // Promote orphaned deep levels: a node may sit at most one
                // level below its deepest open ancestor.
                let open_depth = stack
                    .last()
                    .map(|&i| sections[i].node.level.depth())
                    .unwrap_or(0);
                let effective = HeadingLevel::from_depth(depth.min(open_depth + 1));

                let node = OutlineNode::new(effective, block.text.clone(), block.page);
                outline.nodes.push(node.clone());
                sections.push(Section::new(node, document));
                stack.push(sections.len() - 1);
            }
            Label::Body => {
                if stack.is_empty() {
                    // Unowned body before any heading: open a synthetic
                    // whole-document section.
                    let node = OutlineNode::new(HeadingLevel::Title, UNTITLED, block.page);
                    sections.push(Section::new(node, document));
                    stack.push(sections.len() - 1);
                }
                let open = *stack.last().unwrap();
                sections[open].push_body(&block.text, block.page);
            }
        }
    }

    (outline, sections)
}
