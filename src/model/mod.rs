//! Data model for document analysis and ranking.
//!
//! This module defines the intermediate representation that flows through
//! the pipeline: styled text blocks in, outline nodes and scored sections
//! out. Each stage owns and fully consumes the previous stage's output.

mod block;
mod outline;
mod query;
mod section;

pub use block::{BoundingBox, TextBlock};
pub use outline::{HeadingCandidate, HeadingLevel, Label, Outline, OutlineNode};
pub use query::Query;
pub use section::{ScoredSection, Section, Summary};
