//! Persona-driven relevance ranking and extractive summarization.
//!
//! The embedding model stays behind the [`Embedder`] trait so the scoring
//! math is deterministic and testable with cheap stand-ins.

mod embed;
mod ranker;
mod summarize;

pub use embed::{cosine_similarity, embed_chunked, encode_query, Embedder};
pub use ranker::rank_sections;
pub use summarize::{split_sentences, summarize_section};
