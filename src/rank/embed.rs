//! The embedding seam: collaborator trait, chunking, and cosine similarity.

use crate::error::{Error, Result};
use crate::model::Query;

/// The embedding collaborator.
///
/// A deterministic, stateless, side-effect-free function from text to a
/// fixed-length vector. Implementations must be safely callable from
/// multiple workers at once (`Sync`), or wrap their model behind a lock.
pub trait Embedder: Send + Sync {
    /// Embed a text into a fixed-length vector.
    fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Maximum input length in characters the model accepts.
    fn max_input_len(&self) -> usize;
}

/// Embed a text of arbitrary length, mean-pooling chunk vectors when the
/// text exceeds the collaborator's maximum input length.
pub fn embed_chunked(embedder: &dyn Embedder, text: &str) -> Result<Vec<f32>> {
    let max_len = embedder.max_input_len().max(1);
    if text.len() <= max_len {
        return check_vector(embedder.embed(text)?);
    }

    let chunks = split_chunks(text, max_len);
    let mut pooled: Vec<f32> = Vec::new();
    let mut count = 0usize;
    for chunk in &chunks {
        let vector = check_vector(embedder.embed(chunk)?)?;
        if pooled.is_empty() {
            pooled = vector;
        } else {
            if vector.len() != pooled.len() {
                return Err(Error::Embedding(format!(
                    "inconsistent vector length: {} vs {}",
                    vector.len(),
                    pooled.len()
                )));
            }
            for (p, v) in pooled.iter_mut().zip(&vector) {
                *p += v;
            }
        }
        count += 1;
    }
    for p in &mut pooled {
        *p /= count as f32;
    }
    Ok(pooled)
}

/// Split text into chunks of at most `max_len` bytes at whitespace
/// boundaries (falling back to a char boundary for unbroken runs).
///
/// A chunk may exceed `max_len` only when `max_len` is smaller than a
/// single character, which still guarantees forward progress.
fn split_chunks(text: &str, max_len: usize) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut rest = text;
    while rest.len() > max_len {
        // Walk down to a char boundary before slicing anything.
        let mut cut = max_len;
        while cut > 0 && !rest.is_char_boundary(cut) {
            cut -= 1;
        }
        if cut == 0 {
            cut = rest.chars().next().map_or(rest.len(), char::len_utf8);
        }
        // Prefer the last whitespace before the limit.
        if let Some(ws) = rest[..cut].rfind(char::is_whitespace) {
            if ws > 0 {
                cut = ws;
            }
        }
        let (head, tail) = rest.split_at(cut);
        let head = head.trim();
        if !head.is_empty() {
            chunks.push(head);
        }
        rest = tail.trim_start();
    }
    let rest = rest.trim();
    if !rest.is_empty() {
        chunks.push(rest);
    }
    chunks
}

fn check_vector(vector: Vec<f32>) -> Result<Vec<f32>> {
    if vector.is_empty() || vector.iter().any(|v| !v.is_finite()) {
        return Err(Error::Embedding(
            "collaborator returned a malformed vector".to_string(),
        ));
    }
    Ok(vector)
}

/// Cosine similarity between two vectors, clamped to [-1, 1].
///
/// Zero vectors and mismatched lengths yield 0.0 rather than NaN.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0)
}

/// Build the run query from persona and job-to-be-done text.
///
/// The two parts are combined with a fixed template and embedded once;
/// the vector is cached on the returned [`Query`] for the whole run.
pub fn encode_query(embedder: &dyn Embedder, persona: &str, job: &str) -> Result<Query> {
    let persona = persona.trim();
    let job = job.trim();
    if persona.is_empty() && job.is_empty() {
        return Err(Error::Configuration(
            "persona and job-to-be-done are both empty".to_string(),
        ));
    }

    let text = format!("{persona}. Task: {job}.");
    let embedding = embed_chunked(embedder, &text)?;
    Ok(Query {
        persona: persona.to_string(),
        job: job.to_string(),
        text,
        embedding,
    })
}
