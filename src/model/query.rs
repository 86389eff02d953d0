//! Run query built from persona and job-to-be-done.

/// The query a run scores sections against.
///
/// Built once per run by the query encoder (see [`crate::rank::encode_query`]).
#[derive(Debug, Clone)]
pub struct Query {
    /// Persona description
    pub persona: String,
    /// Job-to-be-done statement
    pub job: String,
    /// Combined query text passed to the embedding collaborator
    pub text: String,
    /// Cached embedding of the combined text
    pub embedding: Vec<f32>,
}
