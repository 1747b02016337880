//! Cosine-similarity primitives for the flat vector store.

/// Small constant added to the denominator so a zero vector scores ~0
/// instead of dividing by zero.
const EPSILON: f32 = 1e-9;

pub fn cosine_similarity(query: &[f32], candidate: &[f32]) -> f32 {
    if query.is_empty() || candidate.is_empty() || query.len() != candidate.len() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut query_sq = 0.0f32;
    let mut candidate_sq = 0.0f32;
    for (a, b) in query.iter().zip(candidate) {
        dot += a * b;
        query_sq += a * a;
        candidate_sq += b * b;
    }

    dot / (query_sq.sqrt() * candidate_sq.sqrt() + EPSILON)
}
