//! Similarity Scorer: cosine similarity between two embeddings.

use crate::matching::error::MatchError;

/// Cosine of the angle between `a` and `b`, accumulated in f64.
///
/// Fails on length mismatch or a zero-norm input. The result is clamped to
/// [-1, 1] so rounding never pushes self-similarity past 1.0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f64, MatchError> {
    if a.len() != b.len() {
        return Err(MatchError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }

    let (mut dot, mut norm_a, mut norm_b) = (0.0_f64, 0.0_f64, 0.0_f64);
    for (&x, &y) in a.iter().zip(b) {
        let (x, y) = (f64::from(x), f64::from(y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return Err(MatchError::DegenerateVector);
    }

    Ok((dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0))
}
