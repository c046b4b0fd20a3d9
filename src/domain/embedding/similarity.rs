//! Vector similarity

/// Calculate cosine similarity between two vectors
///
/// Returns `None` when the vectors differ in length, are empty, or either has
/// zero magnitude. Mismatched dimensions are rejected rather than truncated.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Option<f64> {
    if a.len() != b.len() || a.is_empty() {
        return None;
    }

    let (dot_product, norm_a, norm_b) = a.iter().zip(b.iter()).fold(
        (0.0_f64, 0.0_f64, 0.0_f64),
        |(dot, na, nb), (&x, &y)| {
            let (x, y) = (f64::from(x), f64::from(y));
            (dot + x * y, na + x * x, nb + y * y)
        },
    );

    if norm_a == 0.0 || norm_b == 0.0 {
        return None;
    }

    Some((dot_product / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0))
}
