//! Cosine similarity and top-k selection shared by every index backend

use std::cmp::Ordering;

/// Cosine similarity of two equal-length vectors, clamped to [-1, 1].
///
/// Returns 0.0 when either vector has zero norm.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (&x, &y) in a.iter().zip(b) {
        let (x, y) = (f64::from(x), f64::from(y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0) as f32
}

/// Keep the `k` best of `(item, chunk_id, similarity)` triples.
///
/// Highest similarity first; equal similarities are ordered by ascending
/// chunk ID, which is insertion order.
pub fn select_top_k<T>(mut scored: Vec<(T, i64, f32)>, k: usize) -> Vec<(T, f32)> {
    if k == 0 {
        return Vec::new();
    }

    scored.sort_by(|a, b| match b.2.total_cmp(&a.2) {
        Ordering::Equal => a.1.cmp(&b.1),
        other => other,
    });
    scored.truncate(k);
    scored.into_iter().map(|(item, _, sim)| (item, sim)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_basics() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert!((cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]) + 1.0).abs() < 1e-6);
        assert!((cosine_similarity(&[2.0, 0.0], &[5.0, 0.0]) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_zero_vector() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn test_select_orders_and_truncates() {
        let scored = vec![("a", 1, 0.2), ("b", 2, 0.9), ("c", 3, 0.5)];
        let top = select_top_k(scored, 2);
        assert_eq!(top, vec![("b", 0.9), ("c", 0.5)]);
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let scored = vec![("late", 7, 0.5), ("early", 3, 0.5), ("mid", 5, 0.5)];
        let top = select_top_k(scored, 3);
        let names: Vec<_> = top.iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["early", "mid", "late"]);
    }

    #[test]
    fn test_k_zero_and_short_input() {
        assert!(select_top_k(vec![("a", 1, 0.1)], 0).is_empty());
        assert_eq!(select_top_k(vec![("a", 1, 0.1)], 5).len(), 1);
    }
}
