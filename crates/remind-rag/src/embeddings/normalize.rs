//! L2 vector normalization

/// Euclidean norm, accumulated in f64
pub fn l2_norm(vector: &[f32]) -> f32 {
    vector
        .iter()
        .map(|&x| f64::from(x) * f64::from(x))
        .sum::<f64>()
        .sqrt() as f32
}

/// Scale a vector to unit length. The zero vector is left unchanged.
pub fn l2_normalize(vector: &[f32]) -> Vec<f32> {
    let mut out = vector.to_vec();
    l2_normalize_in_place(&mut out);
    out
}

/// In-place variant of [`l2_normalize`]
pub fn l2_normalize_in_place(vector: &mut [f32]) {
    let norm = vector
        .iter()
        .map(|&x| f64::from(x) * f64::from(x))
        .sum::<f64>()
        .sqrt();
    if norm == 0.0 {
        return;
    }
    for x in vector.iter_mut() {
        *x = (f64::from(*x) / norm) as f32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_normalize_3_4() {
        assert_eq!(l2_normalize(&[3.0, 4.0]), vec![0.6, 0.8]);
    }

    #[test]
    fn test_zero_vector_unchanged() {
        assert_eq!(l2_normalize(&[0.0, 0.0, 0.0]), vec![0.0, 0.0, 0.0]);
        assert!(l2_normalize(&[]).is_empty());
    }

    #[test]
    fn test_negative_components() {
        let v = l2_normalize(&[-2.0, 0.0]);
        assert_eq!(v, vec![-1.0, 0.0]);
    }

    proptest! {
        #[test]
        fn prop_unit_norm(v in prop::collection::vec(-100.0f32..100.0, 1..768)) {
            prop_assume!(v.iter().any(|&x| x != 0.0));
            let n = l2_normalize(&v);
            prop_assert!((l2_norm(&n) - 1.0).abs() < 1e-5);
        }

        #[test]
        fn prop_preserves_direction(v in prop::collection::vec(-100.0f32..100.0, 2..64)) {
            prop_assume!(v[0].abs() > 1e-3);
            let n = l2_normalize(&v);
            for i in 1..v.len() {
                let ratio = v[i] / v[0];
                let normalized_ratio = n[i] / n[0];
                prop_assert!(
                    (ratio - normalized_ratio).abs() <= ratio.abs() * 1e-4 + 1e-6,
                    "component {}: {} vs {}",
                    i,
                    ratio,
                    normalized_ratio
                );
            }
        }
    }
}
