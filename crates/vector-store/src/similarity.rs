use crate::error::{Result, VectorStoreError};
use ndarray::ArrayView1;

/// Cosine similarity of two equal-length vectors.
///
/// Returns `0.0` when either vector has zero norm. Vectors of different
/// length are rejected with [`VectorStoreError::DimensionMismatch`], and a
/// score that is not finite with [`VectorStoreError::NonFiniteVector`].
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(VectorStoreError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }

    let a = ArrayView1::from(a);
    let b = ArrayView1::from(b);

    let norm_a = a.dot(&a).sqrt();
    let norm_b = b.dot(&b).sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    let score = a.dot(&b) / (norm_a * norm_b);
    if !score.is_finite() {
        return Err(VectorStoreError::NonFiniteVector(
            "cosine similarity".to_string(),
        ));
    }
    Ok(score)
}

/// Reject vectors holding NaN or infinity
pub(crate) fn ensure_finite(vector: &[f32], context: &str) -> Result<()> {
    if vector.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(VectorStoreError::NonFiniteVector(context.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn identical_and_opposite_vectors() {
        let a = [0.3, -1.2, 4.0, 0.5];
        let neg: Vec<f32> = a.iter().map(|v| -v).collect();

        assert!(close(cosine_similarity(&a, &a).unwrap(), 1.0));
        assert!(close(cosine_similarity(&a, &neg).unwrap(), -1.0));
    }

    #[test]
    fn orthogonal_is_zero() {
        assert!(close(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).unwrap(), 0.0));
    }

    #[test]
    fn zero_norm_saturates_to_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0, 0.0], &[1.0, 2.0, 3.0]).unwrap(), 0.0);
        assert_eq!(cosine_similarity(&[0.0], &[0.0]).unwrap(), 0.0);
    }

    #[test]
    fn overflowing_score_is_an_error() {
        let huge = [f32::MAX, f32::MAX];
        assert!(matches!(
            cosine_similarity(&huge, &huge),
            Err(VectorStoreError::NonFiniteVector(_))
        ));
    }

    #[test]
    fn finite_check() {
        assert!(ensure_finite(&[1.0, -2.5], "query").is_ok());
        assert!(ensure_finite(&[1.0, f32::NAN], "query").is_err());
        assert!(ensure_finite(&[f32::INFINITY], "query").is_err());
    }

    #[test]
    fn length_mismatch_is_rejected() {
        let err = cosine_similarity(&[1.0, 0.0, 0.0], &[1.0, 0.0]).unwrap_err();
        assert!(matches!(
            err,
            VectorStoreError::DimensionMismatch { expected: 3, actual: 2 }
        ));
    }
}
