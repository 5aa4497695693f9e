use rand::Rng;

use crate::error::{LabheError, Result};
use crate::ring::modular::{barrett_constant, mod_add, mod_mul, mod_sub};
use crate::sampling::{rand_uniform, uniform_mask};

/// The small-label sampling bound for plaintext modulus t:
/// max = ⌊√t⌋ and the power-of-two mask just above it.
///
/// Labels below √t keep a pairwise product inside Z_t, which is what
/// bounds the noise of the a·β cross terms during multiplication. The
/// arithmetic itself is always mod t; the bound is a size discipline,
/// not a correctness requirement.
pub fn small_label_bound(t: u64) -> (u64, u64) {
    let max = (t as f64).sqrt() as u64;
    (max, uniform_mask(max))
}

/// Sample one uniform √t-bounded label per slot.
pub fn sample_small_vector<R: Rng>(n: usize, t: u64, rng: &mut R) -> Vec<u64> {
    let (max, mask) = small_label_bound(t);
    (0..n).map(|_| rand_uniform(max, mask, rng)).collect()
}

/// Slot-wise label addition mod t.
pub fn add_labels(a: &[u64], b: &[u64], t: u64) -> Result<Vec<u64>> {
    check_len(a, b)?;
    Ok(a.iter().zip(b.iter()).map(|(&x, &y)| mod_add(x, y, t)).collect())
}

/// Slot-wise label subtraction mod t.
pub fn sub_labels(a: &[u64], b: &[u64], t: u64) -> Result<Vec<u64>> {
    check_len(a, b)?;
    Ok(a.iter().zip(b.iter()).map(|(&x, &y)| mod_sub(x, y, t)).collect())
}

/// Slot-wise label multiplication mod t.
pub fn mul_labels(a: &[u64], b: &[u64], t: u64) -> Result<Vec<u64>> {
    check_len(a, b)?;
    let bk = barrett_constant(t);
    Ok(a.iter().zip(b.iter()).map(|(&x, &y)| mod_mul(x, y, t, bk)).collect())
}

fn check_len(a: &[u64], b: &[u64]) -> Result<()> {
    if a.len() != b.len() {
        return Err(LabheError::DimensionMismatch {
            expected: a.len(),
            got: b.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn test_small_label_bound_reference_modulus() {
        let (max, mask) = small_label_bound(0x3ee0001);
        assert_eq!(max, 8119);
        assert_eq!(mask, 8191);
    }

    #[test]
    fn test_sampled_labels_stay_below_sqrt_t() {
        let t = 0x3ee0001u64;
        let (max, _) = small_label_bound(t);
        let mut rng = ChaCha20Rng::seed_from_u64(5);
        let v = sample_small_vector(4096, t, &mut rng);
        assert!(v.iter().all(|&x| x < max));
        // products of two bounded labels stay inside Z_t
        assert!((max - 1) * (max - 1) < t);
    }

    #[test]
    fn test_label_arithmetic() {
        let t = 12289u64;
        let a = vec![1u64, t - 1, 100];
        let b = vec![2u64, 2, 200];
        assert_eq!(add_labels(&a, &b, t).unwrap(), vec![3, 1, 300]);
        assert_eq!(sub_labels(&a, &b, t).unwrap(), vec![t - 1, t - 3, t - 100]);
        assert_eq!(mul_labels(&a, &b, t).unwrap(), vec![2, (t - 1) * 2 % t, 20000 % t]);
    }

    #[test]
    fn test_label_arithmetic_length_mismatch() {
        assert!(add_labels(&[1, 2], &[1], 17).is_err());
    }
}
