use std::collections::HashMap;
use std::sync::Arc;

use concrete_ntt::prime64::Plan;

use crate::error::{LabheError, Result};
use crate::params::{BgvParams, GALOIS_GENERATOR};
use crate::ring::modular::mod_pow;
use crate::ring::ntt::make_plan;
use crate::ring::poly::CoeffPoly;

/// SIMD slot codec for the plaintext ring Z_t[X]/(X^N+1).
///
/// With t prime and t ≡ 1 (mod 2N) the plaintext ring splits into N
/// linear factors: decoding is evaluation at the N primitive 2N-th roots
/// of unity mod t, and encoding is the inverse map. Slots are laid out as
/// two rows of N/2 columns; slot (r, j) sits at the root of exponent
/// (-1)^r · 5^j, so the automorphism X → X^{5^k} shifts both rows left by
/// k columns and X → X^{2N-1} swaps the rows.
///
/// The table mapping slots to transform positions is built at
/// construction by transforming the monomial X: position p of the forward
/// transform then holds its own evaluation point, which pins down the
/// plan's output ordering without assuming anything about it.
#[derive(Debug)]
pub struct SlotEncoder {
    n: usize,
    t: u64,
    plan: Arc<Plan>,
    slot_to_pos: Vec<usize>,
}

impl SlotEncoder {
    pub fn new(n: usize, t: u64) -> Result<Self> {
        let plan = make_plan(n, t)?;

        // Forward-transform X: output position p holds its evaluation point.
        let mut points = vec![0u64; n];
        points[1] = 1;
        plan.fwd(&mut points);

        let mut pos_of_point: HashMap<u64, usize> = HashMap::with_capacity(n);
        for (p, &v) in points.iter().enumerate() {
            pos_of_point.insert(v, p);
        }

        // Reference root: the evaluation point of position 0. All points
        // are odd powers of it, and {±5^j} runs over all odd exponents.
        let psi = points[0];
        let two_n = 2 * n as u64;
        let h = n / 2;
        let mut slot_to_pos = vec![0usize; n];
        let mut e = 1u64;
        for j in 0..h {
            let p_row0 = pos_of_point
                .get(&mod_pow(psi, e, t))
                .ok_or_else(|| LabheError::InvalidParam(
                    "plaintext NTT does not evaluate at the primitive 2N-th roots".into()
                ))?;
            let p_row1 = pos_of_point
                .get(&mod_pow(psi, two_n - e, t))
                .ok_or_else(|| LabheError::InvalidParam(
                    "plaintext NTT does not evaluate at the primitive 2N-th roots".into()
                ))?;
            slot_to_pos[j] = *p_row0;
            slot_to_pos[h + j] = *p_row1;
            e = e * GALOIS_GENERATOR % two_n;
        }

        Ok(Self { n, t, plan, slot_to_pos })
    }

    /// Number of slots (= ring degree).
    pub fn slot_count(&self) -> usize {
        self.n
    }

    /// Encode a slot vector into a plaintext polynomial. Vectors shorter
    /// than the slot count are padded with zeros.
    pub fn encode(&self, values: &[u64]) -> Result<CoeffPoly> {
        if values.len() > self.n {
            return Err(LabheError::DimensionMismatch {
                expected: self.n,
                got: values.len(),
            });
        }
        for &v in values {
            if v >= self.t {
                return Err(LabheError::InvalidParam(
                    format!("slot value {} >= plaintext modulus {}", v, self.t)
                ));
            }
        }

        let mut evals = vec![0u64; self.n];
        for (s, &v) in values.iter().enumerate() {
            evals[self.slot_to_pos[s]] = v;
        }
        self.plan.inv(&mut evals);
        self.plan.normalize(&mut evals);
        Ok(CoeffPoly { coeffs: evals, modulus: self.t })
    }

    /// Decode a plaintext polynomial back to its slot vector.
    pub fn decode(&self, poly: &CoeffPoly) -> Result<Vec<u64>> {
        if poly.modulus != self.t {
            return Err(LabheError::ModulusMismatch);
        }
        if poly.len() != self.n {
            return Err(LabheError::DimensionMismatch {
                expected: self.n,
                got: poly.len(),
            });
        }
        let mut evals = poly.coeffs.clone();
        self.plan.fwd(&mut evals);
        Ok(self.slot_to_pos.iter().map(|&p| evals[p]).collect())
    }
}

/// Encode a slot vector with the encoder attached to `params`.
pub fn encode_slots(values: &[u64], params: &BgvParams) -> Result<CoeffPoly> {
    params.encoder().encode(values)
}

/// Decode a plaintext polynomial with the encoder attached to `params`.
pub fn decode_slots(poly: &CoeffPoly, params: &BgvParams) -> Result<Vec<u64>> {
    params.encoder().decode(poly)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bgv::keygen::apply_automorphism;

    // n=16, t=65537: 65537 ≡ 1 (mod 32), all 16 slots live.
    fn small_encoder() -> SlotEncoder {
        SlotEncoder::new(16, 65537).unwrap()
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let enc = small_encoder();
        let values: Vec<u64> = (0..16).map(|i| i * 11 + 1).collect();
        let pt = enc.encode(&values).unwrap();
        assert_eq!(enc.decode(&pt).unwrap(), values);
    }

    #[test]
    fn test_encode_pads_short_vectors() {
        let enc = small_encoder();
        let pt = enc.encode(&[1, 2, 3]).unwrap();
        let decoded = enc.decode(&pt).unwrap();
        assert_eq!(&decoded[..3], &[1, 2, 3]);
        assert!(decoded[3..].iter().all(|&v| v == 0));
    }

    #[test]
    fn test_encode_rejects_out_of_range() {
        let enc = small_encoder();
        assert!(enc.encode(&[65537]).is_err());
        assert!(enc.encode(&vec![0u64; 17]).is_err());
    }

    #[test]
    fn test_ring_mul_is_slotwise() {
        let enc = small_encoder();
        let t = 65537u64;
        let a: Vec<u64> = (0..16).map(|i| i * i + 3).collect();
        let b: Vec<u64> = (0..16).map(|i| 2 * i + 7).collect();

        let pa = enc.encode(&a).unwrap();
        let pb = enc.encode(&b).unwrap();
        let prod = pa.mul_naive(&pb).unwrap();

        let expected: Vec<u64> = a.iter().zip(b.iter()).map(|(&x, &y)| x * y % t).collect();
        assert_eq!(enc.decode(&prod).unwrap(), expected);
    }

    #[test]
    fn test_col_rotation_automorphism_shifts_rows() {
        let enc = small_encoder();
        let n = 16usize;
        let h = n / 2;
        let two_n = 2 * n as u64;
        let values: Vec<u64> = (0..n as u64).map(|i| i + 100).collect();
        let pt = enc.encode(&values).unwrap();

        for k in 1..h {
            let element = mod_pow(GALOIS_GENERATOR, k as u64, two_n);
            let rotated = apply_automorphism(&pt, element);
            let decoded = enc.decode(&rotated).unwrap();
            for i in 0..n {
                let expected = if i < h {
                    values[(i + k) % h]
                } else {
                    values[h + (i - h + k) % h]
                };
                assert_eq!(decoded[i], expected, "k={k}, slot {i}");
            }
        }
    }

    #[test]
    fn test_row_rotation_automorphism_swaps_rows() {
        let enc = small_encoder();
        let n = 16usize;
        let h = n / 2;
        let values: Vec<u64> = (0..n as u64).map(|i| i + 1).collect();
        let pt = enc.encode(&values).unwrap();

        let rotated = apply_automorphism(&pt, 2 * n as u64 - 1);
        let decoded = enc.decode(&rotated).unwrap();
        for j in 0..h {
            assert_eq!(decoded[j], values[h + j]);
            assert_eq!(decoded[h + j], values[j]);
        }
    }
}
