use std::sync::Arc;
use concrete_ntt::prime64::Plan;

use crate::error::{LabheError, Result};
use crate::ring::modular::barrett_constant;
use crate::ring::ntt::{NttPoly, make_plan};
use crate::ring::poly::CoeffPoly;

/// Polynomial in RNS (Residue Number System) representation.
///
/// Stores one NttPoly per RNS prime. The actual polynomial lives in
/// Z_Q[X]/(X^n+1) where Q = ∏ q_i.
#[derive(Clone, Debug)]
pub struct RnsPoly {
    pub components: Vec<NttPoly>,
    pub ring_degree: usize,
}

/// Precomputed data for an RNS basis.
#[derive(Clone, Debug)]
pub struct RnsBasis {
    pub moduli: Vec<u64>,
    pub plans: Vec<Arc<Plan>>,
    pub ring_degree: usize,
    /// Barrett constants for each modulus.
    pub barrett_ks: Vec<u64>,
}

impl RnsBasis {
    /// Create a new RNS basis from a list of NTT-friendly primes.
    pub fn new(moduli: Vec<u64>, ring_degree: usize) -> Result<Self> {
        if moduli.is_empty() {
            return Err(LabheError::InvalidParam("RNS basis needs at least one prime".into()));
        }
        let plans: Vec<Arc<Plan>> = moduli.iter()
            .map(|&q| make_plan(ring_degree, q))
            .collect::<Result<Vec<_>>>()?;

        let barrett_ks: Vec<u64> = moduli.iter()
            .map(|&q| barrett_constant(q))
            .collect();

        Ok(Self {
            moduli,
            plans,
            ring_degree,
            barrett_ks,
        })
    }

    pub fn num_moduli(&self) -> usize {
        self.moduli.len()
    }
}

impl RnsPoly {
    /// Create a zero polynomial in RNS.
    pub fn zero(basis: &RnsBasis) -> Self {
        let components = basis.moduli.iter()
            .zip(basis.plans.iter())
            .map(|(&q, plan)| NttPoly::zero(basis.ring_degree, q, plan.clone()))
            .collect();
        Self {
            components,
            ring_degree: basis.ring_degree,
        }
    }

    /// Create an RnsPoly from a single CoeffPoly by reducing mod each RNS
    /// prime and NTT-ing. The source modulus need not be one of the basis
    /// primes; coefficients are taken as their non-negative representatives.
    pub fn from_coeff_poly(poly: &CoeffPoly, basis: &RnsBasis) -> Result<Self> {
        if poly.len() != basis.ring_degree {
            return Err(LabheError::DimensionMismatch {
                expected: basis.ring_degree,
                got: poly.len(),
            });
        }
        let components: Vec<NttPoly> = basis.moduli.iter()
            .zip(basis.plans.iter())
            .map(|(&q, plan)| {
                let reduced = CoeffPoly::from_coeffs(
                    poly.coeffs.iter().map(|&c| c % q).collect(),
                    q,
                );
                NttPoly::from_coeff_poly(&reduced, plan.clone())
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            components,
            ring_degree: basis.ring_degree,
        })
    }

    /// Create an RnsPoly from signed coefficients (secrets, errors).
    ///
    /// Each coefficient is reduced into [0, q_i) per prime, so negative
    /// values land on q_i - |c| in every component. This is the correct
    /// lift for small centered polynomials; reducing a single-modulus
    /// representative with `from_coeff_poly` would not be.
    pub fn from_signed_coeffs(coeffs: &[i64], basis: &RnsBasis) -> Result<Self> {
        if coeffs.len() != basis.ring_degree {
            return Err(LabheError::DimensionMismatch {
                expected: basis.ring_degree,
                got: coeffs.len(),
            });
        }
        let components: Vec<NttPoly> = basis.moduli.iter()
            .zip(basis.plans.iter())
            .map(|(&q, plan)| {
                let reduced: Vec<u64> = coeffs.iter()
                    .map(|&c| c.rem_euclid(q as i64) as u64)
                    .collect();
                let cp = CoeffPoly { coeffs: reduced, modulus: q };
                NttPoly::from_coeff_poly(&cp, plan.clone())
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            components,
            ring_degree: basis.ring_degree,
        })
    }

    /// Number of RNS components.
    pub fn num_components(&self) -> usize {
        self.components.len()
    }

    /// Component-wise addition in RNS.
    pub fn add(&self, other: &Self) -> Result<Self> {
        if self.components.len() != other.components.len() {
            return Err(LabheError::DimensionMismatch {
                expected: self.components.len(),
                got: other.components.len(),
            });
        }
        let components = self.components.iter()
            .zip(other.components.iter())
            .map(|(a, b)| a.add(b))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { components, ring_degree: self.ring_degree })
    }

    /// Component-wise subtraction in RNS.
    pub fn sub(&self, other: &Self) -> Result<Self> {
        if self.components.len() != other.components.len() {
            return Err(LabheError::DimensionMismatch {
                expected: self.components.len(),
                got: other.components.len(),
            });
        }
        let components = self.components.iter()
            .zip(other.components.iter())
            .map(|(a, b)| a.sub(b))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { components, ring_degree: self.ring_degree })
    }

    /// Negate.
    pub fn neg(&self) -> Self {
        let components = self.components.iter()
            .map(|a| a.neg())
            .collect();
        Self { components, ring_degree: self.ring_degree }
    }

    /// Component-wise multiplication in RNS (= polynomial multiplication).
    pub fn mul(&self, other: &Self) -> Result<Self> {
        if self.components.len() != other.components.len() {
            return Err(LabheError::DimensionMismatch {
                expected: self.components.len(),
                got: other.components.len(),
            });
        }
        let components = self.components.iter()
            .zip(other.components.iter())
            .map(|(a, b)| a.mul(b))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { components, ring_degree: self.ring_degree })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // concrete-ntt minimum polynomial_size is 16
    const TEST_N: usize = 16;
    const TEST_MODULI: [u64; 2] = [65537, 12289]; // both ≡ 1 (mod 32)

    fn make_vec(v: &[u64]) -> Vec<u64> {
        let mut r = vec![0u64; TEST_N];
        r[..v.len()].copy_from_slice(v);
        r
    }

    #[test]
    fn test_rns_components_roundtrip() {
        let basis = RnsBasis::new(TEST_MODULI.to_vec(), TEST_N).unwrap();

        let original = CoeffPoly::from_coeffs(make_vec(&[1, 2, 3, 4, 5, 6, 7, 8]), 65537);
        let rns = RnsPoly::from_coeff_poly(&original, &basis).unwrap();
        for (i, &q) in basis.moduli.iter().enumerate() {
            let comp = rns.components[i].to_coeff_poly();
            let expected: Vec<u64> = original.coeffs.iter().map(|&c| c % q).collect();
            assert_eq!(comp.coeffs, expected);
        }
    }

    #[test]
    fn test_rns_signed_lift() {
        let basis = RnsBasis::new(TEST_MODULI.to_vec(), TEST_N).unwrap();

        let mut signed = vec![0i64; TEST_N];
        signed[0] = -3;
        signed[1] = 7;
        let rns = RnsPoly::from_signed_coeffs(&signed, &basis).unwrap();
        for (i, &q) in basis.moduli.iter().enumerate() {
            let comp = rns.components[i].to_coeff_poly();
            assert_eq!(comp.coeffs[0], q - 3);
            assert_eq!(comp.coeffs[1], 7);
        }
    }

    #[test]
    fn test_rns_mul_matches_naive() {
        let basis = RnsBasis::new(vec![65537], TEST_N).unwrap();

        let a = CoeffPoly::from_coeffs(make_vec(&[1, 1]), 65537);
        let b = CoeffPoly::from_coeffs(make_vec(&[2, 3]), 65537);

        let ra = RnsPoly::from_coeff_poly(&a, &basis).unwrap();
        let rb = RnsPoly::from_coeff_poly(&b, &basis).unwrap();
        let rc = ra.mul(&rb).unwrap();

        let result = rc.components[0].to_coeff_poly();
        let expected = a.mul_naive(&b).unwrap();
        assert_eq!(result.coeffs, expected.coeffs);
    }

    #[test]
    fn test_rns_add_sub() {
        let basis = RnsBasis::new(TEST_MODULI.to_vec(), TEST_N).unwrap();

        let a = CoeffPoly::from_coeffs(make_vec(&[10, 20, 30]), 65537);
        let b = CoeffPoly::from_coeffs(make_vec(&[1, 2, 3]), 65537);
        let ra = RnsPoly::from_coeff_poly(&a, &basis).unwrap();
        let rb = RnsPoly::from_coeff_poly(&b, &basis).unwrap();

        let sum = ra.add(&rb).unwrap();
        let diff = sum.sub(&rb).unwrap();
        for i in 0..basis.num_moduli() {
            assert_eq!(diff.components[i].evals, ra.components[i].evals);
        }
    }
}
