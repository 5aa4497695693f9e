use std::sync::Arc;
use concrete_ntt::prime64::Plan;

use crate::error::{LabheError, Result};
use crate::ring::poly::CoeffPoly;

/// Polynomial in NTT (evaluation) representation over Z_q[X]/(X^n + 1).
///
/// Uses `concrete-ntt` for hardware-accelerated NTT (AVX2/AVX-512/NEON).
#[derive(Clone, Debug)]
pub struct NttPoly {
    pub evals: Vec<u64>,
    pub modulus: u64,
    pub plan: Arc<Plan>,
}

/// Build an NTT plan for (ring_degree, modulus). Callers share plans via `Arc`.
pub fn make_plan(n: usize, modulus: u64) -> Result<Arc<Plan>> {
    if !n.is_power_of_two() || n < 2 {
        return Err(LabheError::InvalidRingDegree(n));
    }
    // concrete-ntt requires the modulus to be prime and ≡ 1 (mod 2n)
    let plan = Plan::try_new(n, modulus)
        .ok_or_else(|| LabheError::InvalidParam(
            format!("cannot create NTT plan for n={n}, q={modulus} (need prime q ≡ 1 mod {})", 2 * n)
        ))?;
    Ok(Arc::new(plan))
}

impl NttPoly {
    /// Create a zero polynomial in NTT domain.
    pub fn zero(n: usize, modulus: u64, plan: Arc<Plan>) -> Self {
        Self {
            evals: vec![0u64; n],
            modulus,
            plan,
        }
    }

    /// Forward NTT: convert from coefficient to evaluation representation.
    pub fn from_coeff_poly(poly: &CoeffPoly, plan: Arc<Plan>) -> Result<Self> {
        if poly.modulus != plan.modulus() {
            return Err(LabheError::ModulusMismatch);
        }
        let mut evals = poly.coeffs.clone();
        // concrete-ntt operates in-place
        plan.fwd(&mut evals);
        Ok(Self {
            evals,
            modulus: poly.modulus,
            plan,
        })
    }

    /// Inverse NTT: convert back to coefficient representation.
    pub fn to_coeff_poly(&self) -> CoeffPoly {
        let mut coeffs = self.evals.clone();
        self.plan.inv(&mut coeffs);
        // the inverse transform leaves a factor of n; normalize divides it out
        self.plan.normalize(&mut coeffs);
        CoeffPoly {
            coeffs,
            modulus: self.modulus,
        }
    }

    /// Ring degree.
    pub fn len(&self) -> usize {
        self.evals.len()
    }

    /// Component-wise addition in NTT domain (= polynomial addition).
    pub fn add(&self, other: &Self) -> Result<Self> {
        if self.len() != other.len() || self.modulus != other.modulus {
            return Err(LabheError::ModulusMismatch);
        }
        let mut evals = self.evals.clone();
        for (a, &b) in evals.iter_mut().zip(other.evals.iter()) {
            let sum = *a as u128 + b as u128;
            *a = if sum >= self.modulus as u128 {
                (sum - self.modulus as u128) as u64
            } else {
                sum as u64
            };
        }
        Ok(Self { evals, modulus: self.modulus, plan: self.plan.clone() })
    }

    /// Component-wise subtraction.
    pub fn sub(&self, other: &Self) -> Result<Self> {
        if self.len() != other.len() || self.modulus != other.modulus {
            return Err(LabheError::ModulusMismatch);
        }
        let mut evals = self.evals.clone();
        for (a, &b) in evals.iter_mut().zip(other.evals.iter()) {
            if *a >= b {
                *a -= b;
            } else {
                *a = self.modulus - b + *a;
            }
        }
        Ok(Self { evals, modulus: self.modulus, plan: self.plan.clone() })
    }

    /// Component-wise negation.
    pub fn neg(&self) -> Self {
        let evals = self.evals.iter().map(|&a| {
            if a == 0 { 0 } else { self.modulus - a }
        }).collect();
        Self { evals, modulus: self.modulus, plan: self.plan.clone() }
    }

    /// Component-wise multiplication in NTT domain (= polynomial multiplication).
    pub fn mul(&self, other: &Self) -> Result<Self> {
        if self.len() != other.len() || self.modulus != other.modulus {
            return Err(LabheError::ModulusMismatch);
        }
        let bk = crate::ring::modular::barrett_constant(self.modulus);
        let evals = self.evals.iter()
            .zip(other.evals.iter())
            .map(|(&a, &b)| crate::ring::modular::mod_mul(a, b, self.modulus, bk))
            .collect();
        Ok(Self { evals, modulus: self.modulus, plan: self.plan.clone() })
    }
}

impl PartialEq for NttPoly {
    fn eq(&self, other: &Self) -> bool {
        self.modulus == other.modulus && self.evals == other.evals
    }
}
