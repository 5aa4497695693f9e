pub mod primes;
pub mod presets;
pub mod security;

use std::sync::Arc;

use crate::bgv::encoding::SlotEncoder;
use crate::error::{LabheError, Result};
use crate::ring::modular::mod_pow;
use crate::ring::rns::RnsBasis;

/// Galois-group generator for the power-of-two cyclotomic ring.
///
/// 5 generates the cyclic part of (Z/2N)*, so X → X^{5^k} shifts both
/// slot rows left by k columns, and X → X^{2N-1} swaps the rows.
pub const GALOIS_GENERATOR: u64 = 5;

/// Parameters for the BGV scheme underneath the labeled layer.
#[derive(Clone, Debug)]
pub struct BgvParams {
    /// Ring degree N (must be a power of 2).
    pub ring_degree: usize,
    /// Plaintext modulus t: prime, ≡ 1 (mod 2N) so the plaintext ring
    /// fully splits into N slots.
    pub plain_modulus: u64,
    /// RNS basis for the ciphertext modulus Q = ∏ q_i.
    pub ct_basis: Arc<RnsBasis>,
    /// Special-prime sizes of the key material (the logP of the literal).
    /// Counted in the security budget; key switching here decomposes over
    /// Q directly and needs no second basis.
    pub aux_moduli: Vec<u64>,
    /// Gaussian noise standard deviation.
    pub sigma: f64,
    /// SIMD slot codec over Z_t.
    pub encoder: Arc<SlotEncoder>,
}

impl BgvParams {
    /// Number of plaintext slots: N, arranged as two rows of N/2 columns.
    pub fn max_slots(&self) -> usize {
        self.ring_degree
    }

    /// The plaintext modulus t.
    pub fn plaintext_modulus(&self) -> u64 {
        self.plain_modulus
    }

    /// Highest ciphertext level (number of ciphertext primes minus one).
    pub fn max_level(&self) -> usize {
        self.ct_basis.num_moduli() - 1
    }

    /// Galois element performing a column rotation by `k` (both rows of
    /// N/2 slots shift left by k, independently).
    pub fn galois_element_for_col_rotation(&self, k: usize) -> u64 {
        let two_n = 2 * self.ring_degree as u64;
        let half = (self.ring_degree / 2) as u64;
        mod_pow(GALOIS_GENERATOR, k as u64 % half, two_n)
    }

    /// Galois element swapping the two slot rows.
    pub fn galois_element_for_row_rotation(&self) -> u64 {
        2 * self.ring_degree as u64 - 1
    }

    pub(crate) fn encoder(&self) -> &SlotEncoder {
        &self.encoder
    }
}

/// Builder for BgvParams.
pub struct BgvParamsBuilder {
    ring_degree: usize,
    plain_modulus: u64,
    ct_moduli: Vec<u64>,
    aux_moduli: Vec<u64>,
    sigma: f64,
}

impl Default for BgvParamsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BgvParamsBuilder {
    pub fn new() -> Self {
        Self {
            ring_degree: 4096,
            plain_modulus: 65537,
            ct_moduli: Vec::new(),
            aux_moduli: Vec::new(),
            sigma: 3.2,
        }
    }

    /// Build from the parameter literal (logN, logQ, logP, t): NTT-friendly
    /// primes of the requested bit sizes are generated closest-first to
    /// 2^bits, all distinct from each other and from t.
    pub fn from_literal(log_n: usize, log_q: &[usize], log_p: &[usize], t: u64) -> Result<Arc<BgvParams>> {
        if !(10..=16).contains(&log_n) {
            return Err(LabheError::InvalidParam(format!("logN = {log_n} out of range")));
        }
        let n = 1usize << log_n;
        let ct_moduli = primes::generate_ntt_primes(log_q, n, &[t])?;
        let mut exclude = ct_moduli.clone();
        exclude.push(t);
        let aux_moduli = primes::generate_ntt_primes(log_p, n, &exclude)?;

        Self::new()
            .ring_degree(n)
            .plain_modulus(t)
            .ct_moduli(ct_moduli)
            .aux_moduli(aux_moduli)
            .build()
    }

    pub fn ring_degree(mut self, n: usize) -> Self {
        self.ring_degree = n;
        self
    }

    pub fn plain_modulus(mut self, t: u64) -> Self {
        self.plain_modulus = t;
        self
    }

    pub fn ct_moduli(mut self, moduli: Vec<u64>) -> Self {
        self.ct_moduli = moduli;
        self
    }

    pub fn aux_moduli(mut self, moduli: Vec<u64>) -> Self {
        self.aux_moduli = moduli;
        self
    }

    pub fn sigma(mut self, sigma: f64) -> Self {
        self.sigma = sigma;
        self
    }

    pub fn build(self) -> Result<Arc<BgvParams>> {
        if !self.ring_degree.is_power_of_two() || self.ring_degree < 16 {
            return Err(LabheError::InvalidRingDegree(self.ring_degree));
        }
        if self.ct_moduli.is_empty() {
            return Err(LabheError::InvalidParam("must specify at least one ciphertext modulus".into()));
        }
        if !primes::is_prime_u64(self.plain_modulus) {
            return Err(LabheError::InvalidParam(
                format!("plaintext modulus {} must be prime", self.plain_modulus)
            ));
        }
        let two_n = 2 * self.ring_degree as u64;
        if self.plain_modulus % two_n != 1 {
            return Err(LabheError::InvalidParam(format!(
                "plaintext modulus {} is not ≡ 1 (mod {two_n}); the plaintext ring does not split into slots",
                self.plain_modulus
            )));
        }

        let ct_basis = Arc::new(RnsBasis::new(self.ct_moduli, self.ring_degree)?);
        let encoder = Arc::new(SlotEncoder::new(self.ring_degree, self.plain_modulus)?);

        Ok(Arc::new(BgvParams {
            ring_degree: self.ring_degree,
            plain_modulus: self.plain_modulus,
            ct_basis,
            aux_moduli: self.aux_moduli,
            sigma: self.sigma,
            encoder,
        }))
    }
}
