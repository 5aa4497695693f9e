use std::collections::HashMap;
use std::sync::Arc;

use rand::Rng;
use zeroize::Zeroize;

use crate::error::{LabheError, Result};
use crate::params::BgvParams;
use crate::ring::ntt::NttPoly;
use crate::ring::poly::CoeffPoly;
use crate::ring::rns::RnsPoly;
use crate::sampling::{os_rng, sample_gaussian_vec, sample_ternary_vec, sample_uniform_rns};

/// BGV secret key: ternary s ∈ R_Q, stored in RNS/NTT form.
pub struct SecretKey {
    /// s in RNS-NTT form.
    pub poly: RnsPoly,
    pub params: Arc<BgvParams>,
}

impl Drop for SecretKey {
    fn drop(&mut self) {
        // Zero out secret key material
        for comp in &mut self.poly.components {
            comp.evals.zeroize();
        }
    }
}

/// BGV public key: pk = (pk0, pk1) where pk0 = -(a·s) - t·e, pk1 = a.
#[derive(Clone, Debug)]
pub struct PublicKey {
    pub pk0: RnsPoly,
    pub pk1: RnsPoly,
    pub params: Arc<BgvParams>,
}

/// Key-switching key from some source secret to a destination secret,
/// decomposed per RNS prime (HPS style): row i satisfies
///   ks0_i + ks1_i · s_dst = -t·e_i + u_i · src
/// where u_i is the CRT unit of prime i (1 mod q_i, 0 mod q_j).
/// Summing digit_i · row_i over the residues digit_i = [x]_{q_i}
/// therefore yields an encryption of x · src.
#[derive(Clone, Debug)]
pub struct KeySwitchKey {
    pub keys: Vec<(RnsPoly, RnsPoly)>,
    pub params: Arc<BgvParams>,
}

/// Relinearization key: switches the s² term of a degree-2 ciphertext
/// back under s.
#[derive(Clone, Debug)]
pub struct RelinKey {
    pub ksk: KeySwitchKey,
}

/// Galois key for the automorphism X → X^element (rotations).
#[derive(Clone, Debug)]
pub struct GaloisKey {
    /// Key-switch key from s(X^element) to s(X).
    pub ksk: KeySwitchKey,
    /// The Galois element.
    pub element: u64,
}

/// Cross-key re-encryption key: switches ciphertexts under sk_src into
/// ciphertexts under sk_dst.
#[derive(Clone, Debug)]
pub struct EvaluationKey {
    pub ksk: KeySwitchKey,
}

/// Aggregate handed to the homomorphic operations: the relinearization
/// key plus any Galois keys, addressed by Galois element.
#[derive(Clone, Debug)]
pub struct EvaluationKeySet {
    relin: Option<RelinKey>,
    galois: HashMap<u64, GaloisKey>,
}

impl EvaluationKeySet {
    /// Aggregate with a relinearization key only.
    pub fn new(relin: RelinKey) -> Self {
        Self { relin: Some(relin), galois: HashMap::new() }
    }

    /// Aggregate with a relinearization key and Galois keys.
    pub fn with_galois(relin: RelinKey, galois_keys: Vec<GaloisKey>) -> Self {
        let galois = galois_keys.into_iter().map(|gk| (gk.element, gk)).collect();
        Self { relin: Some(relin), galois }
    }

    pub fn relin_key(&self) -> Result<&RelinKey> {
        self.relin.as_ref()
            .ok_or_else(|| LabheError::MissingKey("relinearization key".into()))
    }

    pub fn galois_key(&self, element: u64) -> Result<&GaloisKey> {
        self.galois.get(&element)
            .ok_or_else(|| LabheError::MissingKey(format!("Galois key for element {element}")))
    }
}

/// Generate a secret key (ternary distribution).
pub fn gen_secret_key(params: &Arc<BgvParams>) -> Result<SecretKey> {
    let mut rng = os_rng()?;
    gen_secret_key_with_rng(params, &mut rng)
}

/// Generate a secret key with a provided RNG.
pub fn gen_secret_key_with_rng<R: Rng>(
    params: &Arc<BgvParams>,
    rng: &mut R,
) -> Result<SecretKey> {
    let s_coeffs = sample_ternary_vec(params.ring_degree, rng);
    let poly = RnsPoly::from_signed_coeffs(&s_coeffs, &params.ct_basis)?;

    Ok(SecretKey {
        poly,
        params: params.clone(),
    })
}

/// Generate a fresh (sk, pk) pair.
pub fn gen_key_pair(params: &Arc<BgvParams>) -> Result<(SecretKey, PublicKey)> {
    let mut rng = os_rng()?;
    gen_key_pair_with_rng(params, &mut rng)
}

/// Generate a fresh (sk, pk) pair with a provided RNG.
pub fn gen_key_pair_with_rng<R: Rng>(
    params: &Arc<BgvParams>,
    rng: &mut R,
) -> Result<(SecretKey, PublicKey)> {
    let sk = gen_secret_key_with_rng(params, rng)?;
    let pk = gen_public_key_with_rng(&sk, rng)?;
    Ok((sk, pk))
}

/// Generate a public key from a secret key.
pub fn gen_public_key(sk: &SecretKey) -> Result<PublicKey> {
    let mut rng = os_rng()?;
    gen_public_key_with_rng(sk, &mut rng)
}

/// Generate a public key with a provided RNG.
pub fn gen_public_key_with_rng<R: Rng>(
    sk: &SecretKey,
    rng: &mut R,
) -> Result<PublicKey> {
    let params = &sk.params;
    let basis = &params.ct_basis;

    let a = sample_uniform_rns(basis, rng);
    let te = scaled_error(params, rng)?;

    // pk0 = -(a·s + t·e)
    let pk0 = a.mul(&sk.poly)?.add(&te)?.neg();

    Ok(PublicKey {
        pk0,
        pk1: a,
        params: params.clone(),
    })
}

/// Generate a relinearization key: key-switch rows for s².
pub fn gen_relin_key(sk: &SecretKey) -> Result<RelinKey> {
    let mut rng = os_rng()?;
    gen_relin_key_with_rng(sk, &mut rng)
}

/// Generate a relinearization key with a provided RNG.
pub fn gen_relin_key_with_rng<R: Rng>(
    sk: &SecretKey,
    rng: &mut R,
) -> Result<RelinKey> {
    let s_sq = sk.poly.mul(&sk.poly)?;
    let ksk = gen_key_switch_key_with_rng(&s_sq, sk, rng)?;
    Ok(RelinKey { ksk })
}

/// Generate a Galois key for the automorphism X → X^element.
pub fn gen_galois_key(sk: &SecretKey, element: u64) -> Result<GaloisKey> {
    let mut rng = os_rng()?;
    gen_galois_key_with_rng(sk, element, &mut rng)
}

/// Generate a Galois key with a provided RNG.
pub fn gen_galois_key_with_rng<R: Rng>(
    sk: &SecretKey,
    element: u64,
    rng: &mut R,
) -> Result<GaloisKey> {
    let two_n = 2 * sk.params.ring_degree as u64;
    if element % 2 == 0 || element >= two_n {
        return Err(LabheError::InvalidParam(
            format!("Galois element {element} is not an odd unit mod {two_n}")
        ));
    }
    let s_auto = automorphism_rns(&sk.poly, element)?;
    let ksk = gen_key_switch_key_with_rng(&s_auto, sk, rng)?;
    Ok(GaloisKey { ksk, element })
}

/// Generate Galois keys for a batch of elements.
pub fn gen_galois_keys(sk: &SecretKey, elements: &[u64]) -> Result<Vec<GaloisKey>> {
    let mut rng = os_rng()?;
    gen_galois_keys_with_rng(sk, elements, &mut rng)
}

/// Generate Galois keys for a batch of elements with a provided RNG.
pub fn gen_galois_keys_with_rng<R: Rng>(
    sk: &SecretKey,
    elements: &[u64],
    rng: &mut R,
) -> Result<Vec<GaloisKey>> {
    elements.iter()
        .map(|&el| gen_galois_key_with_rng(sk, el, rng))
        .collect()
}

/// Generate a cross-key re-encryption key: ciphertexts under `sk_src`
/// become decryptable under `sk_dst`.
pub fn gen_evaluation_key(sk_src: &SecretKey, sk_dst: &SecretKey) -> Result<EvaluationKey> {
    let mut rng = os_rng()?;
    gen_evaluation_key_with_rng(sk_src, sk_dst, &mut rng)
}

/// Generate a cross-key re-encryption key with a provided RNG.
pub fn gen_evaluation_key_with_rng<R: Rng>(
    sk_src: &SecretKey,
    sk_dst: &SecretKey,
    rng: &mut R,
) -> Result<EvaluationKey> {
    if sk_src.params.ring_degree != sk_dst.params.ring_degree
        || sk_src.params.ct_basis.moduli != sk_dst.params.ct_basis.moduli
    {
        return Err(LabheError::InvalidParam(
            "secret keys use different parameter sets".into()
        ));
    }
    let ksk = gen_key_switch_key_with_rng(&sk_src.poly, sk_dst, rng)?;
    Ok(EvaluationKey { ksk })
}

/// Build the key-switch rows for an arbitrary source secret under
/// `sk_dst`: row i is (-(a_i·s_dst) - t·e_i + u_i·source, a_i).
pub(crate) fn gen_key_switch_key_with_rng<R: Rng>(
    source: &RnsPoly,
    sk_dst: &SecretKey,
    rng: &mut R,
) -> Result<KeySwitchKey> {
    let params = &sk_dst.params;
    let basis = &params.ct_basis;
    let num = basis.num_moduli();

    let mut keys = Vec::with_capacity(num);
    for i in 0..num {
        let a = sample_uniform_rns(basis, rng);
        let te = scaled_error(params, rng)?;

        // u_i · source: keep component i, zero the rest
        let mut gadget = source.clone();
        for (j, comp) in gadget.components.iter_mut().enumerate() {
            if j != i {
                for v in comp.evals.iter_mut() {
                    *v = 0;
                }
            }
        }

        let ks0 = a.mul(&sk_dst.poly)?.add(&te)?.neg().add(&gadget)?;
        keys.push((ks0, a));
    }

    Ok(KeySwitchKey {
        keys,
        params: params.clone(),
    })
}

/// Sample t·e for a fresh Gaussian error e, lifted into RNS.
pub(crate) fn scaled_error<R: Rng>(params: &BgvParams, rng: &mut R) -> Result<RnsPoly> {
    let t = params.plain_modulus as i64;
    let e: Vec<i64> = sample_gaussian_vec(params.ring_degree, params.sigma, rng)
        .into_iter()
        .map(|x| x * t)
        .collect();
    RnsPoly::from_signed_coeffs(&e, &params.ct_basis)
}

/// Apply the automorphism X → X^k to a polynomial in Z_q[X]/(X^n+1).
///
/// The map σ_k sends X^i to X^{ik} reduced modulo X^n+1. Since X^n = -1,
/// this is a signed permutation of the polynomial coefficients. For k odd
/// and coprime to 2n, σ_k is a ring automorphism.
pub fn apply_automorphism(poly: &CoeffPoly, k: u64) -> CoeffPoly {
    let n = poly.len();
    let q = poly.modulus;
    let mut result = vec![0u64; n];

    for (i, &c) in poly.coeffs.iter().enumerate() {
        if c == 0 {
            continue;
        }
        // X^i → X^{ik}, reduced modulo X^n + 1
        let new_exp = (i as u64 * k % (2 * n as u64)) as usize;
        if new_exp < n {
            result[new_exp] = crate::ring::modular::mod_add(result[new_exp], c, q);
        } else {
            // X^{n+j} = -X^j in X^n+1
            let j = new_exp - n;
            result[j] = crate::ring::modular::mod_sub(result[j], c, q);
        }
    }

    CoeffPoly { coeffs: result, modulus: q }
}

/// Apply the automorphism component-wise to an RNS polynomial.
pub(crate) fn automorphism_rns(poly: &RnsPoly, element: u64) -> Result<RnsPoly> {
    let components = poly.components.iter()
        .map(|comp| {
            let coeffs = comp.to_coeff_poly();
            let rotated = apply_automorphism(&coeffs, element);
            NttPoly::from_coeff_poly(&rotated, comp.plan.clone())
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(RnsPoly {
        components,
        ring_degree: poly.ring_degree,
    })
}
