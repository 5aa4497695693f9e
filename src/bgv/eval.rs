use crate::error::{LabheError, Result};
use crate::bgv::BgvCiphertext;
use crate::bgv::encrypt::lift_plaintext;
use crate::bgv::keygen::{automorphism_rns, EvaluationKey, GaloisKey, RelinKey};
use crate::bgv::keyswitch::{relinearize, switch_ciphertext};
use crate::ring::poly::CoeffPoly;
use crate::ring::rns::RnsPoly;

/// Homomorphic addition: ct_out = ct1 + ct2.
/// Component-wise addition, tolerating mixed degrees.
pub fn bgv_add(ct1: &BgvCiphertext, ct2: &BgvCiphertext) -> Result<BgvCiphertext> {
    let max_len = ct1.c.len().max(ct2.c.len());
    let mut c = Vec::with_capacity(max_len);

    for i in 0..max_len {
        match (ct1.c.get(i), ct2.c.get(i)) {
            (Some(a), Some(b)) => c.push(a.add(b)?),
            (Some(a), None) => c.push(a.clone()),
            (None, Some(b)) => c.push(b.clone()),
            (None, None) => unreachable!(),
        }
    }

    Ok(BgvCiphertext {
        c,
        params: ct1.params.clone(),
    })
}

/// Homomorphic subtraction: ct_out = ct1 - ct2.
pub fn bgv_sub(ct1: &BgvCiphertext, ct2: &BgvCiphertext) -> Result<BgvCiphertext> {
    let max_len = ct1.c.len().max(ct2.c.len());
    let mut c = Vec::with_capacity(max_len);

    for i in 0..max_len {
        match (ct1.c.get(i), ct2.c.get(i)) {
            (Some(a), Some(b)) => c.push(a.sub(b)?),
            (Some(a), None) => c.push(a.clone()),
            (None, Some(b)) => c.push(b.neg()),
            (None, None) => unreachable!(),
        }
    }

    Ok(BgvCiphertext {
        c,
        params: ct1.params.clone(),
    })
}

/// Negate a ciphertext.
pub fn bgv_neg(ct: &BgvCiphertext) -> BgvCiphertext {
    let c = ct.c.iter().map(|ci| ci.neg()).collect();
    BgvCiphertext {
        c,
        params: ct.params.clone(),
    }
}

/// Add a plaintext to a ciphertext: the lift of m goes straight onto c0.
pub fn bgv_plain_add(
    ct: &BgvCiphertext,
    plaintext: &CoeffPoly,
) -> Result<BgvCiphertext> {
    let m = lift_plaintext(plaintext, &ct.params)?;

    let mut c = ct.c.clone();
    c[0] = c[0].add(&m)?;

    Ok(BgvCiphertext {
        c,
        params: ct.params.clone(),
    })
}

/// Multiply a ciphertext by a plaintext polynomial (slot-wise product of
/// the underlying vectors). Every component is multiplied by the lift of
/// m; no relinearization is involved.
pub fn bgv_plain_mul(
    ct: &BgvCiphertext,
    plaintext: &CoeffPoly,
) -> Result<BgvCiphertext> {
    let m = lift_plaintext(plaintext, &ct.params)?;

    let c: Vec<RnsPoly> = ct.c.iter()
        .map(|ci| ci.mul(&m))
        .collect::<Result<Vec<_>>>()?;

    Ok(BgvCiphertext {
        c,
        params: ct.params.clone(),
    })
}

/// Homomorphic multiplication WITHOUT relinearization.
/// Returns a degree-2 ciphertext (3 components).
///
/// BGV carries the plaintext in the least-significant position, so the
/// tensor product is exact component-wise RNS arithmetic, with no
/// rescaling and no auxiliary basis.
pub fn bgv_mul_no_relin(
    ct1: &BgvCiphertext,
    ct2: &BgvCiphertext,
) -> Result<BgvCiphertext> {
    if ct1.c.len() != 2 || ct2.c.len() != 2 {
        return Err(LabheError::InvalidParam(
            "multiplication requires degree-1 ciphertexts".into()
        ));
    }

    let c0 = ct1.c[0].mul(&ct2.c[0])?;
    let c1a = ct1.c[0].mul(&ct2.c[1])?;
    let c1b = ct1.c[1].mul(&ct2.c[0])?;
    let c1 = c1a.add(&c1b)?;
    let c2 = ct1.c[1].mul(&ct2.c[1])?;

    Ok(BgvCiphertext {
        c: vec![c0, c1, c2],
        params: ct1.params.clone(),
    })
}

/// Homomorphic multiplication followed by relinearization.
pub fn bgv_mul_and_relin(
    ct1: &BgvCiphertext,
    ct2: &BgvCiphertext,
    rlk: &RelinKey,
) -> Result<BgvCiphertext> {
    let ct_mul = bgv_mul_no_relin(ct1, ct2)?;
    relinearize(&ct_mul, rlk)
}

/// Apply a Galois automorphism σ_k: X → X^k to a BGV ciphertext.
///
/// Given ct = (c0, c1) encrypting μ under secret key s:
///   1. Compute c0' = σ_k(c0), c1' = σ_k(c1)
///   2. Key-switch c1' from σ_k(s) back to s using the Galois key
///
/// The result encrypts σ_k(μ) under the original key s.
pub fn bgv_apply_automorphism(
    ct: &BgvCiphertext,
    gk: &GaloisKey,
) -> Result<BgvCiphertext> {
    if ct.c.len() != 2 {
        return Err(LabheError::InvalidParam(
            "automorphism requires a degree-1 ciphertext".into()
        ));
    }

    let c0_auto = automorphism_rns(&ct.c[0], gk.element)?;
    let c1_auto = automorphism_rns(&ct.c[1], gk.element)?;

    let rotated = BgvCiphertext {
        c: vec![c0_auto, c1_auto],
        params: ct.params.clone(),
    };
    switch_ciphertext(&rotated, &gk.ksk)
}

/// Re-encrypt a ciphertext under another secret key via a cross-key
/// evaluation key (plain key switching; the plaintext is untouched).
pub fn bgv_apply_evaluation_key(
    ct: &BgvCiphertext,
    ek: &EvaluationKey,
) -> Result<BgvCiphertext> {
    switch_ciphertext(ct, &ek.ksk)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bgv::encoding::{decode_slots, encode_slots};
    use crate::bgv::encrypt::{decrypt, encrypt_sk_with_rng};
    use crate::bgv::keygen::*;
    use crate::params::presets::compact_params;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn slotwise(f: impl Fn(u64, u64) -> u64, a: &[u64], b: &[u64]) -> Vec<u64> {
        a.iter().zip(b.iter()).map(|(&x, &y)| f(x, y)).collect()
    }

    #[test]
    fn test_homomorphic_add() {
        let params = compact_params().unwrap();
        let t = params.plaintext_modulus();
        let mut rng = ChaCha20Rng::seed_from_u64(42);

        let sk = gen_secret_key_with_rng(&params, &mut rng).unwrap();

        let a: Vec<u64> = (0..params.max_slots() as u64).map(|i| i % t).collect();
        let b: Vec<u64> = (0..params.max_slots() as u64).map(|i| (3 * i + 1) % t).collect();
        let ct1 = encrypt_sk_with_rng(&encode_slots(&a, &params).unwrap(), &sk, &mut rng).unwrap();
        let ct2 = encrypt_sk_with_rng(&encode_slots(&b, &params).unwrap(), &sk, &mut rng).unwrap();

        let ct_sum = bgv_add(&ct1, &ct2).unwrap();
        let decoded = decode_slots(&decrypt(&ct_sum, &sk).unwrap(), &params).unwrap();
        assert_eq!(decoded, slotwise(|x, y| (x + y) % t, &a, &b));
    }

    #[test]
    fn test_homomorphic_sub() {
        let params = compact_params().unwrap();
        let t = params.plaintext_modulus();
        let mut rng = ChaCha20Rng::seed_from_u64(43);

        let sk = gen_secret_key_with_rng(&params, &mut rng).unwrap();

        let a = vec![50u64, 7, 0, 100];
        let b = vec![20u64, 9, 5, 100];
        let ct1 = encrypt_sk_with_rng(&encode_slots(&a, &params).unwrap(), &sk, &mut rng).unwrap();
        let ct2 = encrypt_sk_with_rng(&encode_slots(&b, &params).unwrap(), &sk, &mut rng).unwrap();

        let ct_diff = bgv_sub(&ct1, &ct2).unwrap();
        let decoded = decode_slots(&decrypt(&ct_diff, &sk).unwrap(), &params).unwrap();
        assert_eq!(&decoded[..4], &slotwise(|x, y| (x + t - y) % t, &a, &b)[..]);
    }

    #[test]
    fn test_homomorphic_mul() {
        let params = compact_params().unwrap();
        let t = params.plaintext_modulus();
        let mut rng = ChaCha20Rng::seed_from_u64(44);

        let sk = gen_secret_key_with_rng(&params, &mut rng).unwrap();
        let rlk = gen_relin_key_with_rng(&sk, &mut rng).unwrap();

        let a: Vec<u64> = (0..params.max_slots() as u64).map(|i| (i * i + 3) % t).collect();
        let b: Vec<u64> = (0..params.max_slots() as u64).map(|i| (7 * i + 11) % t).collect();
        let ct1 = encrypt_sk_with_rng(&encode_slots(&a, &params).unwrap(), &sk, &mut rng).unwrap();
        let ct2 = encrypt_sk_with_rng(&encode_slots(&b, &params).unwrap(), &sk, &mut rng).unwrap();

        let ct_prod = bgv_mul_and_relin(&ct1, &ct2, &rlk).unwrap();
        assert_eq!(ct_prod.degree(), 1);
        let decoded = decode_slots(&decrypt(&ct_prod, &sk).unwrap(), &params).unwrap();
        assert_eq!(decoded, slotwise(|x, y| x * y % t, &a, &b));
    }

    #[test]
    fn test_degree_two_decrypts_without_relin() {
        let params = compact_params().unwrap();
        let t = params.plaintext_modulus();
        let mut rng = ChaCha20Rng::seed_from_u64(45);

        let sk = gen_secret_key_with_rng(&params, &mut rng).unwrap();

        let a = vec![3u64, 110];
        let b = vec![7u64, 110];
        let ct1 = encrypt_sk_with_rng(&encode_slots(&a, &params).unwrap(), &sk, &mut rng).unwrap();
        let ct2 = encrypt_sk_with_rng(&encode_slots(&b, &params).unwrap(), &sk, &mut rng).unwrap();

        let ct_prod = bgv_mul_no_relin(&ct1, &ct2).unwrap();
        assert_eq!(ct_prod.degree(), 2);
        let decoded = decode_slots(&decrypt(&ct_prod, &sk).unwrap(), &params).unwrap();
        assert_eq!(decoded[0], 21);
        assert_eq!(decoded[1], 110 * 110 % t);
    }

    #[test]
    fn test_plain_add_and_mul() {
        let params = compact_params().unwrap();
        let t = params.plaintext_modulus();
        let mut rng = ChaCha20Rng::seed_from_u64(46);

        let sk = gen_secret_key_with_rng(&params, &mut rng).unwrap();

        let a = vec![10u64, 20, 30];
        let b = vec![5u64, 6, 7];
        let ct = encrypt_sk_with_rng(&encode_slots(&a, &params).unwrap(), &sk, &mut rng).unwrap();
        let pt_b = encode_slots(&b, &params).unwrap();

        let ct_sum = bgv_plain_add(&ct, &pt_b).unwrap();
        let decoded = decode_slots(&decrypt(&ct_sum, &sk).unwrap(), &params).unwrap();
        assert_eq!(&decoded[..3], &[15, 26, 37]);

        let ct_prod = bgv_plain_mul(&ct, &pt_b).unwrap();
        let decoded = decode_slots(&decrypt(&ct_prod, &sk).unwrap(), &params).unwrap();
        assert_eq!(&decoded[..3], &slotwise(|x, y| x * y % t, &a, &b)[..]);
    }

    #[test]
    fn test_automorphism_rotates_encrypted_slots() {
        let params = compact_params().unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(47);
        let n = params.max_slots();
        let h = n / 2;
        let k = 3usize;

        let sk = gen_secret_key_with_rng(&params, &mut rng).unwrap();
        let element = params.galois_element_for_col_rotation(k);
        let gk = gen_galois_key_with_rng(&sk, element, &mut rng).unwrap();

        let values: Vec<u64> = (0..n as u64).collect();
        let ct = encrypt_sk_with_rng(&encode_slots(&values, &params).unwrap(), &sk, &mut rng).unwrap();

        let ct_rot = bgv_apply_automorphism(&ct, &gk).unwrap();
        let decoded = decode_slots(&decrypt(&ct_rot, &sk).unwrap(), &params).unwrap();
        for i in 0..n {
            let expected = if i < h {
                values[(i + k) % h]
            } else {
                values[h + (i - h + k) % h]
            };
            assert_eq!(decoded[i], expected, "slot {i}");
        }
    }
}
