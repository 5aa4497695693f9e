use num_bigint::BigUint;
use num_traits::{One, ToPrimitive, Zero};
use rand::Rng;

use crate::error::{LabheError, Result};
use crate::bgv::BgvCiphertext;
use crate::bgv::keygen::{PublicKey, SecretKey, scaled_error};
use crate::params::BgvParams;
use crate::ring::modular::mod_inv;
use crate::ring::poly::CoeffPoly;
use crate::ring::rns::RnsPoly;
use crate::sampling::{os_rng, sample_ternary_vec, sample_uniform_rns};

/// Encrypt a plaintext polynomial under the public key.
///
/// ct = (pk0·u + t·e1 + m, pk1·u + t·e2) with u ternary and e1, e2
/// Gaussian, so the phase c0 + c1·s equals m + t·(e1 - e·u + e2·s).
pub fn encrypt_pk(plaintext: &CoeffPoly, pk: &PublicKey) -> Result<BgvCiphertext> {
    let mut rng = os_rng()?;
    encrypt_pk_with_rng(plaintext, pk, &mut rng)
}

/// Encrypt under the public key with a provided RNG (deterministic tests).
pub fn encrypt_pk_with_rng<R: Rng>(
    plaintext: &CoeffPoly,
    pk: &PublicKey,
    rng: &mut R,
) -> Result<BgvCiphertext> {
    let params = &pk.params;
    let basis = &params.ct_basis;

    let m = lift_plaintext(plaintext, params)?;

    let u_coeffs = sample_ternary_vec(params.ring_degree, rng);
    let u = RnsPoly::from_signed_coeffs(&u_coeffs, basis)?;

    let te1 = scaled_error(params, rng)?;
    let te2 = scaled_error(params, rng)?;

    // c0 = pk0·u + t·e1 + m
    let c0 = pk.pk0.mul(&u)?.add(&te1)?.add(&m)?;
    // c1 = pk1·u + t·e2
    let c1 = pk.pk1.mul(&u)?.add(&te2)?;

    Ok(BgvCiphertext {
        c: vec![c0, c1],
        params: params.clone(),
    })
}

/// Encrypt a plaintext polynomial under the secret key (symmetric).
///
/// ct = (-(a·s) + t·e + m, a)
pub fn encrypt_sk(plaintext: &CoeffPoly, sk: &SecretKey) -> Result<BgvCiphertext> {
    let mut rng = os_rng()?;
    encrypt_sk_with_rng(plaintext, sk, &mut rng)
}

/// Encrypt under the secret key with a provided RNG.
pub fn encrypt_sk_with_rng<R: Rng>(
    plaintext: &CoeffPoly,
    sk: &SecretKey,
    rng: &mut R,
) -> Result<BgvCiphertext> {
    let params = &sk.params;
    let basis = &params.ct_basis;

    let m = lift_plaintext(plaintext, params)?;

    let a = sample_uniform_rns(basis, rng);
    let te = scaled_error(params, rng)?;

    // c0 = -(a·s) + t·e + m
    let c0 = a.mul(&sk.poly)?.neg().add(&te)?.add(&m)?;

    Ok(BgvCiphertext {
        c: vec![c0, a],
        params: params.clone(),
    })
}

/// Decrypt a BGV ciphertext.
///
/// Computes the phase Σ c_i·s^i, reconstructs each coefficient exactly by
/// CRT, centers it in (-Q/2, Q/2], and reduces mod t. Correct as long as
/// the accumulated noise keeps |m + t·E| below Q/2.
pub fn decrypt(ct: &BgvCiphertext, sk: &SecretKey) -> Result<CoeffPoly> {
    let params = &ct.params;
    let basis = &params.ct_basis;

    let mut phase = ct.c[0].clone();
    let mut s_power = sk.poly.clone();
    for i in 1..ct.c.len() {
        let c_i_s = ct.c[i].mul(&s_power)?;
        phase = phase.add(&c_i_s)?;
        if i < ct.c.len() - 1 {
            s_power = s_power.mul(&sk.poly)?;
        }
    }

    let coeff_components: Vec<CoeffPoly> = phase.components.iter()
        .map(|c| c.to_coeff_poly())
        .collect();

    let mut q_big = BigUint::one();
    for &qi in &basis.moduli {
        q_big *= BigUint::from(qi);
    }
    let half_q = &q_big >> 1;

    // Precompute CRT terms: (Q / q_i) * ((Q / q_i)^{-1} mod q_i)
    let mut crt_terms = Vec::with_capacity(basis.moduli.len());
    for &qi in &basis.moduli {
        let qi_big = BigUint::from(qi);
        let q_star = &q_big / &qi_big;
        let q_star_mod_qi = (&q_star % &qi_big)
            .to_u64()
            .ok_or_else(|| LabheError::InvalidParam(
                "failed to reduce CRT factor modulo q_i".into()
            ))?;
        let inv = mod_inv(q_star_mod_qi, qi)
            .ok_or_else(|| LabheError::InvalidParam("non-coprime ciphertext moduli".into()))?;
        crt_terms.push(q_star * BigUint::from(inv));
    }

    let t = params.plain_modulus;
    let t_big = BigUint::from(t);
    let mut result = vec![0u64; params.ring_degree];
    for coeff_idx in 0..params.ring_degree {
        let mut x = BigUint::zero();
        for (i, coeffs_i) in coeff_components.iter().enumerate() {
            x += &crt_terms[i] * BigUint::from(coeffs_i.coeffs[coeff_idx]);
        }
        x %= &q_big;

        // Centered representative mod t: values above Q/2 stand for x - Q.
        let m = if x > half_q {
            let neg = (&q_big - &x) % &t_big;
            if neg.is_zero() { BigUint::zero() } else { &t_big - &neg }
        } else {
            &x % &t_big
        };
        result[coeff_idx] = m
            .to_u64()
            .ok_or_else(|| LabheError::InvalidParam(
                "decryption coefficient does not fit in u64".into()
            ))?;
    }

    Ok(CoeffPoly {
        coeffs: result,
        modulus: t,
    })
}

/// Lift a plaintext polynomial mod t into the ciphertext RNS basis.
pub(crate) fn lift_plaintext(plaintext: &CoeffPoly, params: &BgvParams) -> Result<RnsPoly> {
    if plaintext.modulus != params.plain_modulus {
        return Err(LabheError::ModulusMismatch);
    }
    if plaintext.len() != params.ring_degree {
        return Err(LabheError::DimensionMismatch {
            expected: params.ring_degree,
            got: plaintext.len(),
        });
    }
    RnsPoly::from_coeff_poly(plaintext, &params.ct_basis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bgv::encoding::{decode_slots, encode_slots};
    use crate::bgv::keygen::*;
    use crate::params::presets::compact_params;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn test_encrypt_decrypt_sk() {
        let params = compact_params().unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(42);

        let sk = gen_secret_key_with_rng(&params, &mut rng).unwrap();
        let values = vec![1u64, 2, 3, 4, 5];
        let pt = encode_slots(&values, &params).unwrap();
        let ct = encrypt_sk_with_rng(&pt, &sk, &mut rng).unwrap();
        let decrypted = decrypt(&ct, &sk).unwrap();

        let decoded = decode_slots(&decrypted, &params).unwrap();
        assert_eq!(&decoded[..5], &values[..]);
        assert!(decoded[5..].iter().all(|&v| v == 0));
    }

    #[test]
    fn test_encrypt_decrypt_pk() {
        let params = compact_params().unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(42);

        let (sk, pk) = gen_key_pair_with_rng(&params, &mut rng).unwrap();

        let t = params.plaintext_modulus();
        let values: Vec<u64> = (0..params.max_slots() as u64).map(|i| i % t).collect();
        let pt = encode_slots(&values, &params).unwrap();
        let ct = encrypt_pk_with_rng(&pt, &pk, &mut rng).unwrap();
        let decrypted = decrypt(&ct, &sk).unwrap();

        assert_eq!(decode_slots(&decrypted, &params).unwrap(), values);
    }

    #[test]
    fn test_encrypt_rejects_wrong_modulus() {
        let params = compact_params().unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        let sk = gen_secret_key_with_rng(&params, &mut rng).unwrap();

        let pt = CoeffPoly::zero(params.ring_degree, 17);
        assert!(encrypt_sk_with_rng(&pt, &sk, &mut rng).is_err());
    }
}
