use rand::Rng;

use crate::bgv::encoding::{decode_slots, encode_slots};
use crate::bgv::encrypt::{decrypt as bgv_decrypt, encrypt_pk_with_rng};
use crate::bgv::keygen::{PublicKey, SecretKey};
use crate::error::{LabheError, Result};
use crate::labeling::label::sample_small_vector;
use crate::labeling::{Label, LabeledCiphertext};
use crate::ring::modular::{barrett_constant, mod_add, mod_mul, mod_sub};
use crate::sampling::os_rng;

/// Encrypt a slot vector as a labeled ciphertext.
///
/// Each slot is split as m = a + b with b a fresh √t-bounded mask: the
/// label a = (m - b) mod t stays in the clear and β = Enc_pk(b) is the
/// single beta of the bundle. Vectors shorter than the slot count are
/// zero-padded.
pub fn encrypt(values: &[u64], pk: &PublicKey) -> Result<LabeledCiphertext> {
    let mut rng = os_rng()?;
    encrypt_with_rng(values, pk, &mut rng)
}

/// Encrypt with a provided RNG (deterministic testing).
pub fn encrypt_with_rng<R: Rng>(
    values: &[u64],
    pk: &PublicKey,
    rng: &mut R,
) -> Result<LabeledCiphertext> {
    let params = &pk.params;
    let n = params.max_slots();
    let t = params.plaintext_modulus();

    if values.len() > n {
        return Err(LabheError::DimensionMismatch {
            expected: n,
            got: values.len(),
        });
    }
    for &v in values {
        if v >= t {
            return Err(LabheError::InvalidParam(
                format!("slot value {v} >= plaintext modulus {t}")
            ));
        }
    }

    let masks = sample_small_vector(n, t, rng);

    // a ← (m − b) mod t, slot-wise
    let labels: Vec<u64> = (0..n)
        .map(|i| {
            let v = values.get(i).copied().unwrap_or(0);
            mod_sub(v, masks[i], t)
        })
        .collect();

    // β ← Enc_pk(b)
    let mask_pt = encode_slots(&masks, params)?;
    let beta = encrypt_pk_with_rng(&mask_pt, pk, rng)?;

    Ok(LabeledCiphertext {
        label: Label::Clear(labels),
        betas: vec![vec![beta]],
        params: params.clone(),
    })
}

/// Decrypt a clear-shape labeled ciphertext: m = a + Dec(β) mod t.
pub fn decrypt(ct: &LabeledCiphertext, sk: &SecretKey) -> Result<Vec<u64>> {
    let params = &ct.params;
    let t = params.plaintext_modulus();

    let labels = ct.clear_label()?;
    let beta = ct.single_beta()?;

    let masks = decode_slots(&bgv_decrypt(beta, sk)?, params)?;

    Ok(labels.iter()
        .zip(masks.iter())
        .map(|(&a, &b)| mod_add(a, b, t))
        .collect())
}

/// Decrypt an encrypted-shape labeled ciphertext:
/// m = Dec(α) + Σ_term Π_{β ∈ term} Dec(β), all slot-wise mod t.
pub fn decrypt_overflow(ct: &LabeledCiphertext, sk: &SecretKey) -> Result<Vec<u64>> {
    let params = &ct.params;
    let n = params.max_slots();
    let t = params.plaintext_modulus();
    let bk = barrett_constant(t);

    let alpha = ct.encrypted_label()?;
    let plain_alpha = decode_slots(&bgv_decrypt(alpha, sk)?, params)?;

    let mut term_sum = vec![0u64; n];
    for term in &ct.betas {
        let mut factor_prod = vec![1u64; n];
        for beta in term {
            let plain_beta = decode_slots(&bgv_decrypt(beta, sk)?, params)?;
            for k in 0..n {
                factor_prod[k] = mod_mul(factor_prod[k], plain_beta[k], t, bk);
            }
        }
        for k in 0..n {
            term_sum[k] = mod_add(term_sum[k], factor_prod[k], t);
        }
    }

    Ok(plain_alpha.iter()
        .zip(term_sum.iter())
        .map(|(&a, &s)| mod_add(a, s, t))
        .collect())
}
