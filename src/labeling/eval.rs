use rand::Rng;

use crate::bgv::encoding::encode_slots;
use crate::bgv::encrypt::encrypt_pk_with_rng;
use crate::bgv::eval::{bgv_add, bgv_mul_and_relin, bgv_plain_add, bgv_plain_mul};
use crate::bgv::keygen::{EvaluationKeySet, PublicKey};
use crate::error::Result;
use crate::labeling::label::{add_labels, mul_labels, sample_small_vector, sub_labels};
use crate::labeling::{Label, LabeledCiphertext};
use crate::sampling::os_rng;

/// Homomorphic addition of two clear-shape ciphertexts.
///
/// Labels add slot-wise; the betas add under BGV. Shape stays clear with
/// a single beta.
pub fn sum(ct1: &LabeledCiphertext, ct2: &LabeledCiphertext) -> Result<LabeledCiphertext> {
    let params = &ct1.params;
    let t = params.plaintext_modulus();

    let labels = add_labels(ct1.clear_label()?, ct2.clear_label()?, t)?;
    let beta = bgv_add(ct1.single_beta()?, ct2.single_beta()?)?;

    Ok(LabeledCiphertext {
        label: Label::Clear(labels),
        betas: vec![vec![beta]],
        params: params.clone(),
    })
}

/// Homomorphic multiplication of two clear-shape ciphertexts, staying in
/// clear shape.
///
/// A fresh mask r re-randomises the output label:
///   a_out = a1·a2 − r                                      (mod t)
///   β_out = (β1 ⊠ β2) + a1·β2 + a2·β1 + Enc_pk(r)
/// Expanding m_i = a_i + Dec(β_i) shows a_out + Dec(β_out) = m1·m2, with
/// a single relinearized BGV multiplication; the cross terms are cheap
/// plaintext products.
pub fn mult(
    ct1: &LabeledCiphertext,
    ct2: &LabeledCiphertext,
    pk: &PublicKey,
    evk: &EvaluationKeySet,
) -> Result<LabeledCiphertext> {
    let mut rng = os_rng()?;
    mult_with_rng(ct1, ct2, pk, evk, &mut rng)
}

/// `mult` with a provided RNG.
pub fn mult_with_rng<R: Rng>(
    ct1: &LabeledCiphertext,
    ct2: &LabeledCiphertext,
    pk: &PublicKey,
    evk: &EvaluationKeySet,
    rng: &mut R,
) -> Result<LabeledCiphertext> {
    let params = &ct1.params;
    let t = params.plaintext_modulus();

    let a1 = ct1.clear_label()?;
    let a2 = ct2.clear_label()?;
    let beta1 = ct1.single_beta()?;
    let beta2 = ct2.single_beta()?;

    // r ← fresh √t-bounded mask; a_out = a1·a2 − r
    let r = sample_small_vector(params.max_slots(), t, rng);
    let labels = sub_labels(&mul_labels(a1, a2, t)?, &r, t)?;

    // β1 ⊠ β2 under the relinearization key
    let rlk = evk.relin_key()?;
    let mut beta = bgv_mul_and_relin(beta1, beta2, rlk)?;

    // + a1·β2 + a2·β1
    beta = bgv_add(&beta, &bgv_plain_mul(beta2, &encode_slots(a1, params)?)?)?;
    beta = bgv_add(&beta, &bgv_plain_mul(beta1, &encode_slots(a2, params)?)?)?;

    // + Enc_pk(r): folding the mask into beta keeps it unrecoverable
    let r_ct = encrypt_pk_with_rng(&encode_slots(&r, params)?, pk, rng)?;
    beta = bgv_add(&beta, &r_ct)?;

    Ok(LabeledCiphertext {
        label: Label::Clear(labels),
        betas: vec![vec![beta]],
        params: params.clone(),
    })
}

/// Homomorphic multiplication whose result cannot keep its label public.
///
///   α = Enc_pk(a1·a2) + a1·β2 + a2·β1
///   B = [[β1, β2]]
/// so Dec(α) + Dec(β1)·Dec(β2) = m1·m2. No relinearized multiplication
/// happens here, only plaintext products and one fresh encryption, so
/// no evaluation key set is needed.
pub fn mult_overflow(
    ct1: &LabeledCiphertext,
    ct2: &LabeledCiphertext,
    pk: &PublicKey,
) -> Result<LabeledCiphertext> {
    let mut rng = os_rng()?;
    mult_overflow_with_rng(ct1, ct2, pk, &mut rng)
}

/// `mult_overflow` with a provided RNG.
pub fn mult_overflow_with_rng<R: Rng>(
    ct1: &LabeledCiphertext,
    ct2: &LabeledCiphertext,
    pk: &PublicKey,
    rng: &mut R,
) -> Result<LabeledCiphertext> {
    let params = &ct1.params;
    let t = params.plaintext_modulus();

    let a1 = ct1.clear_label()?;
    let a2 = ct2.clear_label()?;
    let beta1 = ct1.single_beta()?;
    let beta2 = ct2.single_beta()?;

    // γ = Enc_pk(a1·a2)
    let product = mul_labels(a1, a2, t)?;
    let gamma = encrypt_pk_with_rng(&encode_slots(&product, params)?, pk, rng)?;

    // α = γ + a1·β2 + a2·β1
    let mut alpha = bgv_add(&gamma, &bgv_plain_mul(beta2, &encode_slots(a1, params)?)?)?;
    alpha = bgv_add(&alpha, &bgv_plain_mul(beta1, &encode_slots(a2, params)?)?)?;

    Ok(LabeledCiphertext {
        label: Label::Encrypted(alpha),
        betas: vec![vec![beta1.clone(), beta2.clone()]],
        params: params.clone(),
    })
}

/// Mixed addition: encrypted-shape + clear-shape.
///
/// The clear label folds into α as a plaintext addition; the bundles
/// concatenate.
pub fn sum_overflow(
    ct1: &LabeledCiphertext,
    ct2: &LabeledCiphertext,
) -> Result<LabeledCiphertext> {
    let params = &ct1.params;

    let alpha1 = ct1.encrypted_label()?;
    let a2 = ct2.clear_label()?;
    ct2.single_beta()?;

    let alpha = bgv_plain_add(alpha1, &encode_slots(a2, params)?)?;

    let mut betas = ct1.betas.clone();
    betas.extend(ct2.betas.iter().cloned());

    Ok(LabeledCiphertext {
        label: Label::Encrypted(alpha),
        betas,
        params: params.clone(),
    })
}

/// Addition of two encrypted-shape ciphertexts: α's add, bundles
/// concatenate. Concatenation is what makes the bundle a list of terms:
/// each term is one additive summand that was itself a product of betas.
pub fn sum_overflow_ciphertext(
    ct1: &LabeledCiphertext,
    ct2: &LabeledCiphertext,
) -> Result<LabeledCiphertext> {
    let params = &ct1.params;

    let alpha = bgv_add(ct1.encrypted_label()?, ct2.encrypted_label()?)?;

    let mut betas = ct1.betas.clone();
    betas.extend(ct2.betas.iter().cloned());

    Ok(LabeledCiphertext {
        label: Label::Encrypted(alpha),
        betas,
        params: params.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bgv::keygen::{gen_key_pair_with_rng, gen_relin_key_with_rng};
    use crate::labeling::encrypt::{decrypt, decrypt_overflow, encrypt_with_rng};
    use crate::params::presets::compact_params;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn setup(seed: u64) -> (
        std::sync::Arc<crate::params::BgvParams>,
        crate::bgv::keygen::SecretKey,
        crate::bgv::keygen::PublicKey,
        EvaluationKeySet,
        ChaCha20Rng,
    ) {
        let params = compact_params().unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let (sk, pk) = gen_key_pair_with_rng(&params, &mut rng).unwrap();
        let rlk = gen_relin_key_with_rng(&sk, &mut rng).unwrap();
        (params, sk, pk, EvaluationKeySet::new(rlk), rng)
    }

    #[test]
    fn test_sum() {
        let (params, sk, pk, _evk, mut rng) = setup(1);
        let t = params.plaintext_modulus();

        let v1 = vec![10u64, t - 1, 0, 5000];
        let v2 = vec![20u64, 2, 0, 9000];
        let ct1 = encrypt_with_rng(&v1, &pk, &mut rng).unwrap();
        let ct2 = encrypt_with_rng(&v2, &pk, &mut rng).unwrap();

        let ct_sum = sum(&ct1, &ct2).unwrap();
        let dec = decrypt(&ct_sum, &sk).unwrap();
        for i in 0..4 {
            assert_eq!(dec[i], (v1[i] + v2[i]) % t);
        }
    }

    #[test]
    fn test_mult() {
        let (params, sk, pk, evk, mut rng) = setup(2);
        let t = params.plaintext_modulus();

        let v1 = vec![3u64, 100, 0, 110];
        let v2 = vec![7u64, 110, 5, 110];
        let ct1 = encrypt_with_rng(&v1, &pk, &mut rng).unwrap();
        let ct2 = encrypt_with_rng(&v2, &pk, &mut rng).unwrap();

        let ct_prod = mult_with_rng(&ct1, &ct2, &pk, &evk, &mut rng).unwrap();
        assert!(ct_prod.is_clear());
        assert_eq!(ct_prod.term_count(), 1);

        let dec = decrypt(&ct_prod, &sk).unwrap();
        for i in 0..4 {
            assert_eq!(dec[i], v1[i] * v2[i] % t);
        }
    }

    #[test]
    fn test_mult_overflow() {
        let (params, sk, pk, _evk, mut rng) = setup(3);
        let t = params.plaintext_modulus();

        let v1 = vec![3u64, 100, 0, 110];
        let v2 = vec![7u64, 110, 5, 110];
        let ct1 = encrypt_with_rng(&v1, &pk, &mut rng).unwrap();
        let ct2 = encrypt_with_rng(&v2, &pk, &mut rng).unwrap();

        let ct_prod = mult_overflow_with_rng(&ct1, &ct2, &pk, &mut rng).unwrap();
        assert!(!ct_prod.is_clear());
        assert_eq!(ct_prod.term_count(), 1);
        assert_eq!(ct_prod.betas[0].len(), 2);

        let dec = decrypt_overflow(&ct_prod, &sk).unwrap();
        for i in 0..4 {
            assert_eq!(dec[i], v1[i] * v2[i] % t);
        }
    }

    #[test]
    fn test_sum_overflow_mixed() {
        let (params, sk, pk, _evk, mut rng) = setup(4);
        let t = params.plaintext_modulus();

        let v1 = vec![3u64, 100];
        let v2 = vec![7u64, 110];
        let v3 = vec![1u64, 12000];
        let ct1 = encrypt_with_rng(&v1, &pk, &mut rng).unwrap();
        let ct2 = encrypt_with_rng(&v2, &pk, &mut rng).unwrap();
        let ct3 = encrypt_with_rng(&v3, &pk, &mut rng).unwrap();

        let prod = mult_overflow_with_rng(&ct1, &ct2, &pk, &mut rng).unwrap();
        let mixed = sum_overflow(&prod, &ct3).unwrap();
        assert_eq!(mixed.term_count(), 2);

        let dec = decrypt_overflow(&mixed, &sk).unwrap();
        for i in 0..2 {
            assert_eq!(dec[i], (v1[i] * v2[i] + v3[i]) % t);
        }
    }

    #[test]
    fn test_sum_overflow_ciphertext_concatenates() {
        let (params, sk, pk, _evk, mut rng) = setup(5);
        let t = params.plaintext_modulus();

        let v1 = vec![3u64, 50];
        let v2 = vec![7u64, 60];
        let v3 = vec![11u64, 70];
        let ct1 = encrypt_with_rng(&v1, &pk, &mut rng).unwrap();
        let ct2 = encrypt_with_rng(&v2, &pk, &mut rng).unwrap();
        let ct3 = encrypt_with_rng(&v3, &pk, &mut rng).unwrap();

        let p12 = mult_overflow_with_rng(&ct1, &ct2, &pk, &mut rng).unwrap();
        let p13 = mult_overflow_with_rng(&ct1, &ct3, &pk, &mut rng).unwrap();
        let total = sum_overflow_ciphertext(&p12, &p13).unwrap();

        assert_eq!(total.term_count(), 2);
        assert_eq!(total.betas[0].len(), 2);
        assert_eq!(total.betas[1].len(), 2);

        let dec = decrypt_overflow(&total, &sk).unwrap();
        for i in 0..2 {
            assert_eq!(dec[i], (v1[i] * v2[i] + v1[i] * v3[i]) % t);
        }
    }

    #[test]
    fn test_shape_mismatch_fails_fast() {
        let params = compact_params().unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(6);
        let (_sk, pk) = gen_key_pair_with_rng(&params, &mut rng).unwrap();

        let ct1 = encrypt_with_rng(&[1, 2], &pk, &mut rng).unwrap();
        let ct2 = encrypt_with_rng(&[3, 4], &pk, &mut rng).unwrap();

        let overflow = mult_overflow_with_rng(&ct1, &ct2, &pk, &mut rng).unwrap();
        assert!(sum(&overflow, &ct2).is_err());
        assert!(sum_overflow(&ct1, &ct2).is_err());
        assert!(sum_overflow_ciphertext(&ct1, &overflow).is_err());
    }
}
