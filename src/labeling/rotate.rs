use rayon::prelude::*;

use crate::bgv::eval::bgv_apply_automorphism;
use crate::bgv::keygen::{EvaluationKeySet, GaloisKey};
use crate::bgv::BgvCiphertext;
use crate::error::Result;
use crate::labeling::{Label, LabeledCiphertext};

/// The BGV column rotation on a plain slot vector: both rows of n/2
/// slots shift left by k, independently.
fn rotate_slot_vector(values: &[u64], k: usize) -> Vec<u64> {
    let n = values.len();
    let h = n / 2;
    let k = k % h;
    (0..n)
        .map(|i| {
            if i < h {
                values[(i + k) % h]
            } else {
                values[h + (i - h + k) % h]
            }
        })
        .collect()
}

/// Swap the two slot rows of a plain vector.
fn swap_slot_rows(values: &[u64]) -> Vec<u64> {
    let h = values.len() / 2;
    let mut out = values[h..].to_vec();
    out.extend_from_slice(&values[..h]);
    out
}

/// Rotate a clear-shape ciphertext by k columns.
///
/// The clear label is permuted directly and the beta rotates under the
/// Galois key for 5^k, so both halves of the decryption invariant move
/// in lockstep. The caller must have loaded that Galois key into the
/// evaluation key set.
pub fn rotate_columns(
    ct: &LabeledCiphertext,
    k: usize,
    evk: &EvaluationKeySet,
) -> Result<LabeledCiphertext> {
    let params = &ct.params;
    let gk = evk.galois_key(params.galois_element_for_col_rotation(k))?;

    let labels = rotate_slot_vector(ct.clear_label()?, k);
    let beta = bgv_apply_automorphism(ct.single_beta()?, gk)?;

    Ok(LabeledCiphertext {
        label: Label::Clear(labels),
        betas: vec![vec![beta]],
        params: params.clone(),
    })
}

/// Rotate an encrypted-shape ciphertext by k columns: α and every beta
/// of every term rotate under the same Galois key. Bundle cardinality is
/// preserved.
pub fn rotate_columns_overflow(
    ct: &LabeledCiphertext,
    k: usize,
    evk: &EvaluationKeySet,
) -> Result<LabeledCiphertext> {
    let params = &ct.params;
    let gk = evk.galois_key(params.galois_element_for_col_rotation(k))?;

    let alpha = bgv_apply_automorphism(ct.encrypted_label()?, gk)?;
    let betas = rotate_bundle(&ct.betas, gk)?;

    Ok(LabeledCiphertext {
        label: Label::Encrypted(alpha),
        betas,
        params: params.clone(),
    })
}

/// Swap the two slot rows of a clear-shape ciphertext.
pub fn rotate_rows(
    ct: &LabeledCiphertext,
    evk: &EvaluationKeySet,
) -> Result<LabeledCiphertext> {
    let params = &ct.params;
    let gk = evk.galois_key(params.galois_element_for_row_rotation())?;

    let labels = swap_slot_rows(ct.clear_label()?);
    let beta = bgv_apply_automorphism(ct.single_beta()?, gk)?;

    Ok(LabeledCiphertext {
        label: Label::Clear(labels),
        betas: vec![vec![beta]],
        params: params.clone(),
    })
}

/// Swap the two slot rows of an encrypted-shape ciphertext.
pub fn rotate_rows_overflow(
    ct: &LabeledCiphertext,
    evk: &EvaluationKeySet,
) -> Result<LabeledCiphertext> {
    let params = &ct.params;
    let gk = evk.galois_key(params.galois_element_for_row_rotation())?;

    let alpha = bgv_apply_automorphism(ct.encrypted_label()?, gk)?;
    let betas = rotate_bundle(&ct.betas, gk)?;

    Ok(LabeledCiphertext {
        label: Label::Encrypted(alpha),
        betas,
        params: params.clone(),
    })
}

/// Rotate every beta of every term; terms are independent, so they go
/// through rayon.
fn rotate_bundle(
    betas: &[Vec<BgvCiphertext>],
    gk: &GaloisKey,
) -> Result<Vec<Vec<BgvCiphertext>>> {
    betas.par_iter()
        .map(|term| {
            term.iter()
                .map(|beta| bgv_apply_automorphism(beta, gk))
                .collect::<Result<Vec<_>>>()
        })
        .collect()
}
