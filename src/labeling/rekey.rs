use rayon::prelude::*;

use crate::bgv::eval::bgv_apply_evaluation_key;
use crate::bgv::keygen::EvaluationKey;
use crate::bgv::BgvCiphertext;
use crate::error::Result;
use crate::labeling::{Label, LabeledCiphertext};

/// Re-encrypt a clear-shape ciphertext under another secret key.
///
/// The clear label is plaintext and key-independent, so it is kept
/// verbatim; only the beta goes through the key switch. The result
/// decrypts under the destination key of `ek`.
pub fn apply_evaluation_key(
    ct: &LabeledCiphertext,
    ek: &EvaluationKey,
) -> Result<LabeledCiphertext> {
    let labels = ct.clear_label()?.to_vec();
    let beta = bgv_apply_evaluation_key(ct.single_beta()?, ek)?;

    Ok(LabeledCiphertext {
        label: Label::Clear(labels),
        betas: vec![vec![beta]],
        params: ct.params.clone(),
    })
}

/// Re-encrypt an encrypted-shape ciphertext under another secret key:
/// α and every beta of every term are key-switched.
pub fn apply_evaluation_key_overflow(
    ct: &LabeledCiphertext,
    ek: &EvaluationKey,
) -> Result<LabeledCiphertext> {
    let alpha = bgv_apply_evaluation_key(ct.encrypted_label()?, ek)?;
    let betas = switch_bundle(&ct.betas, ek)?;

    Ok(LabeledCiphertext {
        label: Label::Encrypted(alpha),
        betas,
        params: ct.params.clone(),
    })
}

fn switch_bundle(
    betas: &[Vec<BgvCiphertext>],
    ek: &EvaluationKey,
) -> Result<Vec<Vec<BgvCiphertext>>> {
    betas.par_iter()
        .map(|term| {
            term.iter()
                .map(|beta| bgv_apply_evaluation_key(beta, ek))
                .collect::<Result<Vec<_>>>()
        })
        .collect()
}
