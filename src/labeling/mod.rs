pub mod encrypt;
pub mod eval;
pub mod label;
pub mod rekey;
pub mod rotate;

pub use encrypt::{encrypt, encrypt_with_rng, decrypt, decrypt_overflow};
pub use eval::{
    sum, mult, mult_with_rng, mult_overflow, mult_overflow_with_rng,
    sum_overflow, sum_overflow_ciphertext,
};
pub use label::{sample_small_vector, small_label_bound};
pub use rekey::{apply_evaluation_key, apply_evaluation_key_overflow};
pub use rotate::{rotate_columns, rotate_columns_overflow, rotate_rows, rotate_rows_overflow};

use std::sync::Arc;

use crate::bgv::BgvCiphertext;
use crate::error::{LabheError, Result};
use crate::params::BgvParams;

/// The label component of a labeled ciphertext.
///
/// A fresh encryption carries its label in the clear: the message is
/// split as m = a + Dec(β) and only the mask b travels encrypted. Once an
/// operation can no longer keep the label public (an overflow
/// multiplication, or any sum touching such a result), the label itself
/// becomes a BGV ciphertext α.
#[derive(Clone, Debug)]
pub enum Label {
    /// Public slot vector a ∈ Z_t^n.
    Clear(Vec<u64>),
    /// Encrypted label α.
    Encrypted(BgvCiphertext),
}

/// A labeled ciphertext: the label in one of its two shapes, plus the
/// beta bundle.
///
/// The bundle is a list of terms, each term a list of factors: terms are
/// additive, factors within a term multiplicative. The semantic contract
/// under secret key sk is
///
///   clear:     a[i] + Dec(β)[i]                        ≡ m[i]  (mod t)
///   encrypted: Dec(α)[i] + Σ_term Π_{β ∈ term} Dec(β)[i] ≡ m[i]  (mod t)
///
/// Fresh encryptions have a single term with a single factor. Overflow
/// multiplication produces one term with two factors; overflow sums
/// concatenate bundles. Values are never mutated in place.
#[derive(Clone, Debug)]
pub struct LabeledCiphertext {
    pub label: Label,
    pub betas: Vec<Vec<BgvCiphertext>>,
    pub params: Arc<BgvParams>,
}

impl LabeledCiphertext {
    /// Whether the label is still public.
    pub fn is_clear(&self) -> bool {
        matches!(self.label, Label::Clear(_))
    }

    /// Number of additive terms in the beta bundle.
    pub fn term_count(&self) -> usize {
        self.betas.len()
    }

    /// The clear label, or a shape error.
    pub fn clear_label(&self) -> Result<&[u64]> {
        match &self.label {
            Label::Clear(a) => Ok(a),
            Label::Encrypted(_) => Err(LabheError::ShapeMismatch(
                "expected a clear label, found an encrypted one".into()
            )),
        }
    }

    /// The encrypted label, or a shape error.
    pub fn encrypted_label(&self) -> Result<&BgvCiphertext> {
        match &self.label {
            Label::Encrypted(alpha) => Ok(alpha),
            Label::Clear(_) => Err(LabheError::ShapeMismatch(
                "expected an encrypted label, found a clear one".into()
            )),
        }
    }

    /// The unique beta of a clear-shape ciphertext (|B| = 1, |B[0]| = 1),
    /// or a shape error.
    pub fn single_beta(&self) -> Result<&BgvCiphertext> {
        if self.betas.len() == 1 && self.betas[0].len() == 1 {
            Ok(&self.betas[0][0])
        } else {
            Err(LabheError::ShapeMismatch(format!(
                "expected a single beta, found {} term(s)",
                self.betas.len()
            )))
        }
    }
}
