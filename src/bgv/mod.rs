pub mod encoding;
pub mod encrypt;
pub mod eval;
pub mod keygen;
pub mod keyswitch;

pub use encoding::{SlotEncoder, encode_slots, decode_slots};
pub use encrypt::{encrypt_pk, encrypt_sk, decrypt};
pub use eval::{bgv_add, bgv_sub, bgv_neg, bgv_plain_add, bgv_plain_mul, bgv_mul_and_relin, bgv_apply_automorphism, bgv_apply_evaluation_key};
pub use keygen::{SecretKey, PublicKey, RelinKey, GaloisKey, EvaluationKey, EvaluationKeySet, KeySwitchKey};

use std::sync::Arc;
use crate::params::BgvParams;
use crate::ring::rns::RnsPoly;

/// A BGV ciphertext: (c0, c1, ..., c_k) where k=1 when fresh, k=2 after
/// multiplication (before relinearization). Decrypts as Σ c_i·s^i mod t.
#[derive(Clone, Debug)]
pub struct BgvCiphertext {
    /// Ciphertext components in RNS/NTT form.
    pub c: Vec<RnsPoly>,
    /// Associated parameters.
    pub params: Arc<BgvParams>,
}

impl BgvCiphertext {
    pub fn degree(&self) -> usize {
        self.c.len() - 1
    }
}
