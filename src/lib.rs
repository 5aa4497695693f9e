//! # Labhe: Labeled Homomorphic Encryption over BGV
//!
//! Implements the labeled-ciphertext construction of Catalano–Fiore /
//! DPSZ on top of an RNS BGV core: a message m is split as
//! m = a + Dec(β), where the label a is public information carried in
//! the clear and β encrypts a random √t-bounded mask.
//!
//! Keeping one factor of every product in the clear turns half of a
//! homomorphic multiplication into cheap plaintext products, stretching
//! the usable multiplicative depth of the underlying scheme. When a
//! label can no longer stay public (overflow operations), it becomes a
//! BGV ciphertext α and the beta bundle grows into a list of additive
//! terms of multiplicative factors.
//!
//! ## Quick Start
//!
//! ```no_run
//! use labhe::prelude::*;
//!
//! // Compact parameters (fast, not secure; see presets for the
//! // reference 128-bit set)
//! let params = labhe::params::presets::compact_params().unwrap();
//!
//! // Generate keys
//! let (sk, pk) = gen_key_pair(&params).unwrap();
//! let rlk = gen_relin_key(&sk).unwrap();
//! let evk = EvaluationKeySet::new(rlk);
//!
//! // Encrypt slot vectors
//! let ct1 = labhe::labeling::encrypt(&[10, 20, 30], &pk).unwrap();
//! let ct2 = labhe::labeling::encrypt(&[1, 2, 3], &pk).unwrap();
//!
//! // Multiply homomorphically (clear-label shape, re-randomised)
//! let prod = labhe::labeling::mult(&ct1, &ct2, &pk, &evk).unwrap();
//!
//! // Decrypt
//! let values = labhe::labeling::decrypt(&prod, &sk).unwrap();
//! assert_eq!(&values[..3], &[10, 40, 90]);
//! ```

pub mod error;
pub mod params;
pub mod ring;
pub mod sampling;
pub mod bgv;
pub mod labeling;

/// Convenient re-exports for common types and functions.
pub mod prelude {
    pub use crate::error::{LabheError, Result};
    pub use crate::params::{BgvParams, BgvParamsBuilder};
    pub use crate::bgv::BgvCiphertext;
    pub use crate::bgv::keygen::{
        SecretKey, PublicKey, RelinKey, GaloisKey, EvaluationKey, EvaluationKeySet,
        gen_key_pair, gen_secret_key, gen_public_key, gen_relin_key, gen_galois_key,
        gen_galois_keys, gen_evaluation_key,
    };
    pub use crate::labeling::{
        Label, LabeledCiphertext,
        encrypt, decrypt, decrypt_overflow,
        sum, mult, mult_overflow, sum_overflow, sum_overflow_ciphertext,
        rotate_columns, rotate_columns_overflow, rotate_rows, rotate_rows_overflow,
        apply_evaluation_key, apply_evaluation_key_overflow,
    };
}
