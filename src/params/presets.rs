use std::sync::Arc;
use crate::error::Result;
use crate::params::{BgvParams, BgvParamsBuilder};

/// Compact parameters for fast tests and examples (not secure).
///
/// N=1024, t=12289 (prime, ≡ 1 mod 2048, so all 1024 slots are live),
/// two NTT primes of 40 and 50 bits for Q ≈ 2^90. Enough headroom for
/// one relinearized multiplication plus the labeled layer's
/// plaintext-product terms.
pub fn compact_params() -> Result<Arc<BgvParams>> {
    BgvParamsBuilder::new()
        .ring_degree(1024)
        .plain_modulus(12289)
        // 40-bit NTT prime: 1099509805057 ≡ 1 mod 2048
        // 50-bit NTT prime: 562949953443841 ≡ 1 mod 2048
        .ct_moduli(vec![1099509805057, 562949953443841])
        .sigma(3.2)
        .build()
}

/// The reference parameter set of the scheme's examples:
/// logN=14, logQ=[56,55,55,54,54,54], logP=[55,55], t=0x3ee0001.
///
/// logQP = 438 bits, the HE-standard 128-bit bound for N=2^14 with a
/// ternary secret. Supports the full depth of the labeled layer: a
/// re-randomised multiplication feeding an overflow multiplication.
pub fn reference_params() -> Result<Arc<BgvParams>> {
    BgvParamsBuilder::from_literal(14, &[56, 55, 55, 54, 54, 54], &[55, 55], 0x3ee0001)
}
