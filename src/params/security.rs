/// Security budget checks against the homomorphicencryption.org standard
/// (ternary secret, classical attacks, 128-bit target).
///
/// The table maps ring degree N to the largest total modulus log2(Q·P)
/// that still reaches 128 bits. The key material is as wide as Q·P, so
/// the special-prime sizes of the parameter literal count toward the
/// budget even though key switching decomposes over Q alone.
const MAX_LOG_QP_128: [(usize, usize); 6] = [
    (1024, 27),
    (2048, 54),
    (4096, 109),
    (8192, 218),
    (16384, 438),
    (32768, 881),
];

/// Largest log2(Q·P) meeting 128-bit security for `ring_degree`, if the
/// degree is in the standard table.
pub fn max_log_qp_128(ring_degree: usize) -> Option<usize> {
    MAX_LOG_QP_128.iter()
        .find(|&&(n, _)| n == ring_degree)
        .map(|&(_, bits)| bits)
}

/// Whether the given total modulus size meets the 128-bit bound.
pub fn meets_128_bit_security(ring_degree: usize, log_qp: usize) -> bool {
    match max_log_qp_128(ring_degree) {
        Some(bound) => log_qp <= bound,
        None => false,
    }
}
