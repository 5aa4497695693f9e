use rand::Rng;

use crate::ring::ntt::NttPoly;
use crate::ring::rns::{RnsBasis, RnsPoly};

/// Draw a uniform value in [0, max) by rejection.
///
/// `mask` is a power-of-two-minus-one upper bound on `max`: samples are
/// masked down to the right bit width first, then rejected if ≥ max.
/// Both the small-label sampler and the per-prime uniform polynomials go
/// through this.
pub fn rand_uniform<R: Rng>(max: u64, mask: u64, rng: &mut R) -> u64 {
    loop {
        let val = rng.random::<u64>() & mask;
        if val < max {
            return val;
        }
    }
}

/// Bit mask covering values < `max`: (1 << bitlen(max)) - 1.
pub fn uniform_mask(max: u64) -> u64 {
    if max.is_power_of_two() {
        max - 1
    } else {
        (1u64 << (64 - max.leading_zeros())) - 1
    }
}

/// Sample a polynomial uniform over Z_Q, directly in RNS/NTT form.
///
/// Independently uniform residues per prime are uniform mod Q by CRT, and
/// the NTT is a bijection, so sampling in the evaluation domain is sound
/// and saves the forward transforms.
pub fn sample_uniform_rns<R: Rng>(basis: &RnsBasis, rng: &mut R) -> RnsPoly {
    let components = basis.moduli.iter()
        .zip(basis.plans.iter())
        .map(|(&q, plan)| {
            let mask = uniform_mask(q);
            let evals: Vec<u64> = (0..basis.ring_degree)
                .map(|_| rand_uniform(q, mask, rng))
                .collect();
            NttPoly { evals, modulus: q, plan: plan.clone() }
        })
        .collect();
    RnsPoly {
        components,
        ring_degree: basis.ring_degree,
    }
}

/// Sample signed ternary coefficients {-1, 0, 1}, each with probability 1/3.
pub fn sample_ternary_vec<R: Rng>(n: usize, rng: &mut R) -> Vec<i64> {
    (0..n)
        .map(|_| {
            // Rejection sampling on 2 bits for uniform {0,1,2}
            let val = loop {
                let r = rng.random::<u8>() & 0x03;
                if r < 3 { break r; }
            };
            val as i64 - 1
        })
        .collect()
}
