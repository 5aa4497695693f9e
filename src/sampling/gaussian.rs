use rand::Rng;

/// Sample a vector of signed coefficients from a discrete Gaussian
/// distribution (standard deviation `sigma`, centered at 0).
///
/// The signed form is the one the RNS lift wants: a coefficient -3 must
/// become q_i - 3 in every component, which `RnsPoly::from_signed_coeffs`
/// takes care of.
pub fn sample_gaussian_vec<R: Rng>(n: usize, sigma: f64, rng: &mut R) -> Vec<i64> {
    (0..n).map(|_| sample_discrete_gaussian(sigma, rng)).collect()
}

/// Sample a single value from the discrete Gaussian distribution over Z
/// with standard deviation σ, centered at 0.
///
/// Uses a constant-time CDT (cumulative distribution table) approach for
/// small σ. For σ = 3.2, we only need to consider values in [-20, 20].
///
/// The scan is branchless: every CDF entry is visited and a conditional
/// select (using bitwise ops on integer masks) determines the result,
/// avoiding data-dependent branches that could leak timing information.
pub fn sample_discrete_gaussian<R: Rng>(sigma: f64, rng: &mut R) -> i64 {
    let tail = (6.0 * sigma).ceil() as i64;

    // CDT: precompute cumulative probabilities (unnormalized)
    let table_size = (2 * tail + 1) as usize;
    let mut cdf = Vec::with_capacity(table_size);
    let mut cumulative = 0.0f64;
    let two_sigma_sq = 2.0 * sigma * sigma;

    for x in -tail..=tail {
        let prob = (-((x * x) as f64) / two_sigma_sq).exp();
        cumulative += prob;
        cdf.push(cumulative);
    }

    let total = cumulative;
    let u: f64 = rng.random::<f64>() * total;

    // Branchless scan: iterate in reverse, always selecting the lowest
    // index i where u < cdf[i].
    let mut result = tail;
    for i in (0..table_size).rev() {
        let cmp = u < cdf[i];
        let mask = (cmp as i64).wrapping_neg(); // 0 → 0, 1 → -1 (all bits set)
        let candidate = -tail + i as i64;
        result = (candidate & mask) | (result & !mask);
    }

    result
}
