pub mod gaussian;
pub mod uniform;

pub use gaussian::{sample_discrete_gaussian, sample_gaussian_vec};
pub use uniform::{rand_uniform, uniform_mask, sample_uniform_rns, sample_ternary_vec};

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::error::{LabheError, Result};

/// Fresh OS-seeded ChaCha20 generator, acquired per call; seeding
/// failures surface as `Randomness` instead of panicking.
pub fn os_rng() -> Result<ChaCha20Rng> {
    ChaCha20Rng::try_from_os_rng().map_err(|e| LabheError::Randomness(e.to_string()))
}
