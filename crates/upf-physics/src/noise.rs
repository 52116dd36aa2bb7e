// ─────────────────────────────────────────────────────────────────────
// Universal Projection Field — Process Noise Source
// ─────────────────────────────────────────────────────────────────────

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::StandardNormal;

/// Seeded Gaussian noise generator, owned by exactly one field core.
///
/// ChaCha8 is platform-independent, so a seed pins the whole trajectory.
#[derive(Debug, Clone)]
pub struct NoiseSource {
    rng: ChaCha8Rng,
}

impl NoiseSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Standard normal draw.
    pub fn next_normal(&mut self) -> f64 {
        self.rng.sample::<f64, _>(StandardNormal)
    }

    /// Zero-mean Gaussian sample with standard deviation `sigma`.
    ///
    /// Always advances the generator, even for `sigma == 0`.
    pub fn gaussian(&mut self, sigma: f64) -> f64 {
        sigma * self.next_normal()
    }
}
