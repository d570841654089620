//! Production RNG.

use rand::Rng;
use warmarch_core::rng::DeterministicRng;

/// Production random source backed by the thread-local generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRng;

impl DeterministicRng for SystemRng {
    /// # Panics
    ///
    /// Panics if `min > max`.
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32 {
        rand::rng().random_range(min..=max)
    }
}
