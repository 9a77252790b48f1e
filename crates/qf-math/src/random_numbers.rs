//! Random number generators.
//!
//! Sampling routines take their random source as an explicit `&mut R where
//! R: Rng`, so any `rand` generator works. [`MersenneTwisterRng`] is the
//! seeded default used for reproducible simulations.

use rand::{RngCore, SeedableRng};
use rand_mt::Mt19937GenRand64;

/// A pseudo-random generator based on the Mersenne Twister MT19937-64
/// algorithm, exposed through the `rand` traits.
#[derive(Clone)]
pub struct MersenneTwisterRng {
    rng: Mt19937GenRand64,
}

impl MersenneTwisterRng {
    /// Create a new generator with the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mt19937GenRand64::new(seed),
        }
    }
}

impl std::fmt::Debug for MersenneTwisterRng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("MersenneTwisterRng")
    }
}

impl RngCore for MersenneTwisterRng {
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.rng.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.rng.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for MersenneTwisterRng {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u64::from_le_bytes(seed))
    }

    fn seed_from_u64(state: u64) -> Self {
        Self::new(state)
    }
}
