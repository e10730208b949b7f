//! Deterministic random number generator for rolling
//!
//! xorshift64, seedable and serializable, so a generation run can be
//! reproduced exactly from a seed (or resumed from a saved state) on any
//! platform. Engine code never reaches for OS entropy.

use serde::{Deserialize, Serialize};

/// Deterministic RNG driving the sampling engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LootRng {
    state: u64,
}

impl LootRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u64) -> Self {
        // xorshift cannot leave the all-zero state
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Get the current state, for saving mid-run
    pub fn state(&self) -> u64 {
        self.state
    }

    /// Generate the next raw u64 value
    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Generate a random f64 in range [0, 1)
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() as f64) / (u64::MAX as f64 + 1.0)
    }
}

impl Default for LootRng {
    fn default() -> Self {
        Self::new(0x10_07)
    }
}
