//! Deterministic random number generation.
//!
//! RULE: Nothing in the engine may call a platform RNG.
//! The only randomness is the optional scenario shuffle, and it is driven
//! by a seed stored on the session so a restored session replays the
//! exact same order.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

/// Stream index for the scenario order. Append new streams after it.
const SCENARIO_ORDER_STREAM: u64 = 0;

pub struct SessionRng {
    inner: Pcg64Mcg,
}

impl SessionRng {
    /// The stream used to order scenarios for a given session seed.
    pub fn scenario_order(seed: u64) -> Self {
        Self::new(seed, SCENARIO_ORDER_STREAM)
    }

    fn new(master_seed: u64, stream: u64) -> Self {
        let derived_seed = master_seed ^ (stream.wrapping_mul(0x9e37_79b9_7f4a_7c15));
        Self {
            inner: Pcg64Mcg::seed_from_u64(derived_seed),
        }
    }

    /// Roll a u64 in [0, n).
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        assert!(n > 0, "n must be > 0");
        self.inner.next_u64() % n
    }

    /// Fisher–Yates shuffle in place.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.next_u64_below(i as u64 + 1) as usize;
            items.swap(i, j);
        }
    }
}
