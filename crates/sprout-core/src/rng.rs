//! Deterministic PRNG for restock allocation.
//!
//! Uses the SplitMix64 algorithm: fast, 8 bytes of state, excellent
//! statistical properties, and trivially serializable. Seeding it explicitly
//! makes shop composition reproducible in tests.

/// SplitMix64 pseudo-random number generator.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SimRng {
    state: u64,
}

impl SimRng {
    /// Create a new RNG with the given seed.
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Generate the next `u64` in the sequence.
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform value in `[0, bound)`. Returns 0 when `bound` is 0.
    ///
    /// Uses the widening-multiply reduction, which keeps bias below 2^-32
    /// for the small bounds used here.
    pub fn below(&mut self, bound: u64) -> u64 {
        if bound == 0 {
            return 0;
        }
        ((self.next_u64() as u128 * bound as u128) >> 64) as u64
    }

    /// Uniform value in the inclusive range `[lo, hi]`.
    ///
    /// - `lo > hi` returns `lo`
    pub fn range_inclusive(&mut self, lo: u32, hi: u32) -> u32 {
        if lo >= hi {
            return lo;
        }
        let span = (hi - lo) as u64 + 1;
        lo + self.below(span) as u32
    }

    /// Draw `count` elements without replacement. Order of the result is the
    /// draw order. `count` is capped at the pool size.
    pub fn sample<T: Copy>(&mut self, pool: &[T], count: usize) -> Vec<T> {
        let mut scratch = pool.to_vec();
        let count = count.min(scratch.len());
        for i in 0..count {
            let remaining = (scratch.len() - i) as u64;
            let j = i + self.below(remaining) as usize;
            scratch.swap(i, j);
        }
        scratch.truncate(count);
        scratch
    }

    /// Get the internal state (for hashing/serialization).
    pub fn state(&self) -> u64 {
        self.state
    }
}
