//! Internal random number generator implementation based on PCG32.
//!
//! This module provides a minimal, high-quality PRNG that replaces a `rand`
//! crate dependency. Randomness is needed in exactly three places (emotion
//! selection, room-code generation, and the solo-mode opponent simulation),
//! none of which requires cryptographic strength, and all of which benefit
//! from deterministic seeding in tests.
//!
//! # PCG32 Algorithm
//!
//! PCG (Permuted Congruential Generator) is a family of simple fast
//! space-efficient statistically good algorithms for random number
//! generation. PCG32 has 64 bits of state, produces 32-bit output, and has a
//! period of 2^64.
//!
//! Reference: <https://www.pcg-random.org/>

/// PCG32 random number generator.
///
/// A minimal implementation of the PCG-XSH-RR variant with 64-bit state.
/// Suitable for game logic, but NOT cryptographically secure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pcg32 {
    state: u64,
    inc: u64,
}

/// Default increment for single-stream PCG32.
/// This is a standard value from the PCG paper.
const PCG_DEFAULT_INCREMENT: u64 = 1442695040888963407;

/// Multiplier constant for the LCG step.
/// This is the standard multiplier for 64-bit state PCG.
const PCG_MULTIPLIER: u64 = 6364136223846793005;

impl Pcg32 {
    /// Creates a new PCG32 generator with the given state and stream.
    ///
    /// The increment must be odd; it is made odd by shifting and OR-ing with 1.
    #[must_use]
    pub const fn new(state: u64, stream: u64) -> Self {
        let inc = (stream << 1) | 1;
        // Standard PCG seeding: start at 0, step, add the seed, step again.
        let mut pcg = Self { state: 0, inc };
        pcg.state = pcg.state.wrapping_mul(PCG_MULTIPLIER).wrapping_add(pcg.inc);
        pcg.state = pcg.state.wrapping_add(state);
        pcg.state = pcg.state.wrapping_mul(PCG_MULTIPLIER).wrapping_add(pcg.inc);
        pcg
    }

    /// Creates a new generator seeded from a 64-bit value.
    ///
    /// Different seeds produce different (statistically independent)
    /// sequences, which makes solo-mode simulations reproducible in tests.
    #[must_use]
    pub const fn seed_from_u64(seed: u64) -> Self {
        Self::new(seed, PCG_DEFAULT_INCREMENT)
    }

    /// Creates a new generator with a seed derived from wall-clock timing.
    ///
    /// Sufficient entropy for game PRNGs, NOT cryptographically secure.
    #[must_use]
    pub fn from_entropy() -> Self {
        let nanos = web_time::SystemTime::now()
            .duration_since(web_time::UNIX_EPOCH)
            .map(|d| d.subsec_nanos() as u64 ^ (d.as_secs() << 20))
            .unwrap_or(PCG_DEFAULT_INCREMENT);
        Self::seed_from_u64(nanos)
    }

    /// Generates the next 32-bit random value.
    #[inline]
    #[must_use]
    pub fn next_u32(&mut self) -> u32 {
        let old_state = self.state;
        self.state = old_state
            .wrapping_mul(PCG_MULTIPLIER)
            .wrapping_add(self.inc);
        // Output via XSH-RR (xor-shift, random rotate)
        let xorshifted = (((old_state >> 18) ^ old_state) >> 27) as u32;
        let rot = (old_state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }

    /// Generates a random `u32` in `[low, high)` using rejection sampling to
    /// avoid modulo bias.
    ///
    /// # Empty Range Behavior
    /// If `range.is_empty()`, returns `range.start`. Configuration validation
    /// keeps empty ranges out of all in-crate call sites.
    #[must_use]
    pub fn gen_range(&mut self, range: std::ops::Range<u32>) -> u32 {
        let span = range.end.wrapping_sub(range.start);
        if span == 0 {
            return range.start;
        }
        // Reject values in the biased tail of the u32 domain.
        let zone = u32::MAX - (u32::MAX % span);
        loop {
            let value = self.next_u32();
            if value < zone {
                return range.start + (value % span);
            }
        }
    }

    /// Generates a random `f64` in `[0.0, 1.0)` with 32 bits of precision.
    #[inline]
    #[must_use]
    pub fn gen_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / (f64::from(u32::MAX) + 1.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = Pcg32::seed_from_u64(42);
        let mut b = Pcg32::seed_from_u64(42);
        for _ in 0..100 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = Pcg32::seed_from_u64(1);
        let mut b = Pcg32::seed_from_u64(2);
        let a_vals: Vec<u32> = (0..8).map(|_| a.next_u32()).collect();
        let b_vals: Vec<u32> = (0..8).map(|_| b.next_u32()).collect();
        assert_ne!(a_vals, b_vals);
    }

    #[test]
    fn gen_range_stays_in_bounds() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..1000 {
            let v = rng.gen_range(3..9);
            assert!((3..9).contains(&v));
        }
    }

    #[test]
    fn gen_range_covers_all_values() {
        let mut rng = Pcg32::seed_from_u64(99);
        let mut seen = [false; 5];
        for _ in 0..200 {
            seen[rng.gen_range(0..5) as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn gen_range_empty_returns_start() {
        let mut rng = Pcg32::seed_from_u64(0);
        assert_eq!(rng.gen_range(5..5), 5);
    }

    #[test]
    fn gen_f64_is_unit_interval() {
        let mut rng = Pcg32::seed_from_u64(13);
        for _ in 0..1000 {
            let v = rng.gen_f64();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn from_entropy_produces_distinct_generators() {
        // Two entropy-seeded generators created back to back may collide on
        // coarse clocks; accept equality of seeds but require working output.
        let mut rng = Pcg32::from_entropy();
        let _ = rng.next_u32();
    }
}
