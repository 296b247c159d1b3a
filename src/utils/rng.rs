//! Seedable random source for question shuffling and share codes.
//!
//! Sessions own a `GameRng` so every restart reshuffles from the same stream,
//! and tests can pin the seed to get reproducible question orders.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
}

impl GameRng {
    /// Create a deterministic RNG from a seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Create an RNG seeded from the operating system.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            inner: ChaCha8Rng::from_os_rng(),
        }
    }

    /// Uniform index in `0..upper`. `upper` must be non-zero.
    pub fn index(&mut self, upper: usize) -> usize {
        self.inner.random_range(0..upper)
    }

    /// Fisher-Yates shuffle in place.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.inner.random_range(0..=i);
            slice.swap(i, j);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_order() {
        let mut a: Vec<u32> = (0..20).collect();
        let mut b = a.clone();
        GameRng::new(7).shuffle(&mut a);
        GameRng::new(7).shuffle(&mut b);
        assert_eq!(a, b);
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let mut values: Vec<u32> = (0..50).collect();
        GameRng::new(99).shuffle(&mut values);
        let mut sorted = values.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn shuffle_handles_tiny_slices() {
        let mut rng = GameRng::new(1);
        let mut empty: Vec<u8> = Vec::new();
        rng.shuffle(&mut empty);
        let mut one = vec![42];
        rng.shuffle(&mut one);
        assert_eq!(one, vec![42]);
    }

    #[test]
    fn shuffle_moves_elements_for_some_seed() {
        let original: Vec<u32> = (0..10).collect();
        let moved = (0..10u64).any(|seed| {
            let mut v = original.clone();
            GameRng::new(seed).shuffle(&mut v);
            v != original
        });
        assert!(moved);
    }
}
