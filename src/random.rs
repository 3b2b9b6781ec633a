use rand::Rng;

const MULTIPLIER_A: i64 = 1103515245;
const INCREMENT_C: i64 = 12345;
const DEFAULT_SEED: i64 = 3819201;

/// Source of randomness for the search.
///
/// The search only needs uniform integers; everything else is derived from `next_range`.
pub trait RandomGenerator: Default {
    fn next(&mut self) -> i32;

    /// Returns a value in `from..to`.
    fn next_range(&mut self, from: i32, to: i32) -> i32;

    /// Shuffles `items` in place with a uniform Fisher-Yates permutation.
    fn shuffle<K>(&mut self, items: &mut [K]) {
        for i in (1..items.len()).rev() {
            let j = self.next_range(0, i as i32 + 1) as usize;
            items.swap(i, j);
        }
    }
}

/// Thread-local OS-seeded randomness. A different permutation on every call.
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardRandomGenerator;

impl RandomGenerator for StandardRandomGenerator {
    fn next(&mut self) -> i32 {
        rand::random()
    }

    fn next_range(&mut self, from: i32, to: i32) -> i32 {
        rand::rng().random_range(from..to)
    }
}

/// A tiny seeded linear congruential generator, used where runs must be reproducible.
#[derive(Debug, Clone)]
pub struct CustomNumberGenerator {
    seed: i64,
}

impl Default for CustomNumberGenerator {
    fn default() -> Self {
        CustomNumberGenerator::new(DEFAULT_SEED)
    }
}

impl RandomGenerator for CustomNumberGenerator {
    fn next(&mut self) -> i32 {
        self.seed = self
            .seed
            .wrapping_mul(MULTIPLIER_A)
            .wrapping_add(INCREMENT_C)
            % (i32::MAX as i64);
        self.seed as i32
    }

    fn next_range(&mut self, from: i32, to: i32) -> i32 {
        (self.next() % (to - from)).abs() + from
    }
}

impl CustomNumberGenerator {
    pub const fn new(seed: i64) -> Self {
        Self { seed }
    }
}

#[cfg(test)]
mod tests {
    use crate::random::{CustomNumberGenerator, RandomGenerator, StandardRandomGenerator};

    #[test]
    fn same_seed_gives_same_sequence() {
        let mut first = CustomNumberGenerator::new(42);
        let mut second = CustomNumberGenerator::new(42);
        for _ in 0..16 {
            assert_eq!(first.next_range(0, 10), second.next_range(0, 10));
        }
    }

    #[test]
    fn large_seeds_wrap_instead_of_overflowing() {
        let mut crg = CustomNumberGenerator::new(i64::MAX - 7);
        for _ in 0..100 {
            let value = crg.next_range(0, 9);
            assert!((0..9).contains(&value));
        }
    }

    #[test]
    fn next_range_stays_in_bounds() {
        let mut crg = CustomNumberGenerator::default();
        for _ in 0..1000 {
            let value = crg.next_range(3, 9);
            assert!((3..9).contains(&value));
        }
    }

    #[test]
    fn shuffle_is_a_permutation() {
        // arrange
        let mut items: Vec<u8> = (0..9).collect();

        // act
        CustomNumberGenerator::new(7).shuffle(&mut items);

        // assert
        let mut sorted = items.clone();
        sorted.sort();
        assert_eq!(sorted, (0..9).collect::<Vec<u8>>());
    }

    #[test]
    fn shuffle_reaches_every_position() {
        // the last element must be able to land anywhere, including where it started
        let mut crg = CustomNumberGenerator::default();
        let mut seen = [false; 4];
        for _ in 0..400 {
            let mut items = [0, 1, 2, 3];
            crg.shuffle(&mut items);
            let position = items.iter().position(|&item| item == 3).unwrap_or_default();
            seen[position] = true;
        }
        assert_eq!(seen, [true; 4]);
    }

    #[test]
    fn shuffle_handles_tiny_slices() {
        let mut empty: [u8; 0] = [];
        StandardRandomGenerator.shuffle(&mut empty);

        let mut single = [5];
        StandardRandomGenerator.shuffle(&mut single);
        assert_eq!(single, [5]);
    }
}
