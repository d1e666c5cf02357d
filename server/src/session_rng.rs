use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Randomness used by matchmaking: opponent choice and who moves first.
pub struct MatchRng {
    rng: StdRng,
    seed: u64,
}

impl MatchRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    pub fn from_random() -> Self {
        let seed: u64 = rand::rng().random();
        Self::new(seed)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform index into a non-empty collection of `len` items.
    pub fn pick_index(&mut self, len: usize) -> usize {
        self.rng.random_range(0..len)
    }

    pub fn coin_flip(&mut self) -> bool {
        self.rng.random_bool(0.5)
    }
}
