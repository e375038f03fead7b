//! RNG module - uniform random piece generation
//!
//! Every draw is independent and uniform over the seven kinds. There is no
//! bag: the same kind can come up several times in a row.
//!
//! Seeded generators are fully deterministic, which the tests rely on.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::types::PieceKind;

/// Source of random piece kinds.
#[derive(Debug, Clone)]
pub struct PieceGenerator {
    rng: StdRng,
}

impl PieceGenerator {
    /// Deterministic generator for the given seed.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generator seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Draw one kind uniformly at random.
    pub fn random_kind(&mut self) -> PieceKind {
        PieceKind::ALL[self.rng.gen_range(0..PieceKind::ALL.len())]
    }
}

impl Default for PieceGenerator {
    fn default() -> Self {
        Self::from_entropy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = PieceGenerator::from_seed(12345);
        let mut b = PieceGenerator::from_seed(12345);
        for _ in 0..50 {
            assert_eq!(a.random_kind(), b.random_kind());
        }
    }

    #[test]
    fn every_kind_shows_up() {
        let mut gen = PieceGenerator::from_seed(7);
        let mut seen = [false; 7];
        for _ in 0..500 {
            let kind = gen.random_kind();
            let idx = PieceKind::ALL.iter().position(|&k| k == kind).unwrap();
            seen[idx] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn repeats_are_possible() {
        // Independent draws: over a long run at least one kind repeats back-to-back.
        let mut gen = PieceGenerator::from_seed(99);
        let mut prev = gen.random_kind();
        let mut repeated = false;
        for _ in 0..500 {
            let next = gen.random_kind();
            if next == prev {
                repeated = true;
                break;
            }
            prev = next;
        }
        assert!(repeated);
    }
}
