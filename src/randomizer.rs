//! Uniform piece randomizer
//!
//! Every spawn draws one of the 7 shapes with equal probability. The source is
//! a trait so a game can be driven by a fixed sequence instead.

use crate::tetromino::ShapeType;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Supplies the shape of each newly spawned tetromino
pub trait ShapeSource {
    fn next_shape(&mut self) -> ShapeType;
}

impl<F> ShapeSource for F
where
    F: FnMut() -> ShapeType,
{
    fn next_shape(&mut self) -> ShapeType {
        self()
    }
}

/// Uniform random shapes from a seedable generator
#[derive(Debug, Clone)]
pub struct RandomShapes {
    rng: ChaCha8Rng,
}

impl Default for RandomShapes {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomShapes {
    /// Create a randomizer seeded from OS entropy
    pub fn new() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    /// Create a randomizer with a specific seed (reproducible sequence)
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl ShapeSource for RandomShapes {
    fn next_shape(&mut self) -> ShapeType {
        ShapeType::ALL[self.rng.gen_range(0..ShapeType::ALL.len())]
    }
}
