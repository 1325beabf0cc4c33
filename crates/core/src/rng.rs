//! RNG module - deterministic shape generation
//!
//! Provides a simple LCG for reproducible sessions and a shape drawer that
//! produces uniformly distributed shape indices over the configured palette.
//! Every source of randomness in a session (initial fill, refill, rerolls,
//! random task generation) draws from one `ShapeRng` stream, so a seed fully
//! determines a session.

use trimatch_types::ShapeId;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        self.next_u32() % max
    }

    /// Current internal state (for restarting a session with the same stream)
    pub fn state(&self) -> u32 {
        self.state
    }
}

/// Uniform shape drawer over a configured palette size
#[derive(Debug, Clone)]
pub struct ShapeRng {
    rng: SimpleRng,
    shape_count: u8,
}

impl ShapeRng {
    /// Create a drawer over `shape_count` shapes with the given seed
    pub fn new(seed: u32, shape_count: u8) -> Self {
        Self {
            rng: SimpleRng::new(seed),
            shape_count,
        }
    }

    /// Draw a uniformly random shape from the palette
    pub fn draw(&mut self) -> ShapeId {
        ShapeId(self.rng.next_range(self.shape_count as u32) as u8)
    }

    /// Uniform value in the inclusive range [min, max]
    pub fn range_inclusive(&mut self, min: u32, max: u32) -> u32 {
        min + self.rng.next_range(max - min + 1)
    }

    /// Number of shapes in the palette
    pub fn shape_count(&self) -> u8 {
        self.shape_count
    }

    /// Current RNG state
    pub fn state(&self) -> u32 {
        self.rng.state()
    }
}

impl Default for ShapeRng {
    fn default() -> Self {
        Self::new(1, trimatch_types::DEFAULT_SHAPE_COUNT)
    }
}
