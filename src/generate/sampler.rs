//! Normal-variate sources for the generator.

use nalgebra::DMatrix;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use rand_xoshiro::Xoshiro256PlusPlus;

/// Source of independent standard normal draws.
///
/// The generator only needs raw `N(0, 1)` noise; the exact-moment
/// correction that follows removes whatever sample structure the draw has.
pub trait Sampler {
    /// An `rows × cols` matrix of independent standard normal variates.
    fn standard_normal(&mut self, rows: usize, cols: usize) -> DMatrix<f64>;
}

/// Seeded xoshiro256++ sampler. Same seed, same draw.
#[derive(Debug, Clone)]
pub struct XoshiroSampler {
    rng: Xoshiro256PlusPlus,
}

impl XoshiroSampler {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
        }
    }
}

impl Sampler for XoshiroSampler {
    fn standard_normal(&mut self, rows: usize, cols: usize) -> DMatrix<f64> {
        DMatrix::from_fn(rows, cols, |_, _| self.rng.sample::<f64, _>(StandardNormal))
    }
}
