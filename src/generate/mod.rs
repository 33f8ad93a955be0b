//! # Correlated-Data Generator
//!
//! Produces an `ItemMatrix` whose *sample* means and covariance equal the
//! target `CovarianceSpec` to floating-point precision.
//!
//! ```text
//! raw N(0,1) draw ──center──▶ C ──whiten (L_S⁻ᵀ)──▶ W ──colour (V·Λ^½)ᵀ──▶ + μ ──▶ X
//!                              cov(C) = S = L_S·L_Sᵀ   cov(W) = I              cov(X) = Σ
//! ```
//!
//! The colouring factor comes from the symmetric eigendecomposition of the
//! target, so singular positive semi-definite targets are accepted.

pub mod sampler;

pub use sampler::{Sampler, XoshiroSampler};

use nalgebra::{Cholesky, DMatrix, SymmetricEigen};
use tracing::debug;

use crate::model::{CovarianceSpec, ItemMatrix};
use crate::stats;
use crate::{Error, Result};

/// Relative eigenvalue tolerance below zero before a target counts as indefinite.
const PSD_TOLERANCE: f64 = 1e-8;

/// Generate `n` rows with exact sample moments, drawing from a seeded xoshiro stream.
pub fn generate(spec: &CovarianceSpec, n: usize, seed: u64) -> Result<ItemMatrix> {
    let mut sampler = XoshiroSampler::seeded(seed);
    generate_with(spec, n, &mut sampler)
}

/// Generate with a caller-supplied normal source.
pub fn generate_with<S: Sampler + ?Sized>(
    spec: &CovarianceSpec,
    n: usize,
    sampler: &mut S,
) -> Result<ItemMatrix> {
    let k = spec.k();
    if n <= k {
        return Err(Error::InvalidSpec(format!(
            "sample size {n} must exceed the number of variables {k}"
        )));
    }

    let colouring = colouring_factor(spec)?;

    let raw = sampler.standard_normal(n, k);
    if raw.shape() != (n, k) {
        return Err(Error::InvalidSpec(format!(
            "sampler returned a {}x{} draw, expected {n}x{k}",
            raw.nrows(),
            raw.ncols()
        )));
    }

    let centered = stats::center_columns(&raw);
    let sample_cov = (centered.transpose() * &centered) / (n - 1) as f64;
    let chol = Cholesky::new(sample_cov).ok_or_else(|| {
        Error::InvalidSpec("raw draw has a singular sample covariance".into())
    })?;

    // W = C·L⁻ᵀ, computed as (L⁻¹·Cᵀ)ᵀ
    let whitened_t = chol
        .l()
        .solve_lower_triangular(&centered.transpose())
        .ok_or_else(|| Error::InvalidSpec("whitening solve failed".into()))?;

    let mut data = whitened_t.transpose() * colouring.transpose();
    for (j, mu) in spec.means().iter().enumerate() {
        data.column_mut(j).add_scalar_mut(*mu);
    }

    debug!(n, k, "generated exact-moment sample");
    ItemMatrix::from_dmatrix(spec.names(), &data)
}

/// `A` with `A·Aᵀ = Σ`, from `Σ = V·Λ·Vᵀ`.
fn colouring_factor(spec: &CovarianceSpec) -> Result<DMatrix<f64>> {
    let eigen = SymmetricEigen::new(spec.matrix().clone());
    let largest = eigen.eigenvalues.max().abs().max(1.0);

    let mut factor = eigen.eigenvectors;
    for (j, &lambda) in eigen.eigenvalues.iter().enumerate() {
        if lambda < -PSD_TOLERANCE * largest {
            return Err(Error::InvalidSpec(format!(
                "matrix over {:?} is not positive semi-definite (eigenvalue {lambda:.3e})",
                spec.names()
            )));
        }
        let mut col = factor.column_mut(j);
        col *= lambda.max(0.0).sqrt();
    }
    Ok(factor)
}
