//! One-factor extraction for the weighted composite.
//!
//! `PrincipalAxis` runs iterated principal-axis factoring on the item
//! correlation matrix:
//!
//! 1. Start communalities at the squared multiple correlations `1 − 1/(R⁻¹)ᵢᵢ`.
//! 2. Put them on the diagonal of R, take the leading eigenpair (λ, v).
//! 3. Loadings `v·√λ`; new communalities are the squared loadings.
//! 4. Repeat until the largest communality change drops below the tolerance.
//!
//! Scoring weights follow Thurstone's regression method, `W = R⁻¹·Λ`.

use nalgebra::{DMatrix, DVector, SymmetricEigen};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{Error, Result};

/// Fewest items that identify a one-factor model.
pub const MIN_FACTOR_ITEMS: usize = 3;

/// Loadings and scoring weights of a single extracted factor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorSolution {
    /// Sign-aligned so the loadings sum to a positive value.
    pub loadings: Vec<f64>,
    pub communalities: Vec<f64>,
    /// Regression scoring weights `R⁻¹·Λ`, applied to z-scored items.
    pub weights: Vec<f64>,
    /// Share of total item variance the factor explains.
    pub explained_variance: f64,
    pub iterations: usize,
}

/// Fits a one-factor model to a correlation matrix.
pub trait FactorExtractor {
    fn extract(&self, correlations: &DMatrix<f64>) -> Result<FactorSolution>;
}

/// Iterated principal-axis factoring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrincipalAxis {
    pub max_iter: usize,
    pub tolerance: f64,
}

impl Default for PrincipalAxis {
    fn default() -> Self {
        Self {
            max_iter: 500,
            tolerance: 1e-6,
        }
    }
}

impl FactorExtractor for PrincipalAxis {
    fn extract(&self, correlations: &DMatrix<f64>) -> Result<FactorSolution> {
        let k = correlations.nrows();
        if k < MIN_FACTOR_ITEMS {
            return Err(Error::FactorExtractionFailed(format!(
                "a one-factor model needs at least {MIN_FACTOR_ITEMS} items, got {k}"
            )));
        }
        let inverse = correlations.clone().try_inverse().ok_or_else(|| {
            Error::FactorExtractionFailed("item correlation matrix is singular".into())
        })?;

        let mut communalities =
            DVector::from_fn(k, |i, _| (1.0 - 1.0 / inverse[(i, i)]).clamp(0.0, 1.0));

        for iteration in 1..=self.max_iter {
            let mut reduced = correlations.clone();
            reduced.set_diagonal(&communalities);
            let eigen = SymmetricEigen::new(reduced);
            let (top, lambda) = eigen
                .eigenvalues
                .iter()
                .copied()
                .enumerate()
                .max_by(|a, b| a.1.total_cmp(&b.1))
                .ok_or_else(|| Error::FactorExtractionFailed("no eigenvalues".into()))?;
            if !(lambda > 0.0) {
                return Err(Error::FactorExtractionFailed(format!(
                    "leading eigenvalue {lambda:.3e} is not positive"
                )));
            }

            let mut loadings: DVector<f64> = eigen.eigenvectors.column(top) * lambda.sqrt();
            let mut next = loadings.map(|l| l * l);
            if next.iter().any(|&h| h > 1.0) {
                warn!(iteration, "communality above 1 (Heywood case), clamping");
                next.apply(|h| *h = h.min(1.0));
            }
            let change = (&next - &communalities).amax();
            communalities = next;

            if change < self.tolerance {
                if loadings.sum() < 0.0 {
                    loadings.neg_mut();
                }
                let weights = &inverse * &loadings;
                let explained_variance = loadings.norm_squared() / k as f64;
                debug!(iteration, explained_variance, "factor extraction converged");
                return Ok(FactorSolution {
                    loadings: loadings.iter().copied().collect(),
                    communalities: communalities.iter().copied().collect(),
                    weights: weights.iter().copied().collect(),
                    explained_variance,
                    iterations: iteration,
                });
            }
        }

        Err(Error::FactorExtractionFailed(format!(
            "no convergence after {} iterations",
            self.max_iter
        )))
    }
}
