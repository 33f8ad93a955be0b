//! CovarianceSpec: target population moments for the generator.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Symmetry tolerance for user-supplied matrices.
const SYMMETRY_TOLERANCE: f64 = 1e-12;

/// A named mean vector plus a symmetric K×K covariance (or correlation) matrix.
///
/// Construction checks shape, symmetry, finiteness and a positive diagonal.
/// Correlation-form constructors additionally require a unit diagonal and
/// off-diagonal entries in [-1, 1]. Positive semi-definiteness is checked
/// by the generator, where the decomposition happens.
///
/// Deserialization goes through `new`, so a decoded spec is as valid as a
/// constructed one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCovarianceSpec")]
pub struct CovarianceSpec {
    names: Vec<String>,
    means: DVector<f64>,
    matrix: DMatrix<f64>,
}

/// Wire shape of `CovarianceSpec`, before validation.
#[derive(Deserialize)]
struct RawCovarianceSpec {
    names: Vec<String>,
    means: DVector<f64>,
    matrix: DMatrix<f64>,
}

impl TryFrom<RawCovarianceSpec> for CovarianceSpec {
    type Error = Error;

    fn try_from(raw: RawCovarianceSpec) -> Result<Self> {
        Self::new(&raw.names, raw.means.iter().copied().collect(), raw.matrix)
    }
}

impl CovarianceSpec {
    /// General covariance form.
    pub fn new<S: AsRef<str>>(names: &[S], means: Vec<f64>, matrix: DMatrix<f64>) -> Result<Self> {
        let k = names.len();
        if k == 0 {
            return Err(Error::InvalidSpec("no variables named".into()));
        }
        if matrix.shape() != (k, k) {
            return Err(Error::InvalidSpec(format!(
                "matrix is {}x{} but {k} variables are named",
                matrix.nrows(),
                matrix.ncols()
            )));
        }
        if means.len() != k {
            return Err(Error::InvalidSpec(format!(
                "{} means for {k} variables",
                means.len()
            )));
        }
        let names: Vec<String> = names.iter().map(|n| n.as_ref().to_string()).collect();
        for (i, name) in names.iter().enumerate() {
            if names[..i].contains(name) {
                return Err(Error::InvalidSpec(format!("variable '{name}' named twice")));
            }
            if !means[i].is_finite() {
                return Err(Error::InvalidSpec(format!("mean of '{name}' is not finite")));
            }
            if !(matrix[(i, i)].is_finite() && matrix[(i, i)] > 0.0) {
                return Err(Error::InvalidSpec(format!(
                    "variance of '{name}' must be positive, got {}",
                    matrix[(i, i)]
                )));
            }
            for j in 0..i {
                let (a, b) = (matrix[(i, j)], matrix[(j, i)]);
                if !a.is_finite() || (a - b).abs() > SYMMETRY_TOLERANCE {
                    return Err(Error::InvalidSpec(format!(
                        "matrix is not symmetric at ('{}', '{name}'): {b} vs {a}",
                        names[j]
                    )));
                }
            }
        }
        Ok(Self {
            names,
            means: DVector::from_vec(means),
            matrix,
        })
    }

    /// Correlation form with zero means, given as full rows.
    pub fn from_correlations<S: AsRef<str>>(names: &[S], rows: &[&[f64]]) -> Result<Self> {
        let k = names.len();
        if rows.len() != k || rows.iter().any(|r| r.len() != k) {
            return Err(Error::InvalidSpec(format!(
                "correlation rows do not form a {k}x{k} matrix"
            )));
        }
        let matrix = DMatrix::from_fn(k, k, |i, j| rows[i][j]);
        let spec = Self::new(names, vec![0.0; k], matrix)?;
        spec.check_correlation_form()?;
        Ok(spec)
    }

    /// K variables, unit variances, every pair correlated `r`.
    pub fn equicorrelated<S: AsRef<str>>(names: &[S], r: f64) -> Result<Self> {
        let k = names.len();
        let matrix = DMatrix::from_fn(k, k, |i, j| if i == j { 1.0 } else { r });
        let spec = Self::new(names, vec![0.0; k], matrix)?;
        spec.check_correlation_form()?;
        Ok(spec)
    }

    /// Replace the mean vector.
    pub fn with_means(mut self, means: Vec<f64>) -> Result<Self> {
        if means.len() != self.k() || means.iter().any(|m| !m.is_finite()) {
            return Err(Error::InvalidSpec(format!(
                "expected {} finite means, got {:?}",
                self.k(),
                means
            )));
        }
        self.means = DVector::from_vec(means);
        Ok(self)
    }

    /// Number of variables.
    pub fn k(&self) -> usize {
        self.names.len()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn means(&self) -> &DVector<f64> {
        &self.means
    }

    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }

    /// True when the diagonal is exactly 1.
    pub fn is_correlation(&self) -> bool {
        self.matrix.diagonal().iter().all(|&d| d == 1.0)
    }

    fn check_correlation_form(&self) -> Result<()> {
        for i in 0..self.k() {
            if self.matrix[(i, i)] != 1.0 {
                return Err(Error::InvalidSpec(format!(
                    "correlation diagonal for '{}' is {}, expected 1",
                    self.names[i],
                    self.matrix[(i, i)]
                )));
            }
            for j in 0..i {
                let r = self.matrix[(i, j)];
                if !(-1.0..=1.0).contains(&r) {
                    return Err(Error::InvalidSpec(format!(
                        "correlation between '{}' and '{}' is {r}, outside [-1, 1]",
                        self.names[j], self.names[i]
                    )));
                }
            }
        }
        Ok(())
    }
}
