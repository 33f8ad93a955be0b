//! Descriptive statistics over columns and dense matrices.
//!
//! Variances and covariances use the `n - 1` denominator throughout, so
//! "sample covariance" means the same thing in the generator, the
//! diagnostics and the tests. Functions assume at least two observations
//! and return 0.0 spreads for shorter input.

use nalgebra::{DMatrix, DVector};

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub fn variance(values: &[f64]) -> f64 {
    covariance(values, values)
}

pub fn std_dev(values: &[f64]) -> f64 {
    variance(values).sqrt()
}

pub fn covariance(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len().min(b.len());
    if n < 2 {
        return 0.0;
    }
    let (ma, mb) = (mean(&a[..n]), mean(&b[..n]));
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - ma) * (y - mb))
        .sum::<f64>()
        / (n - 1) as f64
}

/// Pearson correlation; 0.0 when either side has no spread.
pub fn correlation(a: &[f64], b: &[f64]) -> f64 {
    let denom = (variance(a) * variance(b)).sqrt();
    if denom == 0.0 {
        return 0.0;
    }
    covariance(a, b) / denom
}

/// z-scores; a constant column maps to zeros.
pub fn standardize(values: &[f64]) -> Vec<f64> {
    let m = mean(values);
    let sd = std_dev(values);
    if sd == 0.0 {
        return vec![0.0; values.len()];
    }
    values.iter().map(|v| (v - m) / sd).collect()
}

pub fn column_means(data: &DMatrix<f64>) -> DVector<f64> {
    DVector::from_fn(data.ncols(), |j, _| mean(data.column(j).as_slice()))
}

/// Subtract each column's mean.
pub fn center_columns(data: &DMatrix<f64>) -> DMatrix<f64> {
    let means = column_means(data);
    DMatrix::from_fn(data.nrows(), data.ncols(), |i, j| data[(i, j)] - means[j])
}

/// K×K sample covariance matrix of an N×K data matrix.
pub fn covariance_matrix(data: &DMatrix<f64>) -> DMatrix<f64> {
    let n = data.nrows();
    if n < 2 {
        return DMatrix::zeros(data.ncols(), data.ncols());
    }
    let centered = center_columns(data);
    (centered.transpose() * &centered) / (n - 1) as f64
}

/// Rescale a covariance matrix to correlations. Zero-variance rows stay zero.
pub fn covariance_to_correlation(cov: &DMatrix<f64>) -> DMatrix<f64> {
    let sd: Vec<f64> = cov.diagonal().iter().map(|v| v.max(0.0).sqrt()).collect();
    DMatrix::from_fn(cov.nrows(), cov.ncols(), |i, j| {
        if i == j {
            return if sd[i] > 0.0 { 1.0 } else { 0.0 };
        }
        let denom = sd[i] * sd[j];
        if denom > 0.0 { cov[(i, j)] / denom } else { 0.0 }
    })
}

pub fn correlation_matrix(data: &DMatrix<f64>) -> DMatrix<f64> {
    covariance_to_correlation(&covariance_matrix(data))
}

/// Column-wise z-scores.
pub fn standardize_columns(data: &DMatrix<f64>) -> DMatrix<f64> {
    let mut out = data.clone();
    for j in 0..data.ncols() {
        let z = standardize(data.column(j).as_slice());
        out.column_mut(j).copy_from_slice(&z);
    }
    out
}
