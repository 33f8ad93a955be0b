//! # Reliability & Diagnostics Engine
//!
//! Cronbach's alpha for an item set, in raw (covariance) and standardized
//! (correlation) form:
//!
//! ```text
//! α = K/(K−1) · (1 − tr(M) / ΣM)      M = covariance → raw α
//!                                     M = correlation → standardized α
//! ```
//!
//! For z-scored items this is the familiar `K·r̄ / (1 + (K−1)·r̄)`.
//!
//! With reverse detection on, every item whose correlation with the
//! standardized total of the *other* items is negative is reverse-scored as
//! `(max + 1) − x` before alpha is computed. Detection is one pass over the
//! original correlations; a correlation of exactly zero is left alone.

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::discretize::reverse_code;
use crate::model::{ItemMatrix, ItemStats, ReliabilityReport};
use crate::stats;
use crate::{Error, Result};

/// Label used when the summed score, not a single item, is degenerate.
const TOTAL_SCORE: &str = "total score";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlphaOptions {
    /// Reverse-score items with a negative corrected item-total correlation.
    pub reverse_detect: bool,
    /// Highest response label; reverse-scoring maps `x` to `scale_max + 1 - x`.
    pub scale_max: f64,
}

impl Default for AlphaOptions {
    fn default() -> Self {
        Self {
            reverse_detect: false,
            scale_max: 5.0,
        }
    }
}

/// Alpha on a 1–5 scale.
pub fn compute_alpha<S: AsRef<str>>(
    matrix: &ItemMatrix,
    items: &[S],
    reverse_detect: bool,
) -> Result<ReliabilityReport> {
    let options = AlphaOptions {
        reverse_detect,
        ..AlphaOptions::default()
    };
    compute_alpha_with(matrix, items, &options)
}

pub fn compute_alpha_with<S: AsRef<str>>(
    matrix: &ItemMatrix,
    items: &[S],
    options: &AlphaOptions,
) -> Result<ReliabilityReport> {
    let k = items.len();
    if k < 2 {
        return Err(Error::InsufficientItems { required: 2, got: k });
    }
    let names: Vec<String> = items.iter().map(|s| s.as_ref().to_string()).collect();
    let mut data = matrix.select(&names)?;
    check_columns(&data, &names)?;

    let mut reversed = vec![false; k];
    if options.reverse_detect {
        let corr = stats::correlation_matrix(&data);
        let total = positive_total(&corr)?;
        for j in 0..k {
            // correlation with the sum of the other items
            if corrected_item_total_r(&corr, j, total) < 0.0 {
                reversed[j] = true;
                let flipped = reverse_code(data.column(j).as_slice(), options.scale_max);
                data.column_mut(j).copy_from_slice(&flipped);
                info!(item = %names[j], "reverse-scored negatively keyed item");
            }
        }
    }

    let cov = stats::covariance_matrix(&data);
    let corr = stats::covariance_to_correlation(&cov);
    let total = positive_total(&corr)?;
    let raw_alpha = alpha(&cov);
    let std_alpha = alpha(&corr);
    let average_r = (total - k as f64) / (k * (k - 1)) as f64;

    let item_stats = names
        .iter()
        .enumerate()
        .map(|(j, name)| {
            let column = data.column(j);
            let values = column.as_slice();
            ItemStats {
                name: name.clone(),
                mean: stats::mean(values),
                sd: stats::std_dev(values),
                item_total_r: item_total_r(&corr, j, total),
                corrected_item_total_r: corrected_item_total_r(&corr, j, total),
                alpha_if_dropped: (k > 2).then(|| alpha(&drop_item(&corr, j))),
                reversed: reversed[j],
            }
        })
        .collect();

    debug!(k, n = data.nrows(), raw_alpha, std_alpha, "computed alpha");

    Ok(ReliabilityReport {
        n_obs: data.nrows(),
        raw_alpha,
        std_alpha,
        average_r,
        items: item_stats,
        correlations: corr,
    })
}

/// `K/(K−1) · (1 − tr(M)/ΣM)`.
fn alpha(m: &DMatrix<f64>) -> f64 {
    let k = m.nrows() as f64;
    k / (k - 1.0) * (1.0 - m.trace() / m.sum())
}

fn drop_item(corr: &DMatrix<f64>, j: usize) -> DMatrix<f64> {
    corr.clone().remove_row(j).remove_column(j)
}

/// Correlation of standardized item `j` with the standardized sum (item included).
fn item_total_r(corr: &DMatrix<f64>, j: usize, total: f64) -> f64 {
    corr.row(j).sum() / total.sqrt()
}

/// Correlation of item `j` with the sum of the remaining items.
fn corrected_item_total_r(corr: &DMatrix<f64>, j: usize, total: f64) -> f64 {
    let row = corr.row(j).sum();
    let rest = total - 2.0 * row + corr[(j, j)];
    if rest <= 0.0 {
        return 0.0;
    }
    (row - corr[(j, j)]) / rest.sqrt()
}

/// Variance of the standardized total; must be positive.
fn positive_total(corr: &DMatrix<f64>) -> Result<f64> {
    let total = corr.sum();
    if total > 0.0 {
        Ok(total)
    } else {
        Err(Error::DegenerateVariance { item: TOTAL_SCORE.into() })
    }
}

fn check_columns(data: &DMatrix<f64>, names: &[String]) -> Result<()> {
    for (j, name) in names.iter().enumerate() {
        let column = data.column(j);
        if let Some(row) = column.iter().position(|v| !v.is_finite()) {
            return Err(Error::InvalidInput {
                column: name.clone(),
                row,
                message: "missing or non-finite value".into(),
            });
        }
        if !(stats::variance(column.as_slice()) > 0.0) {
            return Err(Error::DegenerateVariance { item: name.clone() });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alpha_of_equicorrelated_matrix_is_closed_form() {
        let corr = DMatrix::from_fn(3, 3, |i, j| if i == j { 1.0 } else { 0.5 });
        assert!((alpha(&corr) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn corrected_item_total_excludes_the_item() {
        let corr = DMatrix::from_fn(3, 3, |i, j| if i == j { 1.0 } else { 0.5 });
        let total = corr.sum();
        // cov(z1, z2 + z3) = 1.0, var(z2 + z3) = 3.0
        assert!((corrected_item_total_r(&corr, 0, total) - 1.0 / 3f64.sqrt()).abs() < 1e-12);
        // cov(z1, z1 + z2 + z3) = 2.0, var = 6.0
        assert!((item_total_r(&corr, 0, total) - 2.0 / 6f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn single_item_is_insufficient() {
        let m = ItemMatrix::from_columns([("x1", vec![1.0, 2.0, 3.0])]).unwrap();
        assert!(matches!(
            compute_alpha(&m, &["x1"], false),
            Err(Error::InsufficientItems { required: 2, got: 1 })
        ));
    }

    #[test]
    fn constant_item_is_degenerate() {
        let m = ItemMatrix::from_columns([
            ("x1", vec![1.0, 2.0, 3.0]),
            ("x2", vec![4.0, 4.0, 4.0]),
        ])
        .unwrap();
        match compute_alpha(&m, &["x1", "x2"], false) {
            Err(Error::DegenerateVariance { item }) => assert_eq!(item, "x2"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn two_items_have_no_alpha_if_dropped() {
        let m = ItemMatrix::from_columns([
            ("x1", vec![1.0, 2.0, 3.0, 4.0]),
            ("x2", vec![2.0, 1.0, 4.0, 3.0]),
        ])
        .unwrap();
        let report = compute_alpha(&m, &["x1", "x2"], false).unwrap();
        assert!(report.items.iter().all(|s| s.alpha_if_dropped.is_none()));
        assert!(report.most_improving_drop().is_none());
    }

    #[test]
    fn missing_value_is_invalid_input() {
        let m = ItemMatrix::from_columns([
            ("x1", vec![1.0, 2.0, 3.0]),
            ("x2", vec![1.0, f64::NAN, 3.0]),
        ])
        .unwrap();
        assert!(matches!(
            compute_alpha(&m, &["x1", "x2"], false),
            Err(Error::InvalidInput { row: 1, .. })
        ));
    }
}
