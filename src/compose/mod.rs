//! # Scale Composer
//!
//! Builds one score per respondent from a caller-chosen item set:
//!
//! - **Unweighted**: the arithmetic mean of the items, on the item scale.
//! - **Weighted**: standardized one-factor regression scores. Loadings are
//!   kept on the `Composite` so the dominant item can be inspected.
//!
//! The two are not on the same scale. Compare them through standardized
//! slopes, not raw coefficients.
//!
//! Items must already be reverse-coded and pruned; the composer applies no
//! policy of its own.

pub mod factor;

pub use factor::{FactorExtractor, FactorSolution, PrincipalAxis, MIN_FACTOR_ITEMS};

use tracing::debug;

use crate::model::{Composite, CompositeMode, ItemMatrix};
use crate::stats;
use crate::{Error, Result};

/// Build a composite in the given mode with the default extractor.
pub fn composite<S: AsRef<str>>(
    matrix: &ItemMatrix,
    items: &[S],
    mode: CompositeMode,
) -> Result<Composite> {
    match mode {
        CompositeMode::Unweighted => unweighted_composite(matrix, items),
        CompositeMode::Weighted => weighted_composite(matrix, items),
    }
}

/// Row-wise mean of the items.
pub fn unweighted_composite<S: AsRef<str>>(matrix: &ItemMatrix, items: &[S]) -> Result<Composite> {
    if items.is_empty() {
        return Err(Error::InsufficientItems { required: 1, got: 0 });
    }
    let data = matrix.select(items)?;
    let k = data.ncols() as f64;
    let scores = data.row_iter().map(|row| row.sum() / k).collect();

    Ok(Composite {
        mode: CompositeMode::Unweighted,
        items: item_names(items),
        scores,
        loadings: None,
    })
}

/// Standardized regression factor scores from `PrincipalAxis::default()`.
pub fn weighted_composite<S: AsRef<str>>(matrix: &ItemMatrix, items: &[S]) -> Result<Composite> {
    weighted_composite_with(matrix, items, &PrincipalAxis::default())
}

pub fn weighted_composite_with<S, F>(
    matrix: &ItemMatrix,
    items: &[S],
    extractor: &F,
) -> Result<Composite>
where
    S: AsRef<str>,
    F: FactorExtractor + ?Sized,
{
    let names = item_names(items);
    let data = matrix.select(&names)?;
    for (j, name) in names.iter().enumerate() {
        if !(stats::variance(data.column(j).as_slice()) > 0.0) {
            return Err(Error::DegenerateVariance { item: name.clone() });
        }
    }

    let solution = extractor.extract(&stats::correlation_matrix(&data))?;
    if solution.weights.len() != names.len() {
        return Err(Error::FactorExtractionFailed(format!(
            "extractor returned {} weights for {} items",
            solution.weights.len(),
            names.len()
        )));
    }

    let z = stats::standardize_columns(&data);
    let raw: Vec<f64> = z
        .row_iter()
        .map(|row| row.iter().zip(&solution.weights).map(|(x, w)| x * w).sum::<f64>())
        .collect();
    if !(stats::variance(&raw) > 0.0) {
        return Err(Error::FactorExtractionFailed("factor scores have no variance".into()));
    }

    debug!(items = names.len(), loadings = ?solution.loadings, "weighted composite");

    Ok(Composite {
        mode: CompositeMode::Weighted,
        items: names,
        scores: stats::standardize(&raw),
        loadings: Some(solution.loadings),
    })
}

fn item_names<S: AsRef<str>>(items: &[S]) -> Vec<String> {
    items.iter().map(|s| s.as_ref().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_literal_row() {
        let m = ItemMatrix::from_columns([
            ("x1", vec![2.0, 1.0]),
            ("x2", vec![3.0, 1.0]),
            ("x3", vec![4.0, 4.0]),
        ])
        .unwrap();
        let c = unweighted_composite(&m, &["x1", "x2", "x3"]).unwrap();
        assert_eq!(c.scores, vec![3.0, 2.0]);
        assert_eq!(c.loadings, None);
    }

    #[test]
    fn empty_item_list_is_insufficient() {
        let m = ItemMatrix::from_columns([("x1", vec![1.0])]).unwrap();
        let empty: [&str; 0] = [];
        assert!(matches!(
            unweighted_composite(&m, &empty),
            Err(Error::InsufficientItems { .. })
        ));
    }

    #[test]
    fn weighted_rejects_constant_item() {
        let m = ItemMatrix::from_columns([
            ("x1", vec![1.0, 2.0, 3.0, 4.0]),
            ("x2", vec![2.0, 2.0, 2.0, 2.0]),
            ("x3", vec![1.0, 3.0, 2.0, 4.0]),
        ])
        .unwrap();
        assert!(matches!(
            weighted_composite(&m, &["x1", "x2", "x3"]),
            Err(Error::DegenerateVariance { .. })
        ));
    }
}
