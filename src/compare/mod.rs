//! Criterion comparison: ordinary least squares of a criterion on a composite.
//!
//! `criterion = intercept + slope · composite + ε`
//!
//! Unweighted composites live on the item scale and weighted ones are
//! z-scores, so raw slopes are not comparable across modes.
//! `standardized_slope` (Pearson r for a single predictor) is.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{Composite, CompositeMode, ItemMatrix};
use crate::stats;
use crate::{Error, Result};

/// Fewest observations that leave a residual degree of freedom.
const MIN_OBSERVATIONS: usize = 3;

/// Simple linear regression fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    pub n: usize,
    pub intercept: f64,
    pub slope: f64,
    pub intercept_se: f64,
    pub slope_se: f64,
    pub intercept_t: f64,
    pub slope_t: f64,
    pub r_squared: f64,
    pub residual_se: f64,
    /// Slope in standard-deviation units (equals r).
    pub standardized_slope: f64,
}

/// One composite regressed on one criterion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub criterion: String,
    pub mode: CompositeMode,
    pub fit: LinearFit,
}

/// Fit `response ~ predictor`.
pub fn fit_line(response: &[f64], predictor: &[f64]) -> Result<LinearFit> {
    let n = response.len();
    if predictor.len() != n {
        return Err(Error::InvalidInput {
            column: "predictor".into(),
            row: predictor.len().min(n),
            message: format!("{} predictor values for {n} responses", predictor.len()),
        });
    }
    if n < MIN_OBSERVATIONS {
        return Err(Error::InvalidInput {
            column: "response".into(),
            row: n,
            message: format!("need at least {MIN_OBSERVATIONS} observations"),
        });
    }

    let (mx, my) = (stats::mean(predictor), stats::mean(response));
    let sxx: f64 = predictor.iter().map(|x| (x - mx).powi(2)).sum();
    let syy: f64 = response.iter().map(|y| (y - my).powi(2)).sum();
    let sxy: f64 = predictor
        .iter()
        .zip(response)
        .map(|(x, y)| (x - mx) * (y - my))
        .sum();
    if !(sxx > 0.0) {
        return Err(Error::DegenerateVariance { item: "predictor".into() });
    }
    if !(syy > 0.0) {
        return Err(Error::DegenerateVariance { item: "response".into() });
    }

    let slope = sxy / sxx;
    let intercept = my - slope * mx;
    let sse: f64 = predictor
        .iter()
        .zip(response)
        .map(|(x, y)| (y - intercept - slope * x).powi(2))
        .sum();
    let df = (n - 2) as f64;
    let sigma2 = sse / df;
    let slope_se = (sigma2 / sxx).sqrt();
    let intercept_se = (sigma2 * (1.0 / n as f64 + mx * mx / sxx)).sqrt();

    Ok(LinearFit {
        n,
        intercept,
        slope,
        intercept_se,
        slope_se,
        intercept_t: intercept / intercept_se,
        slope_t: slope / slope_se,
        r_squared: 1.0 - sse / syy,
        residual_se: sigma2.sqrt(),
        standardized_slope: sxy / (sxx * syy).sqrt(),
    })
}

/// Regress the `criterion` column of `matrix` on a composite.
pub fn compare(matrix: &ItemMatrix, criterion: &str, composite: &Composite) -> Result<Comparison> {
    let response = matrix.column(criterion)?;
    let fit = fit_line(response, &composite.scores).map_err(|e| match e {
        Error::DegenerateVariance { item } if item == "predictor" => Error::DegenerateVariance {
            item: composite.name().to_string(),
        },
        Error::DegenerateVariance { .. } => Error::DegenerateVariance {
            item: criterion.to_string(),
        },
        other => other,
    })?;
    debug!(
        criterion,
        mode = %composite.mode,
        slope = fit.slope,
        r_squared = fit.r_squared,
        "compared composite"
    );
    Ok(Comparison {
        criterion: criterion.to_string(),
        mode: composite.mode,
        fit,
    })
}
