//! ReliabilityReport: internal-consistency diagnostics for one item set.

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

/// Per-item diagnostics.
///
/// All figures describe the item as analyzed, i.e. after reverse-scoring
/// when `reversed` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemStats {
    pub name: String,
    pub mean: f64,
    pub sd: f64,
    /// Correlation with the standardized total, item included.
    pub item_total_r: f64,
    /// Correlation with the standardized total of the other items.
    pub corrected_item_total_r: f64,
    /// Standardized alpha of the set without this item. `None` for two-item sets.
    pub alpha_if_dropped: Option<f64>,
    /// Negative corrected item-total correlation detected and the item reverse-scored.
    pub reversed: bool,
}

/// Result of `compute_alpha`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReliabilityReport {
    /// Respondents analyzed.
    pub n_obs: usize,
    /// Alpha from the covariance matrix.
    pub raw_alpha: f64,
    /// Alpha from the correlation matrix (z-scored items).
    pub std_alpha: f64,
    /// Mean off-diagonal inter-item correlation.
    pub average_r: f64,
    pub items: Vec<ItemStats>,
    /// Inter-item correlations after any reverse-scoring, in `items` order.
    pub correlations: DMatrix<f64>,
}

impl ReliabilityReport {
    pub fn item(&self, name: &str) -> Option<&ItemStats> {
        self.items.iter().find(|s| s.name == name)
    }

    pub fn item_names(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|s| s.name.as_str())
    }

    /// Items flagged and reverse-scored.
    pub fn reversed_items(&self) -> Vec<&str> {
        self.items
            .iter()
            .filter(|s| s.reversed)
            .map(|s| s.name.as_str())
            .collect()
    }

    /// Item whose removal raises standardized alpha the most, if any removal raises it.
    pub fn most_improving_drop(&self) -> Option<&ItemStats> {
        self.items
            .iter()
            .filter_map(|s| s.alpha_if_dropped.map(|a| (s, a)))
            .filter(|(_, a)| *a > self.std_alpha)
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(s, _)| s)
    }
}
