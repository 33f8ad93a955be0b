//! Composite: one derived scale score per respondent.

use serde::{Deserialize, Serialize};

use crate::stats;

/// How the composite combines its items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompositeMode {
    /// Arithmetic mean of the items. Stays on the item scale.
    Unweighted,
    /// Standardized one-factor regression scores.
    Weighted,
}

impl CompositeMode {
    /// Column name used when the composite is appended to an `ItemMatrix`.
    pub fn column_name(&self) -> &'static str {
        match self {
            CompositeMode::Unweighted => "scale_mean",
            CompositeMode::Weighted => "scale_factor",
        }
    }
}

impl std::fmt::Display for CompositeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompositeMode::Unweighted => write!(f, "unweighted"),
            CompositeMode::Weighted => write!(f, "weighted"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Composite {
    pub mode: CompositeMode,
    /// Columns the composite was built from, in order.
    pub items: Vec<String>,
    pub scores: Vec<f64>,
    /// Factor loadings aligned with `items`; `Weighted` only.
    pub loadings: Option<Vec<f64>>,
}

impl Composite {
    pub fn name(&self) -> &'static str {
        self.mode.column_name()
    }

    /// Item with the largest absolute loading.
    pub fn dominant_item(&self) -> Option<&str> {
        let loadings = self.loadings.as_ref()?;
        loadings
            .iter()
            .zip(&self.items)
            .max_by(|a, b| a.0.abs().total_cmp(&b.0.abs()))
            .map(|(_, name)| name.as_str())
    }

    /// Scores rescaled to mean 0, sd 1.
    pub fn standardized(&self) -> Vec<f64> {
        stats::standardize(&self.scores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dominant_item_uses_absolute_loading() {
        let c = Composite {
            mode: CompositeMode::Weighted,
            items: vec!["a".into(), "b".into(), "c".into()],
            scores: vec![],
            loadings: Some(vec![0.4, -0.9, 0.6]),
        };
        assert_eq!(c.dominant_item(), Some("b"));
    }

    #[test]
    fn unweighted_has_no_dominant_item() {
        let c = Composite {
            mode: CompositeMode::Unweighted,
            items: vec!["a".into()],
            scores: vec![1.0],
            loadings: None,
        };
        assert_eq!(c.dominant_item(), None);
        assert_eq!(c.name(), "scale_mean");
    }
}
