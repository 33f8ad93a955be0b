//! The five canonical dataset variants.
//!
//! Each variant is a correlation structure over items `x1..xK` plus a
//! continuous criterion `y`, together with the item decision a reader would
//! take after looking at its reliability report.
//!
//! | Variant | Items | Lesson |
//! |---------|-------|--------|
//! | clean scale | 3, all r = .5 | alpha = .75, keep everything |
//! | reversed item | 4, x4 negatively keyed | reverse-code x4 |
//! | bad item | 4, x4 unrelated | dropping x4 raises alpha, drop it |
//! | redundant items | 4, x1/x2 r = .9 | near-duplicates inflate alpha, drop x2 |
//! | differential weighting | 3, loadings .9/.5/.5 | weighted composite tracks the criterion better |

use serde::Serialize;

use crate::config::PipelineConfig;
use crate::model::{CompositeMode, CovarianceSpec, DiscretizationRule, ItemSelection};
use crate::pipeline::ScalePipeline;
use crate::Result;

/// Criterion column shared by every variant.
pub const CRITERION: &str = "y";

#[derive(Debug, Clone, Serialize)]
pub struct Scenario {
    pub name: &'static str,
    pub description: &'static str,
    pub items: Vec<String>,
    pub spec: CovarianceSpec,
    /// Run reverse-key detection while diagnosing.
    pub check_keys: bool,
    /// The manual decision applied after diagnosis.
    pub selection: ItemSelection,
    /// Added to the configured seed so each variant draws its own stream.
    pub seed_offset: u64,
}

impl Scenario {
    /// Walk the full pipeline: generate, discretize, diagnose, select,
    /// both composites, compare against `y`.
    pub fn run(&self, config: &PipelineConfig) -> Result<ScalePipeline> {
        let config = PipelineConfig {
            seed: config.seed.wrapping_add(self.seed_offset),
            ..config.clone()
        };
        let mut pipeline = ScalePipeline::generate(&self.spec, &self.items, config)?;
        pipeline.discretize(&DiscretizationRule::likert5())?;
        pipeline.diagnose(self.check_keys)?;
        pipeline.select_items(&self.selection)?;
        pipeline.composite(CompositeMode::Unweighted)?;
        pipeline.composite(CompositeMode::Weighted)?;
        pipeline.compare(CRITERION)?;
        Ok(pipeline)
    }
}

/// All five, in teaching order.
pub fn all() -> Result<Vec<Scenario>> {
    Ok(vec![
        clean_scale()?,
        reversed_item()?,
        bad_item()?,
        redundant_items()?,
        differential_weighting()?,
    ])
}

pub fn clean_scale() -> Result<Scenario> {
    let names = ["x1", "x2", "x3", CRITERION];
    let spec = CovarianceSpec::from_correlations(
        &names,
        &[
            &[1.0, 0.5, 0.5, 0.3],
            &[0.5, 1.0, 0.5, 0.3],
            &[0.5, 0.5, 1.0, 0.3],
            &[0.3, 0.3, 0.3, 1.0],
        ],
    )?;
    let items = item_names(&names);
    Ok(Scenario {
        name: "clean scale",
        description: "three equally good items",
        selection: ItemSelection::keep_all(&items),
        items,
        spec,
        check_keys: false,
        seed_offset: 1,
    })
}

pub fn reversed_item() -> Result<Scenario> {
    let names = ["x1", "x2", "x3", "x4", CRITERION];
    let spec = CovarianceSpec::from_correlations(
        &names,
        &[
            &[1.0, 0.5, 0.5, -0.5, 0.3],
            &[0.5, 1.0, 0.5, -0.5, 0.3],
            &[0.5, 0.5, 1.0, -0.5, 0.3],
            &[-0.5, -0.5, -0.5, 1.0, -0.3],
            &[0.3, 0.3, 0.3, -0.3, 1.0],
        ],
    )?;
    let items = item_names(&names);
    Ok(Scenario {
        name: "reversed item",
        description: "x4 is worded in the opposite direction",
        selection: ItemSelection::keep_all(&items).reverse_item("x4"),
        items,
        spec,
        check_keys: true,
        seed_offset: 2,
    })
}

pub fn bad_item() -> Result<Scenario> {
    let names = ["x1", "x2", "x3", "x4", CRITERION];
    let spec = CovarianceSpec::from_correlations(
        &names,
        &[
            &[1.0, 0.5, 0.5, 0.0, 0.3],
            &[0.5, 1.0, 0.5, 0.0, 0.3],
            &[0.5, 0.5, 1.0, 0.0, 0.3],
            &[0.0, 0.0, 0.0, 1.0, 0.0],
            &[0.3, 0.3, 0.3, 0.0, 1.0],
        ],
    )?;
    let items = item_names(&names);
    Ok(Scenario {
        name: "bad item",
        description: "x4 measures something else",
        selection: ItemSelection::keep_all(&items).drop_item("x4"),
        items,
        spec,
        check_keys: false,
        seed_offset: 3,
    })
}

pub fn redundant_items() -> Result<Scenario> {
    let names = ["x1", "x2", "x3", "x4", CRITERION];
    let spec = CovarianceSpec::from_correlations(
        &names,
        &[
            &[1.0, 0.9, 0.49, 0.49, 0.3],
            &[0.9, 1.0, 0.49, 0.49, 0.3],
            &[0.49, 0.49, 1.0, 0.49, 0.3],
            &[0.49, 0.49, 0.49, 1.0, 0.3],
            &[0.3, 0.3, 0.3, 0.3, 1.0],
        ],
    )?;
    let items = item_names(&names);
    Ok(Scenario {
        name: "redundant items",
        description: "x1 and x2 ask the same question twice",
        selection: ItemSelection::keep_all(&items).drop_item("x2"),
        items,
        spec,
        check_keys: false,
        seed_offset: 4,
    })
}

pub fn differential_weighting() -> Result<Scenario> {
    // one-factor model, loadings .9/.5/.5, criterion loading .6
    let names = ["x1", "x2", "x3", CRITERION];
    let spec = CovarianceSpec::from_correlations(
        &names,
        &[
            &[1.0, 0.45, 0.45, 0.54],
            &[0.45, 1.0, 0.25, 0.30],
            &[0.45, 0.25, 1.0, 0.30],
            &[0.54, 0.30, 0.30, 1.0],
        ],
    )?;
    let items = item_names(&names);
    Ok(Scenario {
        name: "differential weighting",
        description: "x1 carries most of the latent trait",
        selection: ItemSelection::keep_all(&items),
        items,
        spec,
        check_keys: false,
        seed_offset: 5,
    })
}

fn item_names(names: &[&str]) -> Vec<String> {
    names
        .iter()
        .filter(|&&n| n != CRITERION)
        .map(|n| n.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn five_variants_with_distinct_seeds() {
        let all = all().unwrap();
        assert_eq!(all.len(), 5);
        let mut offsets: Vec<u64> = all.iter().map(|s| s.seed_offset).collect();
        offsets.dedup();
        assert_eq!(offsets.len(), 5);
    }

    #[test]
    fn criterion_is_never_an_item() {
        for s in all().unwrap() {
            assert!(!s.items.iter().any(|i| i == CRITERION), "{}", s.name);
            assert!(s.spec.names().iter().any(|n| n == CRITERION));
        }
    }
}
