//! # Scale Pipeline
//!
//! Drives one dataset variant through the six stages, owning its
//! `ItemMatrix` the whole way:
//!
//! ```text
//! generate ─▶ discretize ─▶ diagnose ─▶ select_items ─▶ composite ─▶ compare
//! Generated   Discretized   Diagnosed   ItemsSelected   Composited   Compared
//! ```
//!
//! Transitions only move forward. `diagnose` may be repeated while
//! `Diagnosed`, and `composite` may be called once per mode, so a variant
//! can carry both the unweighted and the weighted composite into
//! `compare`. Anything else out of order is `Error::InvalidTransition`.
//!
//! The step from `Diagnosed` to `ItemsSelected` takes an explicit
//! `ItemSelection`; the pipeline never derives one from the report.

pub mod stage;

pub use stage::Stage;

use tracing::info;

use crate::compare::{self, Comparison};
use crate::compose;
use crate::config::PipelineConfig;
use crate::discretize;
use crate::generate;
use crate::model::{
    Composite, CompositeMode, CovarianceSpec, DiscretizationRule, ItemMatrix, ItemSelection,
    ReliabilityReport,
};
use crate::reliability;
use crate::{Error, Result};

/// Single-owner state for one dataset variant.
#[derive(Debug, Clone)]
pub struct ScalePipeline {
    config: PipelineConfig,
    stage: Stage,
    matrix: ItemMatrix,
    /// Scale item columns, as generated. Other columns (criteria) ride along.
    items: Vec<String>,
    report: Option<ReliabilityReport>,
    /// Composite inputs after selection: kept items, reversed ones as `<item>_r`.
    selected: Vec<String>,
    composites: Vec<Composite>,
    comparisons: Vec<Comparison>,
}

impl ScalePipeline {
    /// Generate `config.sample_size` rows from `spec` with `config.seed`.
    pub fn generate<S: AsRef<str>>(
        spec: &CovarianceSpec,
        items: &[S],
        config: PipelineConfig,
    ) -> Result<Self> {
        let matrix = generate::generate(spec, config.sample_size, config.seed)?;
        info!(n = matrix.n_rows(), k = spec.k(), seed = config.seed, "stage Generated");
        Self::from_matrix(matrix, items, config)
    }

    /// Start from an existing continuous matrix, as if just generated.
    pub fn from_matrix<S: AsRef<str>>(
        matrix: ItemMatrix,
        items: &[S],
        config: PipelineConfig,
    ) -> Result<Self> {
        let items: Vec<String> = items.iter().map(|s| s.as_ref().to_string()).collect();
        if let Some(missing) = items.iter().find(|i| !matrix.contains(i)) {
            return Err(Error::NotFound(format!("Item '{missing}'")));
        }
        Ok(Self {
            config,
            stage: Stage::Generated,
            matrix,
            items,
            report: None,
            selected: Vec::new(),
            composites: Vec::new(),
            comparisons: Vec::new(),
        })
    }

    /// Bin the item columns. Criterion columns stay continuous.
    pub fn discretize(&mut self, rule: &DiscretizationRule) -> Result<()> {
        self.require(&[Stage::Generated], "discretize")?;
        self.matrix = discretize::discretize_columns(&self.matrix, &self.items, rule)?;
        self.advance(Stage::Discretized);
        Ok(())
    }

    /// Compute the reliability report over all items.
    pub fn diagnose(&mut self, reverse_detect: bool) -> Result<&ReliabilityReport> {
        self.require(&[Stage::Discretized, Stage::Diagnosed], "diagnose")?;
        let options = self.config.alpha_options(reverse_detect);
        let report = reliability::compute_alpha_with(&self.matrix, &self.items, &options)?;
        info!(
            std_alpha = report.std_alpha,
            raw_alpha = report.raw_alpha,
            reversed = ?report.reversed_items(),
            "reliability"
        );
        self.advance(Stage::Diagnosed);
        Ok(&*self.report.insert(report))
    }

    /// Apply the caller's keep / reverse decision. Reversed items are
    /// appended as `<item>_r`; the original columns are left as they were.
    pub fn select_items(&mut self, selection: &ItemSelection) -> Result<&[String]> {
        self.require(&[Stage::Diagnosed], "select items")?;
        selection.validate(&self.items)?;

        // built on a copy, committed once every reversed column is in
        let mut matrix = self.matrix.clone();
        let mut selected = Vec::with_capacity(selection.kept().len());
        for item in selection.kept() {
            if selection.is_reversed(item) {
                let name = discretize::append_reversed(&mut matrix, item, self.config.scale_max)?;
                selected.push(name);
            } else {
                selected.push(item.clone());
            }
        }
        info!(?selected, "items selected");
        self.matrix = matrix;
        self.selected = selected;
        self.advance(Stage::ItemsSelected);
        Ok(self.selected.as_slice())
    }

    /// Build a composite over the selected items and append it as a column.
    pub fn composite(&mut self, mode: CompositeMode) -> Result<&Composite> {
        self.require(&[Stage::ItemsSelected, Stage::Composited], "build a composite")?;
        if self.composite_for(mode).is_some() {
            return Err(Error::InvalidTransition {
                stage: self.stage,
                operation: "rebuild an existing composite",
            });
        }

        let composite = match mode {
            CompositeMode::Unweighted => {
                compose::unweighted_composite(&self.matrix, &self.selected)?
            }
            CompositeMode::Weighted => compose::weighted_composite_with(
                &self.matrix,
                &self.selected,
                &self.config.factor_extractor(),
            )?,
        };
        self.matrix
            .push_column(mode.column_name(), composite.scores.clone())?;
        if let Some(dominant) = composite.dominant_item() {
            info!(%mode, dominant, "composite built");
        } else {
            info!(%mode, "composite built");
        }

        self.advance(Stage::Composited);
        let idx = self.composites.len();
        self.composites.push(composite);
        Ok(&self.composites[idx])
    }

    /// Regress `criterion` on every composite built so far. Terminal.
    pub fn compare(&mut self, criterion: &str) -> Result<&[Comparison]> {
        self.require(&[Stage::Composited], "compare")?;
        let comparisons = self
            .composites
            .iter()
            .map(|c| compare::compare(&self.matrix, criterion, c))
            .collect::<Result<Vec<_>>>()?;
        for c in &comparisons {
            info!(
                mode = %c.mode,
                slope = c.fit.slope,
                standardized = c.fit.standardized_slope,
                r_squared = c.fit.r_squared,
                "criterion fit"
            );
        }
        self.comparisons = comparisons;
        self.advance(Stage::Compared);
        Ok(self.comparisons.as_slice())
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn matrix(&self) -> &ItemMatrix {
        &self.matrix
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn report(&self) -> Option<&ReliabilityReport> {
        self.report.as_ref()
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub fn composites(&self) -> &[Composite] {
        &self.composites
    }

    pub fn composite_for(&self, mode: CompositeMode) -> Option<&Composite> {
        self.composites.iter().find(|c| c.mode == mode)
    }

    pub fn comparisons(&self) -> &[Comparison] {
        &self.comparisons
    }

    pub fn into_matrix(self) -> ItemMatrix {
        self.matrix
    }

    fn require(&self, allowed: &[Stage], operation: &'static str) -> Result<()> {
        if allowed.contains(&self.stage) {
            Ok(())
        } else {
            Err(Error::InvalidTransition {
                stage: self.stage,
                operation,
            })
        }
    }

    fn advance(&mut self, next: Stage) {
        if next != self.stage {
            info!(from = %self.stage, to = %next, "stage transition");
        }
        self.stage = next;
    }
}
