//! # likert-rs: Synthetic Likert Scales, Reliability and Composites
//!
//! Generates survey-style datasets with an exactly known correlation
//! structure, discretizes them onto a 1–5 Likert scale, diagnoses the item
//! set (Cronbach's alpha, alpha-if-dropped, reverse-keyed items) and builds
//! composite scale scores by plain averaging or factor weighting.
//!
//! ## Design Principles
//!
//! 1. **Values in, values out**: every stage takes explicit inputs and returns
//!    owned results. There is no global state between dataset variants.
//! 2. **Trait seams at the collaborators**: `Sampler` draws normal variates,
//!    `FactorExtractor` fits the one-factor model. Both have in-crate defaults.
//! 3. **Humans decide**: the reliability report flags items, but which items
//!    are reversed or dropped is an explicit `ItemSelection` supplied by the caller.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use likert_rs::{CovarianceSpec, DiscretizationRule, compute_alpha, discretize, generate};
//!
//! # fn example() -> likert_rs::Result<()> {
//! let spec = CovarianceSpec::equicorrelated(&["x1", "x2", "x3"], 0.5)?;
//! let continuous = generate(&spec, 200, 42)?;
//! let likert = discretize(&continuous, &DiscretizationRule::likert5())?;
//!
//! let report = compute_alpha(&likert, &["x1", "x2", "x3"], false)?;
//! println!("standardized alpha = {:.3}", report.std_alpha);
//! # Ok(())
//! # }
//! ```
//!
//! ## Pipeline Stages
//!
//! | Stage | Operation | Module |
//! |-------|-----------|--------|
//! | Generated | `generate` | `generate` |
//! | Discretized | `discretize` | `discretize` |
//! | Diagnosed | `compute_alpha` | `reliability` |
//! | ItemsSelected | `ItemSelection` (manual) | `pipeline` |
//! | Composited | `composite` | `compose` |
//! | Compared | `fit_line` | `compare` |

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod stats;
pub mod generate;
pub mod discretize;
pub mod reliability;
pub mod compose;
pub mod compare;
pub mod pipeline;
pub mod scenarios;
pub mod config;

// ============================================================================
// Re-exports: Model (the DTOs)
// ============================================================================

pub use model::{
    ItemMatrix, Column, CovarianceSpec, DiscretizationRule, Closure,
    ReliabilityReport, ItemStats, Composite, CompositeMode, ItemSelection,
};

// ============================================================================
// Re-exports: Operations
// ============================================================================

pub use generate::{generate, generate_with, Sampler, XoshiroSampler};
pub use discretize::{discretize, discretize_columns, reverse_code};
pub use reliability::{compute_alpha, compute_alpha_with, AlphaOptions};
pub use compose::{
    composite, unweighted_composite, weighted_composite, weighted_composite_with,
    FactorExtractor, FactorSolution, PrincipalAxis,
};
pub use compare::{compare, fit_line, Comparison, LinearFit};

// ============================================================================
// Re-exports: Pipeline + Config
// ============================================================================

pub use pipeline::{ScalePipeline, Stage};
pub use config::PipelineConfig;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid covariance spec: {0}")]
    InvalidSpec(String),

    #[error("Invalid input in column '{column}' at row {row}: {message}")]
    InvalidInput { column: String, row: usize, message: String },

    #[error("Insufficient items: need at least {required}, got {got}")]
    InsufficientItems { required: usize, got: usize },

    #[error("Degenerate variance: '{item}' has zero variance")]
    DegenerateVariance { item: String },

    #[error("Factor extraction failed: {0}")]
    FactorExtractionFailed(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid transition: cannot {operation} in stage {stage}")]
    InvalidTransition { stage: Stage, operation: &'static str },

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
