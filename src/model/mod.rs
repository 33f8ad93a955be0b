//! # Scale Model
//!
//! Clean DTOs shared by every stage: generator → discretizer → diagnostics
//! → composer → comparison.
//!
//! Design rule: no sampling, no factor fitting, no logging here.
//! This module is pure data plus validation.

pub mod matrix;
pub mod covariance;
pub mod rule;
pub mod report;
pub mod composite;
pub mod selection;

pub use matrix::{ItemMatrix, Column};
pub use covariance::CovarianceSpec;
pub use rule::{DiscretizationRule, Closure};
pub use report::{ReliabilityReport, ItemStats};
pub use composite::{Composite, CompositeMode};
pub use selection::ItemSelection;
