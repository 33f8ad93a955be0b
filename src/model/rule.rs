//! DiscretizationRule: cut points mapping a continuous response to an ordinal label.

use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};

use crate::{Error, Result};

/// Which side of each bin includes its break point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Closure {
    /// `(b_i, b_{i+1}]`: a value on a break belongs to the lower bin.
    #[default]
    Right,
    /// `[b_i, b_{i+1})`: a value on a break belongs to the upper bin.
    Left,
}

/// Strictly increasing finite break points.
///
/// With breaks `b_1 < … < b_m` the bins are
/// `(-∞, b_1], (b_1, b_2], …, (b_m, +∞)` labelled `1..=m+1` under the
/// default right-closed convention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRule")]
pub struct DiscretizationRule {
    breaks: SmallVec<[f64; 6]>,
    closure: Closure,
}

/// Labels are `u8`, so at most 254 breaks (255 bins).
pub const MAX_BREAKS: usize = u8::MAX as usize - 1;

#[derive(Deserialize)]
struct RawRule {
    breaks: Vec<f64>,
    #[serde(default)]
    closure: Closure,
}

impl TryFrom<RawRule> for DiscretizationRule {
    type Error = Error;

    fn try_from(raw: RawRule) -> Result<Self> {
        Ok(Self::new(raw.breaks)?.with_closure(raw.closure))
    }
}

impl DiscretizationRule {
    pub fn new(breaks: impl IntoIterator<Item = f64>) -> Result<Self> {
        let breaks: SmallVec<[f64; 6]> = breaks.into_iter().collect();
        if breaks.is_empty() {
            return Err(Error::InvalidSpec("a rule needs at least one break".into()));
        }
        if breaks.len() > MAX_BREAKS {
            return Err(Error::InvalidSpec(format!(
                "{} breaks exceed the maximum of {MAX_BREAKS}",
                breaks.len()
            )));
        }
        if breaks.iter().any(|b| !b.is_finite()) {
            return Err(Error::InvalidSpec("breaks must be finite".into()));
        }
        if breaks.windows(2).any(|w| w[0] >= w[1]) {
            return Err(Error::InvalidSpec(format!(
                "breaks must be strictly increasing, got {:?}",
                breaks.as_slice()
            )));
        }
        Ok(Self { breaks, closure: Closure::Right })
    }

    /// The standard 5-point rule: -1.5, -0.5, 0.5, 1.5, right-closed.
    pub fn likert5() -> Self {
        Self {
            breaks: smallvec![-1.5, -0.5, 0.5, 1.5],
            closure: Closure::Right,
        }
    }

    pub fn with_closure(mut self, closure: Closure) -> Self {
        self.closure = closure;
        self
    }

    pub fn breaks(&self) -> &[f64] {
        &self.breaks
    }

    pub fn closure(&self) -> Closure {
        self.closure
    }

    /// Highest label (number of bins).
    pub fn max_label(&self) -> u8 {
        (self.breaks.len() + 1) as u8
    }

    /// Label for a finite value; `None` for NaN or ±∞.
    pub fn label(&self, value: f64) -> Option<u8> {
        if !value.is_finite() {
            return None;
        }
        let below = match self.closure {
            Closure::Right => self.breaks.iter().take_while(|&&b| value > b).count(),
            Closure::Left => self.breaks.iter().take_while(|&&b| value >= b).count(),
        };
        Some(below as u8 + 1)
    }
}

impl Default for DiscretizationRule {
    fn default() -> Self {
        Self::likert5()
    }
}
