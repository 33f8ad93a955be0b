//! Pipeline stages.

use serde::{Deserialize, Serialize};

/// Where a dataset variant is in its one-way walk.
///
/// `Generated → Discretized → Diagnosed → ItemsSelected → Composited → Compared`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stage {
    Generated,
    Discretized,
    Diagnosed,
    ItemsSelected,
    Composited,
    /// Terminal.
    Compared,
}

impl Stage {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::Compared)
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Generated => write!(f, "Generated"),
            Stage::Discretized => write!(f, "Discretized"),
            Stage::Diagnosed => write!(f, "Diagnosed"),
            Stage::ItemsSelected => write!(f, "ItemsSelected"),
            Stage::Composited => write!(f, "Composited"),
            Stage::Compared => write!(f, "Compared"),
        }
    }
}
