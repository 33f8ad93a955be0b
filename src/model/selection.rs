//! ItemSelection: the manual keep / reverse decision taken after diagnosis.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::{Error, Result};

/// Which items go into the composite and which of those get reverse-coded.
///
/// This is caller policy. Nothing in the crate builds one from a report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSelection {
    keep: SmallVec<[String; 8]>,
    reverse: SmallVec<[String; 8]>,
}

impl ItemSelection {
    /// Keep every listed item, reverse none.
    pub fn keep_all<S: AsRef<str>>(items: &[S]) -> Self {
        Self {
            keep: items.iter().map(|s| s.as_ref().to_string()).collect(),
            reverse: SmallVec::new(),
        }
    }

    /// Exclude an item.
    pub fn drop_item(mut self, item: &str) -> Self {
        self.keep.retain(|k| k != item);
        self.reverse.retain(|r| r != item);
        self
    }

    /// Reverse-code an item that is kept.
    pub fn reverse_item(mut self, item: &str) -> Self {
        if !self.reverse.iter().any(|r| r == item) {
            self.reverse.push(item.to_string());
        }
        self
    }

    pub fn kept(&self) -> &[String] {
        &self.keep
    }

    pub fn reversed(&self) -> &[String] {
        &self.reverse
    }

    pub fn is_reversed(&self, item: &str) -> bool {
        self.reverse.iter().any(|r| r == item)
    }

    /// Every kept item must be in `available` and kept once; every reversed
    /// item must be kept.
    pub fn validate<S: AsRef<str>>(&self, available: &[S]) -> Result<()> {
        if self.keep.is_empty() {
            return Err(Error::InsufficientItems { required: 1, got: 0 });
        }
        for (i, item) in self.keep.iter().enumerate() {
            if !available.iter().any(|a| a.as_ref() == item) {
                return Err(Error::NotFound(format!("Item '{item}'")));
            }
            if self.keep[..i].contains(item) {
                return Err(Error::InvalidInput {
                    column: item.clone(),
                    row: 0,
                    message: "item kept twice".into(),
                });
            }
        }
        for item in &self.reverse {
            if !self.keep.contains(item) {
                return Err(Error::NotFound(format!("Reversed item '{item}' is not kept")));
            }
        }
        Ok(())
    }
}
