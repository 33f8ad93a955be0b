//! # Likert Discretizer
//!
//! Bins continuous responses into ordinal labels with a `DiscretizationRule`,
//! and provides the reverse-coding transform used for negatively keyed items.
//!
//! Both operations are pure and column-local; labels are stored back as
//! `f64` so ordinal and continuous columns share one `ItemMatrix`.

use tracing::debug;

use crate::model::{DiscretizationRule, ItemMatrix};
use crate::{Error, Result};

/// Suffix for appended reverse-coded columns.
pub const REVERSED_SUFFIX: &str = "_r";

/// Discretize one column. `column` names the source in error reports.
pub fn discretize_values(
    values: &[f64],
    rule: &DiscretizationRule,
    column: &str,
) -> Result<Vec<f64>> {
    values
        .iter()
        .enumerate()
        .map(|(row, &v)| {
            rule.label(v).map(f64::from).ok_or_else(|| Error::InvalidInput {
                column: column.to_string(),
                row,
                message: if v.is_nan() {
                    "missing value".into()
                } else {
                    format!("non-finite value {v}")
                },
            })
        })
        .collect()
}

/// Discretize every column.
pub fn discretize(matrix: &ItemMatrix, rule: &DiscretizationRule) -> Result<ItemMatrix> {
    let names: Vec<String> = matrix.names().map(str::to_string).collect();
    discretize_columns(matrix, &names, rule)
}

/// Discretize the named columns; all other columns are copied unchanged.
pub fn discretize_columns<S: AsRef<str>>(
    matrix: &ItemMatrix,
    columns: &[S],
    rule: &DiscretizationRule,
) -> Result<ItemMatrix> {
    let mut out = matrix.clone();
    for column in columns {
        let name = column.as_ref();
        let labels = discretize_values(matrix.column(name)?, rule, name)?;
        out.replace_column(name, labels)?;
    }
    debug!(columns = columns.len(), bins = rule.max_label(), "discretized");
    Ok(out)
}

/// `(scale_max + 1) - x` for each value. Applying it twice is the identity.
pub fn reverse_code(values: &[f64], scale_max: f64) -> Vec<f64> {
    values.iter().map(|v| (scale_max + 1.0) - v).collect()
}

/// Append `<item>_r`, the reverse-coded copy of `item`, and return its name.
pub fn append_reversed(matrix: &mut ItemMatrix, item: &str, scale_max: f64) -> Result<String> {
    let reversed = reverse_code(matrix.column(item)?, scale_max);
    let name = format!("{item}{REVERSED_SUFFIX}");
    matrix.push_column(name.clone(), reversed)?;
    Ok(name)
}
