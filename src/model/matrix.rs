//! ItemMatrix: N respondents × K named response columns.

use hashbrown::HashMap;
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// One named column of responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<f64>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self { name: name.into(), values }
    }
}

/// A table of respondents (rows) × items (columns).
///
/// Column names are unique and keep their insertion order, so item `x3`
/// means the same column at generation, discretization and analysis time.
/// Missing responses are stored as `NaN`.
///
/// Serializes as the plain list of columns; the name index is rebuilt on
/// deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Column>", into = "Vec<Column>")]
pub struct ItemMatrix {
    n_rows: usize,
    columns: Vec<Column>,
    /// column name → position in `columns`
    index: HashMap<String, usize>,
}

impl ItemMatrix {
    /// Empty matrix. The first pushed column fixes the row count.
    pub fn new() -> Self {
        Self {
            n_rows: 0,
            columns: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Build from `(name, values)` pairs.
    pub fn from_columns<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vec<f64>)>,
        S: Into<String>,
    {
        let mut matrix = Self::new();
        for (name, values) in columns {
            matrix.push_column(name, values)?;
        }
        Ok(matrix)
    }

    /// Build from a dense `n × k` matrix and `k` column names.
    pub fn from_dmatrix<S: AsRef<str>>(names: &[S], data: &DMatrix<f64>) -> Result<Self> {
        if names.len() != data.ncols() {
            return Err(Error::InvalidInput {
                column: names.first().map(|n| n.as_ref().to_string()).unwrap_or_default(),
                row: 0,
                message: format!("{} names for {} columns", names.len(), data.ncols()),
            });
        }
        let mut matrix = Self::new();
        for (j, name) in names.iter().enumerate() {
            matrix.push_column(name.as_ref(), data.column(j).iter().copied().collect())?;
        }
        Ok(matrix)
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Borrow a column's values by name.
    pub fn column(&self, name: &str) -> Result<&[f64]> {
        let idx = self.position(name)?;
        Ok(&self.columns[idx].values)
    }

    /// Append a new column. Fails on a duplicate name or a row-count mismatch.
    pub fn push_column(&mut self, name: impl Into<String>, values: Vec<f64>) -> Result<()> {
        let name = name.into();
        if self.index.contains_key(&name) {
            return Err(Error::InvalidInput {
                column: name,
                row: 0,
                message: "duplicate column name".into(),
            });
        }
        if self.columns.is_empty() {
            self.n_rows = values.len();
        } else if values.len() != self.n_rows {
            return Err(Error::InvalidInput {
                column: name,
                row: values.len().min(self.n_rows),
                message: format!("column has {} rows, matrix has {}", values.len(), self.n_rows),
            });
        }
        self.index.insert(name.clone(), self.columns.len());
        self.columns.push(Column { name, values });
        Ok(())
    }

    /// Overwrite an existing column in place, keeping its position.
    pub fn replace_column(&mut self, name: &str, values: Vec<f64>) -> Result<()> {
        let idx = self.position(name)?;
        if values.len() != self.n_rows {
            return Err(Error::InvalidInput {
                column: name.to_string(),
                row: values.len().min(self.n_rows),
                message: format!("column has {} rows, matrix has {}", values.len(), self.n_rows),
            });
        }
        self.columns[idx].values = values;
        Ok(())
    }

    /// Dense `n × k` copy of the named columns, in the order given.
    pub fn select<S: AsRef<str>>(&self, items: &[S]) -> Result<DMatrix<f64>> {
        let positions = items
            .iter()
            .map(|item| self.position(item.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(DMatrix::from_fn(self.n_rows, positions.len(), |i, j| {
            self.columns[positions[j]].values[i]
        }))
    }

    fn position(&self, name: &str) -> Result<usize> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| Error::NotFound(format!("Column '{name}'")))
    }
}

impl Default for ItemMatrix {
    fn default() -> Self {
        Self::new()
    }
}

impl TryFrom<Vec<Column>> for ItemMatrix {
    type Error = Error;

    fn try_from(columns: Vec<Column>) -> Result<Self> {
        Self::from_columns(columns.into_iter().map(|c| (c.name, c.values)))
    }
}

impl From<ItemMatrix> for Vec<Column> {
    fn from(matrix: ItemMatrix) -> Self {
        matrix.columns
    }
}
