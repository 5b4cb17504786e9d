use std::fmt::{self, Display};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::JoinError;
use crate::models::value::Value;

/// A named column of values.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Column {
    name: String,
    values: Vec<Value>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Column {
            name: name.into(),
            values,
        }
    }

    /// Integer column constructor.
    pub fn ints(name: impl Into<String>, values: Vec<i64>) -> Self {
        Column::new(name, values.into_iter().map(Value::Int).collect())
    }

    /// String column constructor.
    pub fn strs(name: impl Into<String>, values: Vec<&str>) -> Self {
        Column::new(name, values.into_iter().map(Value::from).collect())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// An ordered collection of equal-length named columns.
///
/// `Frame` is the in-memory tabular substrate the join engine runs against:
/// it only needs column lookup, row gather and row iteration. Construction
/// validates that all columns share one length and that names are unique.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Frame {
    columns: Vec<Column>,
    n_rows: usize,
}

impl Frame {
    pub fn new(columns: Vec<Column>) -> Result<Self, JoinError> {
        let n_rows = columns.first().map_or(0, Column::len);
        for col in &columns {
            if col.len() != n_rows {
                return Err(JoinError::LengthMismatch {
                    column: col.name().to_string(),
                    len: col.len(),
                    expected: n_rows,
                });
            }
        }
        for (i, col) in columns.iter().enumerate() {
            if columns[..i].iter().any(|c| c.name() == col.name()) {
                return Err(JoinError::DuplicateColumn(col.name().to_string()));
            }
        }
        Ok(Frame { columns, n_rows })
    }

    /// A frame with the given column names and zero rows.
    pub fn empty(names: &[String]) -> Self {
        Frame {
            columns: names
                .iter()
                .map(|n| Column::new(n.clone(), Vec::new()))
                .collect(),
            n_rows: 0,
        }
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(Column::name)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name() == name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.column_index(name).map(|i| &self.columns[i])
    }

    /// Cell accessor; panics on out-of-range indices like slice indexing.
    #[inline]
    pub fn value(&self, row: usize, col: usize) -> &Value {
        &self.columns[col].values[row]
    }

    /// Iterate over one row's cells in column order.
    pub fn row(&self, row: usize) -> impl Iterator<Item = &Value> {
        self.columns.iter().map(move |c| &c.values[row])
    }

    /// Materialize a new frame holding the given rows, in order. Row indices
    /// may repeat.
    pub fn gather(&self, rows: &[usize]) -> Frame {
        let columns = self
            .columns
            .iter()
            .map(|c| {
                Column::new(
                    c.name().to_string(),
                    rows.iter().map(|&r| c.values[r].clone()).collect(),
                )
            })
            .collect();
        Frame {
            columns,
            n_rows: rows.len(),
        }
    }
}

impl Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.names().collect();
        writeln!(f, "{}", names.join("\t"))?;
        for row in 0..self.n_rows {
            let cells: Vec<String> = self.row(row).map(|v| v.to_string()).collect();
            writeln!(f, "{}", cells.join("\t"))?;
        }
        Ok(())
    }
}
