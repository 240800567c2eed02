use std::fmt;

use bitvec::prelude::*;
use serde::{Deserialize, Serialize};

use crate::column::Column;
use crate::condition::{Condition, Predicate};
use crate::data_type::DataType;
use crate::error::{DbError, Result};
use crate::validator::validate;
use crate::value::Value;

/// Column definition in the schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: DataType,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// Ordered column declarations. Position `i` of every row belongs to `columns[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Schema {
    pub columns: Vec<ColumnDef>,
}

impl Schema {
    pub fn new(columns: Vec<ColumnDef>) -> Self {
        Self { columns }
    }

    /// Position of the first column called `name`.
    ///
    /// Repeated names are allowed; later declarations are shadowed.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// First column name that appears more than once, if any.
    pub fn duplicate_column(&self) -> Option<&str> {
        self.columns.iter().enumerate().find_map(|(i, col)| {
            self.columns[..i]
                .iter()
                .any(|prev| prev.name == col.name)
                .then_some(col.name.as_str())
        })
    }
}

/// One stored tuple, values in schema order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    pub values: Vec<Value>,
}

impl Row {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{value}")?;
        }
        f.write_str(")")
    }
}

/// An append-only table. Rows are stored column by column and rebuilt on read.
pub struct Table {
    pub name: String,
    pub schema: Schema,
    pub columns: Vec<Column>,
    row_count: usize,
}

impl Table {
    pub fn new(name: String, schema: Schema) -> Self {
        let columns = schema
            .columns
            .iter()
            .map(|column| Column::new(column.name.clone(), column.data_type))
            .collect();
        Self {
            name,
            schema,
            columns,
            row_count: 0,
        }
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Appends a row after checking it against the schema.
    ///
    /// All values are checked before any column is written, so a rejected
    /// row leaves the table exactly as it was.
    ///
    /// # Errors
    /// - [DbError::SchemaMismatch] when the arity differs from the schema.
    /// - [DbError::TypeMismatch] for the leftmost value whose type differs
    ///   from its column.
    pub fn insert(&mut self, values: Vec<Value>) -> Result<()> {
        if values.len() != self.schema.columns.len() {
            return Err(DbError::SchemaMismatch {
                table: self.name.clone(),
                expected: self.schema.columns.len(),
                got: values.len(),
            });
        }

        if let Some((value, col)) = values
            .iter()
            .zip(&self.schema.columns)
            .find(|(value, col)| !validate(value, col.data_type))
        {
            return Err(DbError::TypeMismatch {
                column: col.name.clone(),
                value: value.clone(),
                expected: col.data_type,
            });
        }

        for (column, value) in self.columns.iter_mut().zip(values) {
            column.push(value)?;
        }
        self.row_count += 1;
        Ok(())
    }

    pub fn get_row(&self, row_idx: usize) -> Option<Row> {
        if self.row_count <= row_idx {
            return None;
        }
        self.columns
            .iter()
            .map(|col| col.get(row_idx))
            .collect::<Option<Vec<_>>>()
            .map(Row::new)
    }

    /// Iterates over all rows in insertion order.
    pub fn rows(&self) -> impl Iterator<Item = Row> + '_ {
        (0..self.row_count).filter_map(|i| self.get_row(i))
    }

    /// Returns the rows matching every condition, in insertion order.
    ///
    /// The scan reads only the columns the conditions refer to and marks
    /// matching positions in a bitmap. Rows are built once every position has
    /// been evaluated, so an error yields no rows.
    ///
    /// # Errors
    /// - [DbError::UnknownColumn] if a condition names a missing column.
    /// - [DbError::NotComparable] if `<`/`>` reaches a non-integer operand.
    pub fn select(&self, conditions: &[Condition]) -> Result<Vec<Row>> {
        let predicate = Predicate::bind(&self.schema, conditions)?;
        if predicate.is_empty() {
            return Ok(self.rows().collect());
        }

        let mut selection = bitvec![0; self.row_count];
        for row_idx in 0..self.row_count {
            let value_at = |col: usize| self.columns.get(col).and_then(|c| c.get(row_idx));
            if predicate.matches(value_at)? {
                selection.set(row_idx, true);
            }
        }

        Ok(selection
            .iter_ones()
            .filter_map(|idx| self.get_row(idx))
            .collect())
    }
}
