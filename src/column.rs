use std::sync::Arc;

use crate::data_type::DataType;
use crate::error::{DbError, Result};
use crate::validator::validate;
use crate::value::Value;

/// Physical storage for column data.
/// Each variant wraps a collection of a specific type to ensure contiguous memory
/// allocation (columnar storage).
#[derive(Debug, Clone)]
pub enum ColumnData {
    /// Vector of 64-bit integers.
    Int(Vec<i64>),
    /// Vector of thread-safe atomic reference-counted strings.
    Text(Vec<Arc<str>>),
}

/// Represents a column within a table.
/// It combines metadata (name, type) with the actual data.
#[derive(Debug, Clone)]
pub struct Column {
    /// The name of the column.
    pub name: String,
    /// The logical data type of the column.
    pub data_type: DataType,
    /// The actual values stored in the column.
    pub data: ColumnData,
}

impl Column {
    /// Creates a new, empty column with the specified name and data type.
    /// The underlying data storage is initialized according to the data type.
    pub fn new(name: String, data_type: DataType) -> Self {
        let data = match data_type {
            DataType::Int => ColumnData::Int(vec![]),
            DataType::Text => ColumnData::Text(vec![]),
        };
        Self {
            name,
            data_type,
            data,
        }
    }

    /// Appends a new value to the end of the column.
    ///
    /// # Errors
    /// Returns [DbError::TypeMismatch] if the value's type does not match the
    /// column's data type. The column is left untouched in that case.
    ///
    /// # Example
    /// ```
    /// # use tinydb::column::Column;
    /// # use tinydb::data_type::DataType;
    /// # use tinydb::value::Value;
    /// let mut col = Column::new("age".into(), DataType::Int);
    /// col.push(Value::Int(30)).unwrap();
    /// assert!(col.push(Value::from("thirty")).is_err());
    ///
    /// assert_eq!(col.len(), 1);
    /// ```
    pub fn push(&mut self, value: Value) -> Result<()> {
        if !validate(&value, self.data_type) {
            return Err(DbError::TypeMismatch {
                column: self.name.clone(),
                value,
                expected: self.data_type,
            });
        }

        match (&mut self.data, value) {
            (ColumnData::Int(col), Value::Int(v)) => col.push(v),
            (ColumnData::Text(col), Value::Text(v)) => col.push(v),
            // storage variant is derived from data_type in `new`
            _ => unreachable!("column {} storage does not match its type", self.name),
        }

        Ok(())
    }

    /// Returns the number of rows currently stored in the column.
    pub fn len(&self) -> usize {
        match &self.data {
            ColumnData::Int(col) => col.len(),
            ColumnData::Text(col) => col.len(),
        }
    }

    /// Returns true if there is no row in the column, else false.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Retrieves the value at the specified row index.
    ///
    /// Returns `Some(Value)` if the index is valid, or `None` if it is out of bounds.
    pub fn get(&self, row_idx: usize) -> Option<Value> {
        match &self.data {
            ColumnData::Int(col) => col.get(row_idx).map(|v| Value::Int(*v)),
            ColumnData::Text(col) => col.get(row_idx).map(|v| Value::Text(Arc::clone(v))),
        }
    }
}
