//! Database error types.

use thiserror::Error;

use crate::{data_type::DataType, value::Value};

/// Database operation errors.
///
/// Every variant is a recoverable, caller-facing failure; the store is left
/// unchanged when one is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DbError {
    /// Table already exists
    #[error("Table '{0}' already exists")]
    TableAlreadyExists(String),

    /// Table not found
    #[error("Table '{0}' not found")]
    TableNotFound(String),

    /// Row arity differs from the schema column count
    #[error("Row has {got} values but table '{table}' has {expected} columns")]
    SchemaMismatch {
        table: String,
        expected: usize,
        got: usize,
    },

    /// Value does not satisfy its positional column type
    #[error("Type mismatch on column '{column}': value {value} is not of type {expected}")]
    TypeMismatch {
        column: String,
        value: Value,
        expected: DataType,
    },

    /// Condition references a column absent from the schema
    #[error("Unknown column '{0}'")]
    UnknownColumn(String),

    /// Ordering operator applied to a non-integral operand
    #[error("Value {0} is not comparable with an ordering operator")]
    NotComparable(Value),

    /// Operator tag outside the supported set
    #[error("Unsupported operator '{0}'")]
    UnsupportedOperator(String),

    /// Type tag outside the supported set
    #[error("Unknown column type '{0}'")]
    UnknownType(String),

    /// Schema repeats a column name while duplicates are rejected
    #[error("Column '{column}' is declared more than once in table '{table}'")]
    DuplicateColumn { table: String, column: String },

    /// Snapshot could not be encoded
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, DbError>;
