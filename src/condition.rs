use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    error::{DbError, Result},
    table::Schema,
    value::Value,
};

/// Comparison operators usable in a [Condition].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    /// Equal to
    Eq,
    /// Not equal to
    Neq,
    /// Lower than
    Lt,
    /// Greater than
    Gt,
}

impl Operator {
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Neq => "!=",
            Self::Lt => "<",
            Self::Gt => ">",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Operator {
    type Err = DbError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "=" | "==" => Ok(Self::Eq),
            "!=" | "<>" => Ok(Self::Neq),
            "<" => Ok(Self::Lt),
            ">" => Ok(Self::Gt),
            other => Err(DbError::UnsupportedOperator(other.to_string())),
        }
    }
}

/// A single `column <op> value` predicate. A query combines conditions with AND.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub column: String,
    pub op: Operator,
    pub value: Value,
}

impl Condition {
    pub fn new(column: impl Into<String>, op: Operator, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            op,
            value: value.into(),
        }
    }

    /// Builds a condition from a textual operator tag such as `"!="`.
    ///
    /// # Errors
    /// Returns [DbError::UnsupportedOperator] for a tag outside `= != < >`.
    pub fn parse(column: impl Into<String>, op: &str, value: impl Into<Value>) -> Result<Self> {
        Ok(Self::new(column, op.parse()?, value))
    }

    pub fn equals(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(column, Operator::Eq, value)
    }

    pub fn not_equals(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(column, Operator::Neq, value)
    }

    pub fn less_than(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(column, Operator::Lt, value)
    }

    pub fn greater_than(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(column, Operator::Gt, value)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.column, self.op, self.value)
    }
}

/// Conditions bound to column positions of one schema.
///
/// Binding happens once per query, so an unknown column is reported before
/// any row is looked at.
#[derive(Debug)]
pub(crate) struct Predicate<'a> {
    bound: Vec<(usize, &'a Condition)>,
}

impl<'a> Predicate<'a> {
    /// Resolves every condition's column against `schema` (first match wins).
    ///
    /// # Errors
    /// Returns [DbError::UnknownColumn] for the first condition whose column
    /// is not declared.
    pub(crate) fn bind(schema: &Schema, conditions: &'a [Condition]) -> Result<Self> {
        let bound = conditions
            .iter()
            .map(|cond| {
                schema
                    .column_index(&cond.column)
                    .map(|idx| (idx, cond))
                    .ok_or_else(|| DbError::UnknownColumn(cond.column.clone()))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { bound })
    }

    /// True when no condition was supplied, every row matches.
    pub(crate) fn is_empty(&self) -> bool {
        self.bound.is_empty()
    }

    /// Evaluates the conjunction, reading only the bound columns through
    /// `value_at(column_index)`.
    ///
    /// Stops at the first condition that is false or fails. A column that
    /// `value_at` cannot supply is reported as [DbError::UnknownColumn].
    pub(crate) fn matches<F>(&self, mut value_at: F) -> Result<bool>
    where
        F: FnMut(usize) -> Option<Value>,
    {
        for (idx, cond) in &self.bound {
            let value =
                value_at(*idx).ok_or_else(|| DbError::UnknownColumn(cond.column.clone()))?;
            if !compare(&value, cond.op, &cond.value)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// Compares a stored value with a condition value.
///
/// # Errors
/// [DbError::NotComparable] when `Lt`/`Gt` meets a non-integer operand; the
/// row side is reported first.
pub fn compare(left: &Value, op: Operator, right: &Value) -> Result<bool> {
    match op {
        Operator::Eq => Ok(left == right),
        Operator::Neq => Ok(left != right),
        Operator::Lt | Operator::Gt => {
            let l = left
                .as_int()
                .ok_or_else(|| DbError::NotComparable(left.clone()))?;
            let r = right
                .as_int()
                .ok_or_else(|| DbError::NotComparable(right.clone()))?;
            Ok(if op == Operator::Lt { l < r } else { l > r })
        }
    }
}
