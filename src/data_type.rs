use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::DbError;

/// Represents the supported data types in the database schema.
/// These types define the structure of columns and the expected format of values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    /// A 64-bit signed integer.
    #[serde(rename = "int", alias = "integer")]
    Int,
    /// A variable-length UTF-8 character string.
    #[serde(rename = "string", alias = "text")]
    Text,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Text => "string",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = DbError;

    /// Parses a textual type tag. Unknown tags are rejected, nothing is guessed.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "int" | "integer" => Ok(Self::Int),
            "string" | "text" => Ok(Self::Text),
            _ => Err(DbError::UnknownType(s.to_string())),
        }
    }
}
