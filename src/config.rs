use serde::{Deserialize, Serialize};

/// Behavioural switches for a [crate::Database].
///
/// The default keeps the permissive schema rules: repeated column names are
/// accepted and lookups bind to the first declaration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DbConfig {
    /// Refuse `create_table` when a schema declares the same column name twice.
    pub reject_duplicate_columns: bool,
}

impl DbConfig {
    /// Configuration that rejects ambiguous schemas at creation time.
    pub fn strict() -> Self {
        Self {
            reject_duplicate_columns: true,
        }
    }
}
