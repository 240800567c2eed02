//! Type validation of a single value against a declared column type.

use crate::{data_type::DataType, value::Value};

/// Returns `true` when `value` may be stored in a column declared as `data_type`.
///
/// Integer columns accept only [Value::Int], text columns only [Value::Text].
pub fn validate(value: &Value, data_type: DataType) -> bool {
    matches!(
        (value, data_type),
        (Value::Int(_), DataType::Int) | (Value::Text(_), DataType::Text)
    )
}
