pub mod column;
pub mod condition;
pub mod config;
pub mod data_type;
pub mod database;
pub mod error;
pub mod table;
pub mod validator;
pub mod value;

pub use column::Column;
pub use condition::{Condition, Operator};
pub use config::DbConfig;
pub use data_type::DataType;
pub use database::{Database, DatabaseSnapshot, TableSnapshot};
pub use error::{DbError, Result};
pub use table::{ColumnDef, Row, Schema, Table};
pub use validator::validate;
pub use value::Value;
