use std::{collections::HashMap, fmt};

use serde::Serialize;
use tracing::{debug, trace};

use crate::{
    condition::Condition,
    config::DbConfig,
    error::{DbError, Result},
    table::{ColumnDef, Row, Schema, Table},
    value::Value,
};

/// The main entry point for the in-memory database engine.
/// It owns a collection of tables and exposes create, insert and select.
#[derive(Default)]
pub struct Database {
    /// A map of table names to their respective [Table] structures.
    tables: HashMap<String, Table>,
    config: DbConfig,
}

/// Read-only copy of the whole database, for inspection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatabaseSnapshot {
    /// Tables sorted by name.
    pub tables: Vec<TableSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableSnapshot {
    pub name: String,
    pub schema: Vec<ColumnDef>,
    pub rows: Vec<Row>,
}

impl Database {
    /// Creates a new, empty database instance.
    pub fn new() -> Self {
        Self::with_config(DbConfig::default())
    }

    pub fn with_config(config: DbConfig) -> Self {
        Self {
            tables: HashMap::default(),
            config,
        }
    }

    /// Creates a new table in the database.
    ///
    /// # Errors
    /// - [DbError::TableAlreadyExists] if a table with the same name exists.
    /// - [DbError::DuplicateColumn] if the schema repeats a column name and
    ///   [DbConfig::reject_duplicate_columns] is set.
    ///
    /// # Example
    /// ```
    /// use tinydb::{ColumnDef, Database, DataType, DbError, Schema};
    ///
    /// let mut db = Database::new();
    /// let schema = Schema::new(vec![ColumnDef::new("id", DataType::Int)]);
    ///
    /// db.create_table("users", schema.clone()).unwrap();
    /// assert_eq!(
    ///     db.create_table("users", schema),
    ///     Err(DbError::TableAlreadyExists("users".into()))
    /// );
    /// ```
    pub fn create_table(&mut self, name: impl Into<String>, schema: Schema) -> Result<()> {
        let name = name.into();
        if self.tables.contains_key(&name) {
            return Err(DbError::TableAlreadyExists(name));
        }
        if self.config.reject_duplicate_columns {
            if let Some(column) = schema.duplicate_column() {
                return Err(DbError::DuplicateColumn {
                    table: name,
                    column: column.to_string(),
                });
            }
        }

        debug!(table = %name, columns = schema.columns.len(), "created table");
        let table = Table::new(name.clone(), schema);
        self.tables.insert(name, table);
        Ok(())
    }

    /// Retrieves a reference to a table by name.
    pub fn get_table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    fn table(&self, name: &str) -> Result<&Table> {
        self.tables
            .get(name)
            .ok_or_else(|| DbError::TableNotFound(name.to_string()))
    }

    /// Returns the names of all tables, sorted.
    pub fn list_tables(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tables.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Appends one row to `table_name`.
    ///
    /// Insertion is all-or-nothing: on any error the table is unchanged.
    ///
    /// # Errors
    /// - [DbError::TableNotFound] if the table does not exist.
    /// - [DbError::SchemaMismatch] if the number of values differs from the
    ///   number of columns.
    /// - [DbError::TypeMismatch] for the first value that does not fit its column.
    ///
    /// # Example
    /// ```
    /// use tinydb::{ColumnDef, Database, DataType, Schema, Value};
    ///
    /// let mut db = Database::new();
    /// db.create_table(
    ///     "users",
    ///     Schema::new(vec![
    ///         ColumnDef::new("id", DataType::Int),
    ///         ColumnDef::new("name", DataType::Text),
    ///     ]),
    /// )
    /// .unwrap();
    ///
    /// db.insert_row("users", vec![Value::Int(1), "Alice".into()]).unwrap();
    /// assert!(db.insert_row("users", vec!["x".into(), "Alice".into()]).is_err());
    /// assert_eq!(db.get_table("users").unwrap().row_count(), 1);
    /// ```
    pub fn insert_row(&mut self, table_name: &str, values: Vec<Value>) -> Result<()> {
        let table = self
            .tables
            .get_mut(table_name)
            .ok_or_else(|| DbError::TableNotFound(table_name.to_string()))?;

        table.insert(values)?;
        debug!(table = %table_name, rows = table.row_count(), "inserted row");
        Ok(())
    }

    /// Returns the rows of `table_name` matching every condition, in
    /// insertion order. An empty condition list returns every row.
    ///
    /// # Errors
    /// - [DbError::TableNotFound] if the table does not exist.
    /// - [DbError::UnknownColumn] if a condition names a missing column.
    /// - [DbError::NotComparable] if `<` or `>` meets a non-integer operand.
    ///
    /// No rows are returned when an error occurs.
    ///
    /// # Example
    /// ```
    /// use tinydb::{ColumnDef, Condition, Database, DataType, Schema, Value};
    ///
    /// let mut db = Database::new();
    /// db.create_table(
    ///     "users",
    ///     Schema::new(vec![
    ///         ColumnDef::new("id", DataType::Int),
    ///         ColumnDef::new("name", DataType::Text),
    ///     ]),
    /// )
    /// .unwrap();
    /// db.insert_row("users", vec![Value::Int(1), "Alice".into()]).unwrap();
    /// db.insert_row("users", vec![Value::Int(2), "Bob".into()]).unwrap();
    ///
    /// let rows = db
    ///     .select_rows("users", &[Condition::greater_than("id", 1)])
    ///     .unwrap();
    /// assert_eq!(rows.len(), 1);
    /// assert_eq!(rows[0].values, vec![Value::Int(2), "Bob".into()]);
    /// ```
    pub fn select_rows(&self, table_name: &str, conditions: &[Condition]) -> Result<Vec<Row>> {
        let table = self.table(table_name)?;
        let rows = table.select(conditions)?;
        trace!(
            table = %table_name,
            conditions = conditions.len(),
            scanned = table.row_count(),
            matched = rows.len(),
            "selected rows"
        );
        Ok(rows)
    }

    /// Copies the current state of every table, sorted by table name.
    pub fn snapshot(&self) -> DatabaseSnapshot {
        let tables = self
            .list_tables()
            .into_iter()
            .filter_map(|name| self.tables.get(name))
            .map(|table| TableSnapshot {
                name: table.name.clone(),
                schema: table.schema.columns.clone(),
                rows: table.rows().collect(),
            })
            .collect();
        DatabaseSnapshot { tables }
    }

    /// Pretty JSON rendering of [Database::snapshot].
    pub fn dump_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.snapshot())
            .map_err(|e| DbError::SerializationError(e.to_string()))
    }
}

impl fmt::Display for DatabaseSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for table in &self.tables {
            writeln!(f, "Table: {}", table.name)?;
            writeln!(f, "Schema:")?;
            for col in &table.schema {
                writeln!(f, "- {} ({})", col.name, col.data_type)?;
            }
            writeln!(f, "Rows:")?;
            for row in &table.rows {
                writeln!(f, "{row}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_type::DataType;

    fn simple_schema() -> Schema {
        Schema::new(vec![
            ColumnDef::new("id", DataType::Int),
            ColumnDef::new("name", DataType::Text),
        ])
    }

    fn users_db() -> Database {
        let mut db = Database::new();
        db.create_table("users", simple_schema()).unwrap();
        db.insert_row("users", vec![Value::Int(1), "Alice".into()])
            .unwrap();
        db.insert_row("users", vec![Value::Int(2), "Bob".into()])
            .unwrap();
        db
    }

    fn ids(rows: &[Row]) -> Vec<i64> {
        rows.iter().filter_map(|r| r.values[0].as_int()).collect()
    }

    #[test]
    fn test_create_table() {
        let mut db = Database::new();

        assert!(db.is_empty());
        assert!(db.create_table("users", simple_schema()).is_ok());
        assert!(db.get_table("users").is_some());
        assert_eq!(db.len(), 1);
    }

    #[test]
    fn test_duplicate_table_error() {
        let mut db = Database::new();

        db.create_table("users", simple_schema()).unwrap();
        let err = db.create_table("users", simple_schema());

        assert_eq!(err, Err(DbError::TableAlreadyExists("users".into())));
        assert_eq!(db.len(), 1);
    }

    #[test]
    fn test_list_tables() {
        let mut db = Database::new();

        db.create_table("users", simple_schema()).unwrap();
        db.create_table("posts", simple_schema()).unwrap();

        assert_eq!(db.list_tables(), vec!["posts", "users"]);
    }

    #[test]
    fn test_duplicate_columns_depend_on_config() {
        let schema = Schema::new(vec![
            ColumnDef::new("id", DataType::Int),
            ColumnDef::new("id", DataType::Text),
        ]);

        let mut db = Database::new();
        assert!(db.create_table("t", schema.clone()).is_ok());

        let mut strict = Database::with_config(DbConfig::strict());
        assert_eq!(
            strict.create_table("t", schema),
            Err(DbError::DuplicateColumn {
                table: "t".into(),
                column: "id".into(),
            })
        );
        assert!(strict.is_empty());
    }

    #[test]
    fn test_unknown_table() {
        let mut db = Database::new();

        assert_eq!(
            db.insert_row("ghost", vec![Value::Int(1)]),
            Err(DbError::TableNotFound("ghost".into()))
        );
        assert_eq!(
            db.select_rows("ghost", &[]),
            Err(DbError::TableNotFound("ghost".into()))
        );
    }

    #[test]
    fn test_users_scenario() {
        let mut db = users_db();

        assert!(matches!(
            db.insert_row("users", vec!["x".into(), "Alice".into()]),
            Err(DbError::TypeMismatch { .. })
        ));
        assert!(matches!(
            db.insert_row("users", vec![Value::Int(3), Value::Int(12345)]),
            Err(DbError::TypeMismatch { .. })
        ));
        assert_eq!(db.get_table("users").unwrap().row_count(), 2);

        let eq = db
            .select_rows("users", &[Condition::equals("id", 1)])
            .unwrap();
        assert_eq!(eq, vec![Row::new(vec![Value::Int(1), "Alice".into()])]);

        let neq = db
            .select_rows("users", &[Condition::not_equals("id", 1)])
            .unwrap();
        assert_eq!(neq, vec![Row::new(vec![Value::Int(2), "Bob".into()])]);

        let gt = db
            .select_rows("users", &[Condition::greater_than("id", 1)])
            .unwrap();
        assert_eq!(ids(&gt), vec![2]);

        let lt = db
            .select_rows("users", &[Condition::less_than("id", 2)])
            .unwrap();
        assert_eq!(ids(&lt), vec![1]);
    }

    #[test]
    fn test_select_all_in_insertion_order() {
        let db = users_db();

        let rows = db.select_rows("users", &[]).unwrap();
        assert_eq!(ids(&rows), vec![1, 2]);
    }

    #[test]
    fn test_select_no_match_is_empty() {
        let db = users_db();

        let rows = db
            .select_rows("users", &[Condition::greater_than("id", 100)])
            .unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_select_conjunction() {
        let db = users_db();

        let rows = db
            .select_rows(
                "users",
                &[
                    Condition::greater_than("id", 0),
                    Condition::equals("name", "Bob"),
                ],
            )
            .unwrap();
        assert_eq!(ids(&rows), vec![2]);
    }

    #[test]
    fn test_select_errors() {
        let db = users_db();

        assert_eq!(
            db.select_rows("users", &[Condition::equals("age", 3)]),
            Err(DbError::UnknownColumn("age".into()))
        );
        // a later bad column still fails the query
        assert_eq!(
            db.select_rows(
                "users",
                &[Condition::equals("id", 99), Condition::equals("age", 3)]
            ),
            Err(DbError::UnknownColumn("age".into()))
        );
        assert_eq!(
            db.select_rows("users", &[Condition::greater_than("id", "1")]),
            Err(DbError::NotComparable("1".into()))
        );
        assert_eq!(
            db.select_rows("users", &[Condition::less_than("name", 1)]),
            Err(DbError::NotComparable("Alice".into()))
        );
    }

    #[test]
    fn test_text_equality_no_coercion() {
        let db = users_db();

        let rows = db
            .select_rows("users", &[Condition::equals("id", "1")])
            .unwrap();
        assert!(rows.is_empty());

        let rows = db
            .select_rows("users", &[Condition::not_equals("id", "1")])
            .unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_snapshot_and_display() {
        let db = users_db();

        let snapshot = db.snapshot();
        assert_eq!(snapshot.tables.len(), 1);
        assert_eq!(snapshot.tables[0].rows.len(), 2);

        let text = snapshot.to_string();
        assert_eq!(
            text,
            "Table: users\nSchema:\n- id (int)\n- name (string)\nRows:\n(1, \"Alice\")\n(2, \"Bob\")\n"
        );
    }

    #[test]
    fn test_dump_json() {
        let db = users_db();

        let json: serde_json::Value = serde_json::from_str(&db.dump_json().unwrap()).unwrap();
        assert_eq!(json["tables"][0]["name"], "users");
        assert_eq!(json["tables"][0]["schema"][0]["type"], "int");
        assert_eq!(json["tables"][0]["schema"][1]["type"], "string");
        assert_eq!(json["tables"][0]["rows"][1][1], "Bob");
    }
}
