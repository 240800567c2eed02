use tinydb::{ColumnDef, Condition, DataType, Database, Schema, Value};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> tinydb::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let mut db = Database::new();

    db.create_table(
        "users",
        Schema::new(vec![
            ColumnDef::new("id", DataType::Int),
            ColumnDef::new("name", DataType::Text),
        ]),
    )?;

    let samples: Vec<Vec<Value>> = vec![
        vec![Value::Int(1), "Alice".into()],
        vec![Value::Int(2), "Bob".into()],
        vec!["x".into(), "Alice".into()],
        vec![Value::Int(3), Value::Int(12345)],
    ];
    for values in samples {
        if let Err(e) = db.insert_row("users", values) {
            warn!("insert rejected: {e}");
        }
    }

    for condition in [
        Condition::equals("id", 1),
        Condition::not_equals("id", 1),
        Condition::greater_than("id", 1),
        Condition::less_than("id", 2),
    ] {
        let rows = db.select_rows("users", std::slice::from_ref(&condition))?;
        info!("{condition}: {} row(s)", rows.len());
        for row in rows {
            println!("{row}");
        }
    }

    print!("{}", db.snapshot());
    Ok(())
}
