use crate::config::StoreLocation;
use rusqlite::Connection;

pub fn open_db(location: &StoreLocation) -> anyhow::Result<Connection> {
    let conn = match location {
        StoreLocation::Memory => Connection::open_in_memory()?,
        StoreLocation::File(db_path) => {
            if let Some(dir) = db_path.parent() {
                std::fs::create_dir_all(dir)?;
            }
            Connection::open(db_path)?
        }
    };
    init_schema(&conn)?;
    Ok(conn)
}

fn init_schema(conn: &Connection) -> anyhow::Result<()> {
    // One row per class document. Students are embedded as a JSON array, so a
    // student never outlives its class row.
    conn.execute(
        "CREATE TABLE IF NOT EXISTS classes(
            id TEXT PRIMARY KEY,
            class_name TEXT NOT NULL,
            branch TEXT NOT NULL,
            students TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    )?;
    // Not UNIQUE: className uniqueness is checked by the create/update handlers.
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_classes_class_name ON classes(class_name)",
        [],
    )?;
    Ok(())
}
