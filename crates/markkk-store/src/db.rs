//! Database connection management

use crate::config::{StoreConfig, StoreLocation};
use crate::errors::{from_rusqlite, io_error, Result};
use rusqlite::Connection;
use std::path::Path;

/// Open a SQLite database at the given path
pub fn open<P: AsRef<Path>>(path: P) -> Result<Connection> {
    Connection::open(path).map_err(from_rusqlite)
}

/// Open an in-memory SQLite database
pub fn open_in_memory() -> Result<Connection> {
    Connection::open_in_memory().map_err(from_rusqlite)
}

/// Open and configure the database described by `config`
///
/// Missing parent directories of a file database are created first.
pub fn open_with(config: &StoreConfig) -> Result<Connection> {
    let conn = match &config.location {
        StoreLocation::InMemory => open_in_memory()?,
        StoreLocation::File(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(|e| io_error("create_db_dir", e))?;
            }
            open(path)?
        }
    };

    let wal = config.wal && matches!(config.location, StoreLocation::File(_));
    configure(&conn, wal)?;
    Ok(conn)
}

/// Apply connection settings
///
/// Touches the schema, so a file that is not a SQLite database fails here
/// rather than on the first query.
pub fn configure(conn: &Connection, wal: bool) -> Result<()> {
    if wal {
        let _mode: String = conn
            .pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))
            .map_err(from_rusqlite)?;
    } else {
        conn.query_row("SELECT count(*) FROM sqlite_master", [], |row| {
            row.get::<_, i64>(0)
        })
        .map_err(from_rusqlite)?;
    }

    Ok(())
}
