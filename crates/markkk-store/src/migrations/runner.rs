//! Migration runner
//!
//! Applies pending steps in version order, each in its own transaction, and
//! verifies the checksums of steps applied earlier.

use crate::errors::{checksum_mismatch, from_rusqlite, migration_error, schema_too_new, Result};
use crate::migrations::checksums::compute_checksum;
use crate::migrations::embedded::{get_migrations, Migration, LATEST_VERSION};
use markkk_core::model::timestamp;
use markkk_core::ExErrorKind;
use rusqlite::{Connection, OptionalExtension};

/// Bring the database up to [`LATEST_VERSION`]
///
/// Returns the schema version after the run.
pub fn apply_migrations(conn: &mut Connection) -> Result<u32> {
    apply_migrations_to(conn, LATEST_VERSION)
}

/// Apply every pending step up to and including `target`
///
/// Fails without modifying anything when the ledger already records a
/// version newer than this build knows.
pub fn apply_migrations_to(conn: &mut Connection, target: u32) -> Result<u32> {
    create_schema_version_table(conn)?;

    let found = current_version(conn)?;
    if found > LATEST_VERSION {
        return Err(schema_too_new(found, LATEST_VERSION));
    }

    for migration in get_migrations()
        .iter()
        .filter(|m| m.version <= target)
    {
        apply_migration(conn, migration)?;
    }

    current_version(conn)
}

/// Highest schema version recorded in the ledger, 0 for a fresh database
pub fn current_version(conn: &Connection) -> Result<u32> {
    let has_ledger = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'schema_version'",
            [],
            |_| Ok(()),
        )
        .optional()
        .map_err(from_rusqlite)?
        .is_some();

    if !has_ledger {
        return Ok(0);
    }

    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )
    .map_err(from_rusqlite)
}

/// Create the schema_version table if it doesn't exist
fn create_schema_version_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            migration_id TEXT NOT NULL UNIQUE,
            applied_at TEXT NOT NULL,
            checksum TEXT NOT NULL
        )",
        [],
    )
    .map_err(from_rusqlite)?;

    Ok(())
}

/// Apply a single migration if not already applied
fn apply_migration(conn: &mut Connection, migration: &Migration) -> Result<()> {
    let checksum = compute_checksum(migration.sql);

    let recorded: Option<String> = conn
        .query_row(
            "SELECT checksum FROM schema_version WHERE migration_id = ?1",
            [migration.id],
            |row| row.get(0),
        )
        .optional()
        .map_err(from_rusqlite)?;

    if let Some(stored) = recorded {
        if stored != checksum {
            return Err(checksum_mismatch(migration.id, &stored, &checksum));
        }
        return Ok(());
    }

    let tx = conn.transaction().map_err(from_rusqlite)?;

    tx.execute_batch(migration.sql).map_err(|e| {
        let err = from_rusqlite(e);
        if err.kind() == ExErrorKind::StorageUnavailable {
            err
        } else {
            migration_error(migration.id, err.message())
        }
    })?;

    tx.execute(
        "INSERT INTO schema_version (version, migration_id, applied_at, checksum) VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![
            migration.version,
            migration.id,
            timestamp::format(&timestamp::now()),
            checksum
        ],
    )
    .map_err(from_rusqlite)?;

    tx.commit().map_err(from_rusqlite)?;

    tracing::info!(
        migration_id = migration.id,
        schema_version = migration.version,
        "applied migration"
    );

    Ok(())
}
