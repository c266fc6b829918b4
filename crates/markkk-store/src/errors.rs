//! Error handling for markkk-store
//!
//! Wraps markkk-core ExError with store-specific constructors and the
//! classification of SQLite failures.

use markkk_core::errors::{ExError, ExErrorKind, MarkkkError};
use rusqlite::ErrorCode;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create a migration error
pub fn migration_error(migration_id: &str, reason: &str) -> ExError {
    MarkkkError::MigrationFailed {
        migration_id: migration_id.to_string(),
        reason: reason.to_string(),
    }
    .into()
}

/// Create a checksum mismatch error
pub fn checksum_mismatch(migration_id: &str, expected: &str, actual: &str) -> ExError {
    MarkkkError::ChecksumMismatch {
        migration_id: migration_id.to_string(),
        expected: expected.to_string(),
        actual: actual.to_string(),
    }
    .into()
}

/// Create an error for a database written by a newer schema
pub fn schema_too_new(found: u32, supported: u32) -> ExError {
    MarkkkError::SchemaTooNew { found, supported }.into()
}

/// Create a database error from rusqlite::Error
///
/// Failures that mean the database itself cannot be reached (cannot open,
/// full disk, read-only, locked, not a database) are `StorageUnavailable`.
pub fn from_rusqlite(err: rusqlite::Error) -> ExError {
    let kind = match &err {
        rusqlite::Error::SqliteFailure(failure, _) => match failure.code {
            ErrorCode::CannotOpen
            | ErrorCode::PermissionDenied
            | ErrorCode::ReadOnly
            | ErrorCode::DiskFull
            | ErrorCode::SystemIoFailure
            | ErrorCode::DatabaseBusy
            | ErrorCode::DatabaseLocked
            | ErrorCode::DatabaseCorrupt
            | ErrorCode::NotADatabase
            | ErrorCode::OutOfMemory
            | ErrorCode::FileLockingProtocolFailed
            | ErrorCode::NoLargeFileSupport => ExErrorKind::StorageUnavailable,
            _ => ExErrorKind::Persistence,
        },
        rusqlite::Error::FromSqlConversionFailure(..) | rusqlite::Error::InvalidColumnType(..) => {
            ExErrorKind::Serialization
        }
        _ => ExErrorKind::Persistence,
    };

    ExError::new(kind)
        .with_op("sqlite")
        .with_message(err.to_string())
}

/// True when `err` is a primary-key uniqueness violation
pub fn is_primary_key_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
    )
}

/// Create a storage-unavailable error from an IO failure
pub fn io_error(operation: &str, err: std::io::Error) -> ExError {
    let source = ExError::new(ExErrorKind::Io)
        .with_op(operation.to_string())
        .with_message(err.to_string());

    ExError::new(ExErrorKind::StorageUnavailable)
        .with_op(operation.to_string())
        .with_message("database location is not accessible")
        .with_source(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sqlite_failure(code: std::os::raw::c_int) -> rusqlite::Error {
        rusqlite::Error::SqliteFailure(rusqlite::ffi::Error::new(code), None)
    }

    #[test]
    fn test_unreachable_database_is_storage_unavailable() {
        for code in [
            rusqlite::ffi::SQLITE_CANTOPEN,
            rusqlite::ffi::SQLITE_FULL,
            rusqlite::ffi::SQLITE_READONLY,
            rusqlite::ffi::SQLITE_NOTADB,
        ] {
            let err = from_rusqlite(sqlite_failure(code));
            assert_eq!(err.kind(), ExErrorKind::StorageUnavailable, "code {}", code);
        }
    }

    #[test]
    fn test_other_failures_are_persistence() {
        let err = from_rusqlite(sqlite_failure(rusqlite::ffi::SQLITE_ERROR));
        assert_eq!(err.kind(), ExErrorKind::Persistence);
        assert_eq!(err.op(), Some("sqlite"));
    }

    #[test]
    fn test_primary_key_violation_detection() {
        let pk = sqlite_failure(rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY);
        let not_null = sqlite_failure(rusqlite::ffi::SQLITE_CONSTRAINT_NOTNULL);

        assert!(is_primary_key_violation(&pk));
        assert!(!is_primary_key_violation(&not_null));
    }

    #[test]
    fn test_io_error_wraps_source() {
        let err = io_error(
            "create_db_dir",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );

        assert_eq!(err.kind(), ExErrorKind::StorageUnavailable);
        assert_eq!(
            err.source_error().map(|e| e.kind()),
            Some(ExErrorKind::Io)
        );
    }

    #[test]
    fn test_schema_too_new_kind() {
        assert_eq!(schema_too_new(3, 2).kind(), ExErrorKind::UpgradeConflict);
    }
}
