//! Store configuration
//!
//! The database location comes from `MARKKK_DB_PATH` and defaults to
//! `.markkk/store.db`. Binaries load `.env` before resolving it.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming the database file
pub const ENV_DB_PATH: &str = "MARKKK_DB_PATH";

/// Value of [`ENV_DB_PATH`] that selects an in-memory database
pub const IN_MEMORY_SENTINEL: &str = ":memory:";

/// Default database file, relative to the working directory
pub const DEFAULT_DB_PATH: &str = ".markkk/store.db";

/// Where the database lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "path")]
pub enum StoreLocation {
    File(PathBuf),
    InMemory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    pub location: StoreLocation,

    /// Use the WAL journal for file databases
    #[serde(default = "default_wal")]
    pub wal: bool,
}

fn default_wal() -> bool {
    true
}

impl StoreConfig {
    pub fn file(path: impl AsRef<Path>) -> Self {
        Self {
            location: StoreLocation::File(path.as_ref().to_path_buf()),
            wal: default_wal(),
        }
    }

    pub fn in_memory() -> Self {
        Self {
            location: StoreLocation::InMemory,
            wal: false,
        }
    }

    /// Resolve the configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_env_value(std::env::var(ENV_DB_PATH).ok().as_deref())
    }

    /// Resolve the configuration from a raw `MARKKK_DB_PATH` value
    pub fn from_env_value(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(IN_MEMORY_SENTINEL) => Self::in_memory(),
            Some(path) if !path.is_empty() => Self::file(path),
            _ => Self::default(),
        }
    }

    pub fn with_wal(mut self, wal: bool) -> Self {
        self.wal = wal;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::file(DEFAULT_DB_PATH)
    }
}
