//! Repository layer: record-level reads and writes over a connection

pub mod sqlite_repo;

pub use sqlite_repo::SqliteRepo;
