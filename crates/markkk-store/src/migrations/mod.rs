//! Migration framework
//!
//! Provides:
//! - Ordered, additive schema steps keyed by version
//! - A checksummed ledger of applied steps
//! - Refusal to touch databases written by a newer schema

mod checksums;
mod embedded;
mod runner;

pub use embedded::{get_migrations, Migration, LATEST_VERSION};
pub use runner::{apply_migrations, apply_migrations_to, current_version};
