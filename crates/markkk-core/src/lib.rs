//! Markkk Core - domain model and shared facilities
//!
//! This crate provides the types every other Markkk crate builds on:
//! - `Document` and `ThemePreference` records
//! - The structured error facility (`ExError`, `ExErrorKind`, `MarkkkError`)
//! - The logging facility (`init`, `log_op_*` macros, test capture)

pub use markkk_core_types;

pub mod errors;
pub mod logging_facility;
pub mod model;

// Re-export commonly used types
pub use errors::{ExError, ExErrorKind, MarkkkError, Result};
pub use model::{Document, ThemePreference, DEFAULT_THEME, THEME_RECORD_ID};
