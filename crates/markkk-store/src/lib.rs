//! Markkk Store - versioned local persistence for documents and theme
//!
//! Provides:
//! - SQLite schema with an additive, versioned migrations framework
//! - Record-level repository for the `documents` and `theme` collections
//! - `DocumentStore`, the async facade with a lazily-opened shared handle
//! - `StoreConfig`, resolved from the environment or built directly

pub mod config;
pub mod db;
pub mod document_store;
pub mod errors;
pub mod migrations;
pub mod repo;

// Re-export key types
pub use config::{StoreConfig, StoreLocation};
pub use document_store::DocumentStore;
pub use errors::Result;
