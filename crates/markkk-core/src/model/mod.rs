//! Domain model for persisted Markkk records

pub mod document;
pub mod theme;
pub mod timestamp;

pub use document::Document;
pub use theme::{ThemePreference, DEFAULT_THEME, THEME_RECORD_ID};
