use serde::{Deserialize, Serialize};

/// Primary key of the singleton theme record
pub const THEME_RECORD_ID: &str = "selected";

/// Theme materialized when no preference has been stored yet
pub const DEFAULT_THEME: &str = "dim";

/// The selected UI theme
///
/// Exactly one of these exists per database, keyed by [`THEME_RECORD_ID`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemePreference {
    pub id: String,
    pub value: String,
}

impl ThemePreference {
    /// Build the singleton record holding `value`
    pub fn selected(value: impl Into<String>) -> Self {
        Self {
            id: THEME_RECORD_ID.to_string(),
            value: value.into(),
        }
    }
}

impl Default for ThemePreference {
    fn default() -> Self {
        Self::selected(DEFAULT_THEME)
    }
}
