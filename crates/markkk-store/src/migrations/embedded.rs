//! Embedded SQL migrations
//!
//! Steps are embedded at compile time and only ever add collections.

/// One additive schema step
pub struct Migration {
    /// Schema version reached once this step is applied
    pub version: u32,
    pub id: &'static str,
    pub sql: &'static str,
}

/// Newest schema version this build understands
pub const LATEST_VERSION: u32 = 2;

/// Get all embedded migrations in version order
pub fn get_migrations() -> Vec<Migration> {
    vec![
        Migration {
            version: 1,
            id: "001_documents",
            sql: include_str!("../../migrations/001_documents.sql"),
        },
        Migration {
            version: 2,
            id: "002_theme",
            sql: include_str!("../../migrations/002_theme.sql"),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_versions_are_contiguous_and_end_at_latest() {
        let versions: Vec<u32> = get_migrations().iter().map(|m| m.version).collect();
        let expected: Vec<u32> = (1..=LATEST_VERSION).collect();
        assert_eq!(versions, expected);
    }
}
