use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::timestamp;

const NAME_PREFIX: &str = "doc-";
const NAME_TOKEN_LEN: usize = 6;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// A persisted Markdown document
///
/// `id` and `created_at` are fixed at creation. `updated_at` stays `None`
/// until a caller touches the document before writing it back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Unique identifier (UUID v4)
    pub id: String,

    /// Human-readable label
    pub name: String,

    /// Raw Markdown source
    pub content: String,

    #[serde(with = "timestamp::iso8601")]
    pub created_at: DateTime<Utc>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "timestamp::iso8601_option"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Document {
    /// Create a new document with a fresh id and the current time
    ///
    /// A missing or empty `name` falls back to a random `doc-xxxxxx` token.
    /// Any other name, whitespace included, is kept verbatim.
    pub fn new(content: impl Into<String>, name: Option<&str>) -> Self {
        let name = match name {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => random_name(),
        };

        Self {
            id: Uuid::new_v4().to_string(),
            name,
            content: content.into(),
            created_at: timestamp::now(),
            updated_at: None,
        }
    }

    /// Stamp `updated_at` with the current time
    pub fn touch(&mut self) {
        self.updated_at = Some(timestamp::now());
    }

    /// The time this document was last written: `updated_at`, else `created_at`
    pub fn last_touched(&self) -> DateTime<Utc> {
        self.updated_at.unwrap_or(self.created_at)
    }
}

/// Generate a fallback name such as `doc-k3x9qa`
pub fn random_name() -> String {
    let mut rng = rand::thread_rng();
    let token: String = (0..NAME_TOKEN_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!("{}{}", NAME_PREFIX, token)
}

/// Order documents most-recently-touched first
///
/// The sort is stable, so documents with equal timestamps keep the order
/// they were given in.
pub fn sort_recent_first(docs: &mut [Document]) {
    docs.sort_by(|a, b| b.last_touched().cmp(&a.last_touched()));
}
