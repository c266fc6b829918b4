//! ISO-8601 timestamps with millisecond precision
//!
//! Documents carry `createdAt`/`updatedAt` as RFC 3339 strings in UTC with
//! a `Z` suffix and three fractional digits. `now()` truncates to
//! milliseconds; a value with finer precision is written with nine digits
//! so every timestamp survives a storage round trip unchanged.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};

use crate::errors::MarkkkError;

/// Current time truncated to millisecond precision
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Render a timestamp in its canonical stored form
pub fn format(ts: &DateTime<Utc>) -> String {
    let digits = if ts.timestamp_subsec_nanos() % 1_000_000 == 0 {
        SecondsFormat::Millis
    } else {
        SecondsFormat::Nanos
    };
    ts.to_rfc3339_opts(digits, true)
}

/// Parse any RFC 3339 timestamp and normalize it to UTC
pub fn parse(value: &str) -> Result<DateTime<Utc>, MarkkkError> {
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| MarkkkError::InvalidTimestamp {
            value: value.to_string(),
            reason: e.to_string(),
        })
}

/// Serde adapter for required timestamps
pub mod iso8601 {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::format(ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter for optional timestamps
pub mod iso8601_option {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &Option<DateTime<Utc>>, s: S) -> Result<S::Ok, S::Error> {
        match ts {
            Some(ts) => s.serialize_some(&super::format(ts)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        Option::<String>::deserialize(d)?
            .map(|raw| super::parse(&raw).map_err(serde::de::Error::custom))
            .transpose()
    }
}
