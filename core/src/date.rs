//! Date-time codec for API payloads and query strings.
//!
//! # Design
//! The server speaks two temporal dialects: response bodies carry strict
//! RFC3339 timestamps (`2015-06-01T10:00:00.000Z`), while query parameters
//! expect a plain `YYYY-MM-DD` date. `Date` wraps [`time::OffsetDateTime`]
//! and provides both directions independently — there is no round-trip
//! guarantee between them, and none is needed.

use serde::Deserialize;
use time::format_description::well_known::Rfc3339;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::OffsetDateTime;

use crate::error::Error;

/// Query-string form expected by the API, date only.
const QUERY_DATE: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// A point in time as exchanged with the Confluence API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Date(pub OffsetDateTime);

impl Date {
    /// Parse the strict RFC3339 profile used in response bodies.
    ///
    /// Anything else — including a bare date without a time component —
    /// fails with [`Error::MalformedTemporal`]. No clamping, no guessing.
    pub fn parse(text: &str) -> Result<Self, Error> {
        OffsetDateTime::parse(text, &Rfc3339)
            .map(Date)
            .map_err(|_| Error::MalformedTemporal(text.to_string()))
    }

    /// Render the query-string form (`YYYY-MM-DD`).
    pub fn to_query_value(&self) -> String {
        // A date-only description always formats.
        self.0.format(QUERY_DATE).unwrap_or_default()
    }
}

impl From<OffsetDateTime> for Date {
    fn from(value: OffsetDateTime) -> Self {
        Date(value)
    }
}

impl<'de> Deserialize<'de> for Date {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Date::parse(&raw).map_err(serde::de::Error::custom)
    }
}
