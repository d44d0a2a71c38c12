//! Error types for the Confluence API client.
//!
//! # Design
//! One closed enum covers every way a call can fail, from pre-flight
//! validation (`MissingParameter`, `InvalidFormat`) through the transport
//! (`Transport`) to response interpretation (`Decode`, `PermissionDenied`,
//! `UnexpectedStatus`, `MalformedTemporal`). Pre-flight variants are
//! returned before any network activity; the rest carry enough context
//! (status code, payload snippet, offending value) for the caller to act
//! without re-issuing the request.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by [`Client`](crate::Client) operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A mandatory parameter was empty or unset. Checked before the
    /// request is built; the transport is never invoked.
    #[error("mandatory parameter `{0}` is empty")]
    MissingParameter(&'static str),

    /// A parameter failed a local structural check, such as a sub-calendar
    /// ID that is not in canonical UUID form. Checked before the request
    /// is built; the transport is never invoked.
    #[error("parameter `{field}` has the wrong format: {value:?}")]
    InvalidFormat {
        field: &'static str,
        value: String,
    },

    /// The call never reached the server (DNS, connection, TLS, timeout).
    /// No status code is available on this path.
    #[error("transport failure: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The transport succeeded but the response body did not match the
    /// expected shape.
    #[error("response body did not match the expected shape ({size} bytes, starting {snippet:?})")]
    Decode {
        size: usize,
        snippet: String,
        #[source]
        source: serde_json::Error,
    },

    /// The server returned 403 — the authenticated user lacks rights for
    /// the operation.
    #[error("permission denied")]
    PermissionDenied,

    /// The server returned a status code the endpoint does not document.
    /// The raw code is carried so callers can branch further.
    #[error("unexpected HTTP status {0}")]
    UnexpectedStatus(u16),

    /// A date-time value did not match the RFC3339 decode profile.
    #[error("malformed date-time value {0:?}")]
    MalformedTemporal(String),
}
