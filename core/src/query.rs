//! Query-string encoding for request parameter types.
//!
//! # Design
//! Rust has no runtime field reflection, so every parameter type describes
//! itself: [`Parameters::fields`] returns a field-descriptor table (name
//! plus [`QueryField`] encoding directive) in declaration order, and
//! [`encode`] walks that table generically. The rules are uniform and live
//! in one place: fields at their type's zero value (empty string, `0`,
//! `false`, empty slice, unset date) are omitted entirely so the server
//! applies its own defaults, values are percent-escaped, pairs are joined
//! with `&`, and there is no leading `?`.
//!
//! The single non-pure step in the pipeline is the `_` cache-buster
//! directive, which samples the wall clock at most once per `encode` call.
//! The clock sits behind [`Clock`] so tests can inject a fixed one.

use time::OffsetDateTime;
use url::form_urlencoded::Serializer;

use crate::date::Date;

/// Query parameter name of the cache-buster pair.
const CACHE_BUSTER: &str = "_";

/// Time source for the cache-buster directive.
pub trait Clock: Send + Sync {
    /// Nanoseconds since the Unix epoch.
    fn now_nanos(&self) -> i128;
}

/// Wall-clock [`Clock`] used by default.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_nanos(&self) -> i128 {
        OffsetDateTime::now_utc().unix_timestamp_nanos()
    }
}

/// Encoding directive for one field of a parameter type.
#[derive(Debug, Clone)]
pub enum QueryField<'a> {
    /// Scalar string, omitted when empty.
    Text(&'a str),
    /// Scalar integer, omitted when zero.
    Int(i64),
    /// Boolean flag, omitted when false, rendered `name=true` when true.
    Flag(bool),
    /// Sequence rendered as a single comma-delimited pair, omitted when
    /// empty.
    List(&'a [String]),
    /// Sequence rendered as one `name=value` pair per element, in element
    /// order; an empty sequence emits nothing.
    Unwrap(&'a [String]),
    /// Date rendered in the query form; `None` (never set) is omitted.
    TimeDate(Option<Date>),
    /// Volatile cache-busting pair. The declared name is ignored and the
    /// pair is emitted as `_=<nanosecond timestamp>`.
    CacheBuster,
}

/// A parameter type that can render itself as a URL query.
///
/// Implementors return their field-descriptor table in declaration order.
/// Directives never vary across instances of a type, so the table is the
/// type's whole encoding contract.
pub trait Parameters {
    fn fields(&self) -> Vec<(&'static str, QueryField<'_>)>;
}

/// Render `params` as a canonical query string.
///
/// Pure except for the cache-buster sample, which is taken at most once
/// per call regardless of how many `CacheBuster` entries the table holds.
/// Returns the empty string when every field is at its zero value.
pub fn encode(params: &dyn Parameters, clock: &dyn Clock) -> String {
    let mut sampled: Option<i128> = None;
    let mut query = Serializer::new(String::new());

    for (name, field) in params.fields() {
        match field {
            QueryField::Text(value) if !value.is_empty() => {
                query.append_pair(name, value);
            }
            QueryField::Int(value) if value != 0 => {
                query.append_pair(name, &value.to_string());
            }
            QueryField::Flag(true) => {
                query.append_pair(name, "true");
            }
            QueryField::List(values) if !values.is_empty() => {
                query.append_pair(name, &values.join(","));
            }
            QueryField::Unwrap(values) => {
                for value in values {
                    query.append_pair(name, value);
                }
            }
            QueryField::TimeDate(Some(date)) => {
                query.append_pair(name, &date.to_query_value());
            }
            QueryField::CacheBuster => {
                let nanos = *sampled.get_or_insert_with(|| clock.now_nanos());
                query.append_pair(CACHE_BUSTER, &nanos.to_string());
            }
            // Zero values: omitted so the server applies its defaults.
            _ => {}
        }
    }

    query.finish()
}

/// Parameters for endpoints that take no query at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyParameters;

impl Parameters for EmptyParameters {
    fn fields(&self) -> Vec<(&'static str, QueryField<'_>)> {
        Vec::new()
    }
}

/// Parameters for endpoints that only support `expand`.
#[derive(Debug, Clone, Default)]
pub struct ExpandParameters {
    pub expand: Vec<String>,
}

impl Parameters for ExpandParameters {
    fn fields(&self) -> Vec<(&'static str, QueryField<'_>)> {
        vec![("expand", QueryField::List(&self.expand))]
    }
}

/// Parameters for paginated collection endpoints.
#[derive(Debug, Clone, Default)]
pub struct CollectionParameters {
    pub expand: Vec<String>,
    pub start: i64,
    pub limit: i64,
}

impl Parameters for CollectionParameters {
    fn fields(&self) -> Vec<(&'static str, QueryField<'_>)> {
        vec![
            ("expand", QueryField::List(&self.expand)),
            ("start", QueryField::Int(self.start)),
            ("limit", QueryField::Int(self.limit)),
        ]
    }
}
