//! Synchronous client for the Confluence REST API, Team Calendars
//! included.
//!
//! # Overview
//! Strongly-typed parameter structs render themselves into escaped query
//! strings, a blocking dispatcher issues the call over an injectable
//! transport, and status codes plus decode outcomes map into one closed
//! error enum. Everything else is declarative JSON shape.
//!
//! # Design
//! - `Client` is stateless between calls — base URL, credentials, a
//!   [`Transport`] and a [`Clock`], nothing shared or mutable.
//! - Parameter encoding is a descriptor-table walk ([`Parameters`] /
//!   [`QueryField`]): zero-valued fields are omitted so the server
//!   applies its own defaults, and the `_` cache-buster is the single
//!   non-pure step.
//! - Mandatory and pattern-checked parameters are validated before any
//!   request is built; invalid calls never reach the network.
//! - All calls are blocking. The client can be shared across threads;
//!   concurrency, if any, belongs to the caller and the transport's
//!   connection pool.

pub mod calendar;
pub mod client;
pub mod date;
pub mod error;
pub mod http;
pub mod query;
pub mod types;

pub use calendar::{
    is_valid_calendar_id, Calendar, CalendarCollection, CalendarEvent, CalendarEventCollection,
    CalendarEventsParameters, CalendarUser, CalendarsParameters, CustomEventType,
    EventTypeReminder, SubCalendar, CALENDAR_CONTEXT_MY, CALENDAR_CONTEXT_SPACE,
};
pub use client::Client;
pub use date::Date;
pub use error::{Error, Result};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError, UreqTransport};
pub use query::{
    encode, Clock, CollectionParameters, EmptyParameters, ExpandParameters, Parameters,
    QueryField, SystemClock,
};
pub use types::{
    Body, Content, Contents, Contributors, Entity, Extensions, Group, GroupCollection, History,
    Icon, Label, Labels, Metadata, Operation, Publishers, Resolution, SearchEntity,
    SearchParameters, SearchResult, Space, SpaceCollection, SpaceParameters, User, UserParameters,
    Version, View, WatchInfo, WatchParameters, SEARCH_EXCERPT_HIGHLIGHT, SEARCH_EXCERPT_INDEXED,
    SEARCH_EXCERPT_NONE, SPACE_STATUS_ARCHIVED, SPACE_STATUS_CURRENT, SPACE_TYPE_GLOBAL,
    SPACE_TYPE_PERSONAL,
};
