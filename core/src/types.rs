//! Response shapes and parameter types for the core REST API.
//!
//! # Design
//! These are field-for-field mappings of the JSON payloads the server
//! returns. The server omits fields freely depending on `expand`, so
//! every shape decodes with `#[serde(default)]` and optional nesting —
//! an absent key is simply the field's zero value, never an error.
//! Parameter types implement [`Parameters`] by listing their descriptor
//! table in declaration order.

use serde::Deserialize;

use crate::date::Date;
use crate::query::{Parameters, QueryField};

/// Search excerpt modes accepted by [`SearchParameters::excerpt`].
pub const SEARCH_EXCERPT_INDEXED: &str = "indexed";
pub const SEARCH_EXCERPT_HIGHLIGHT: &str = "highlight";
pub const SEARCH_EXCERPT_NONE: &str = "none";

/// Space types accepted by [`SpaceParameters::space_type`].
pub const SPACE_TYPE_PERSONAL: &str = "personal";
pub const SPACE_TYPE_GLOBAL: &str = "global";

/// Space statuses accepted by [`SpaceParameters::status`].
pub const SPACE_STATUS_CURRENT: &str = "current";
pub const SPACE_STATUS_ARCHIVED: &str = "archived";

// CONTENT -------------------------------------------------------------------

/// A piece of content: page, blog post, comment or attachment.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Entity {
    pub id: String,
    #[serde(rename = "type")]
    pub entity_type: String,
    pub status: String,
    pub title: String,
    pub extensions: Option<Extensions>,
    pub metadata: Option<Metadata>,
    pub space: Option<Space>,
    pub version: Option<Version>,
    pub operations: Vec<Operation>,
    pub children: Option<Contents>,
    pub ancestors: Vec<Entity>,
    pub descendants: Option<Contents>,
    pub body: Option<Body>,
}

/// Child or descendant content grouped by type.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Contents {
    #[serde(rename = "attachment")]
    pub attachments: Option<Content>,
    #[serde(rename = "comment")]
    pub comments: Option<Content>,
    #[serde(rename = "page")]
    pub pages: Option<Content>,
    pub blogposts: Option<Content>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Body {
    pub view: Option<View>,
    #[serde(rename = "export_view")]
    pub export_view: Option<View>,
    #[serde(rename = "styled_view")]
    pub styled_view: Option<View>,
    #[serde(rename = "storage")]
    pub storage_view: Option<View>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct View {
    pub representation: String,
    pub value: String,
}

/// Paginated collection of entities.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Content {
    pub results: Vec<Entity>,
    pub start: i64,
    pub limit: i64,
    pub size: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Version {
    pub by: Option<User>,
    pub when: Option<Date>,
    pub message: String,
    pub number: i64,
    pub minor_edit: bool,
    pub hidden: bool,
    pub content: Option<Content>,
}

/// Type-specific extras: pages carry `position`, attachments carry media
/// info, comments carry `location` and `resolution`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Extensions {
    pub position: String,
    pub media_type: String,
    pub file_size: i64,
    pub comment: String,
    pub location: String,
    pub resolution: Option<Resolution>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Resolution {
    pub status: String,
    pub last_modifier: Option<User>,
    pub last_modified_date: Option<Date>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Operation {
    #[serde(rename = "operation")]
    pub name: String,
    pub target_type: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Metadata {
    pub labels: Option<Labels>,
    pub media_type: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Labels {
    pub results: Vec<Label>,
    pub start: i64,
    pub limit: i64,
    pub size: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Label {
    pub prefix: String,
    pub name: String,
    pub id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct History {
    pub latest: bool,
    pub created_by: Option<User>,
    pub created_date: Option<Date>,
    pub last_updated: Option<Version>,
    pub previous_version: Option<Version>,
    pub next_version: Option<Version>,
    pub contributors: Option<Contributors>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Contributors {
    pub publishers: Option<Publishers>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Publishers {
    pub users: Vec<User>,
    pub user_keys: Vec<String>,
}

// SEARCH --------------------------------------------------------------------

/// Request parameters for CQL search.
#[derive(Debug, Clone, Default)]
pub struct SearchParameters {
    pub cql: String,
    pub cql_context: String,
    pub excerpt: String,
    pub include_archived_spaces: bool,
    pub expand: Vec<String>,
    pub start: i64,
    pub limit: i64,
}

impl Parameters for SearchParameters {
    fn fields(&self) -> Vec<(&'static str, QueryField<'_>)> {
        vec![
            ("cql", QueryField::Text(&self.cql)),
            ("cqlcontext", QueryField::Text(&self.cql_context)),
            ("excerpt", QueryField::Text(&self.excerpt)),
            (
                "includeArchivedSpaces",
                QueryField::Flag(self.include_archived_spaces),
            ),
            ("expand", QueryField::List(&self.expand)),
            ("start", QueryField::Int(self.start)),
            ("limit", QueryField::Int(self.limit)),
        ]
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchResult {
    pub results: Vec<SearchEntity>,
    pub start: i64,
    pub limit: i64,
    pub size: i64,
    pub total_size: i64,
    pub cql_query: String,
    pub search_duration: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchEntity {
    pub title: String,
    pub excerpt: String,
    pub url: String,
    pub entity_type: String,
    pub last_modified: Option<Date>,
}

// SPACE ---------------------------------------------------------------------

/// Request parameters for space listing.
#[derive(Debug, Clone, Default)]
pub struct SpaceParameters {
    pub space_key: Vec<String>,
    pub space_type: String,
    pub status: String,
    pub label: String,
    pub favourite: bool,
    pub depth: String,
    pub expand: Vec<String>,
    pub start: i64,
    pub limit: i64,
}

impl Parameters for SpaceParameters {
    fn fields(&self) -> Vec<(&'static str, QueryField<'_>)> {
        vec![
            ("spaceKey", QueryField::Unwrap(&self.space_key)),
            ("type", QueryField::Text(&self.space_type)),
            ("status", QueryField::Text(&self.status)),
            ("label", QueryField::Text(&self.label)),
            ("favourite", QueryField::Flag(self.favourite)),
            ("depth", QueryField::Text(&self.depth)),
            ("expand", QueryField::List(&self.expand)),
            ("start", QueryField::Int(self.start)),
            ("limit", QueryField::Int(self.limit)),
        ]
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Space {
    pub id: i64,
    pub key: String,
    pub name: String,
    pub icon: Option<Icon>,
    #[serde(rename = "type")]
    pub space_type: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SpaceCollection {
    pub results: Vec<Space>,
    pub start: i64,
    pub limit: i64,
    pub size: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Icon {
    pub path: String,
    pub width: i64,
    pub height: i64,
    pub is_default: bool,
}

// USER ----------------------------------------------------------------------

/// Request parameters for user lookup.
#[derive(Debug, Clone, Default)]
pub struct UserParameters {
    pub key: String,
    pub username: String,
    pub expand: Vec<String>,
    pub start: i64,
    pub limit: i64,
}

impl Parameters for UserParameters {
    fn fields(&self) -> Vec<(&'static str, QueryField<'_>)> {
        vec![
            ("key", QueryField::Text(&self.key)),
            ("username", QueryField::Text(&self.username)),
            ("expand", QueryField::List(&self.expand)),
            ("start", QueryField::Int(self.start)),
            ("limit", QueryField::Int(self.limit)),
        ]
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "type")]
    pub user_type: String,
    pub username: String,
    pub user_key: String,
    pub profile_picture: Option<Icon>,
    pub display_name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Group {
    #[serde(rename = "type")]
    pub group_type: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GroupCollection {
    pub results: Vec<Group>,
    pub start: i64,
    pub limit: i64,
    pub size: i64,
}

// WATCH ---------------------------------------------------------------------

/// Request parameters for watch-status lookup.
#[derive(Debug, Clone, Default)]
pub struct WatchParameters {
    pub key: String,
    pub username: String,
    pub content_type: String,
}

impl Parameters for WatchParameters {
    fn fields(&self) -> Vec<(&'static str, QueryField<'_>)> {
        vec![
            ("key", QueryField::Text(&self.key)),
            ("username", QueryField::Text(&self.username)),
            ("contentType", QueryField::Text(&self.content_type)),
        ]
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WatchInfo {
    pub watching: bool,
}
