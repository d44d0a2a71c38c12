//! In-process Confluence test double.
//!
//! Serves a fixed data set over the same paths and JSON shapes as the
//! real server: core REST API (content, search, spaces, users, watch)
//! plus the Team Calendars service. One sub-calendar is deliberately
//! forbidden so clients can exercise their 403 handling. State is
//! seeded and read-only; the double exists to answer requests, not to
//! model the product.

use std::collections::HashMap;

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// Content ID every content route answers for.
pub const KNOWN_CONTENT_ID: &str = "65603";

/// Space key the space routes answer for.
pub const KNOWN_SPACE_KEY: &str = "DEV";

/// Username the user routes answer for.
pub const KNOWN_USERNAME: &str = "john";

/// Sub-calendar with one seeded event.
pub const KNOWN_SUB_CALENDAR_ID: &str = "550e8400-e29b-41d4-a716-446655440000";

/// Sub-calendar that always answers 403.
pub const FORBIDDEN_SUB_CALENDAR_ID: &str = "11111111-2222-3333-4444-555555555555";

pub fn app() -> Router {
    Router::new()
        .route("/rest/api/content", get(content_list))
        .route("/rest/api/content/{id}", get(content_get))
        .route("/rest/api/content/{id}/child", get(content_children))
        .route("/rest/api/content/{id}/label", get(content_labels))
        .route("/rest/api/content/{id}/history", get(content_history))
        .route("/rest/api/search", get(search))
        .route("/rest/api/space", get(space_list))
        .route("/rest/api/space/{key}", get(space_get))
        .route("/rest/api/user", get(user_get))
        .route("/rest/api/user/current", get(user_current))
        .route("/rest/api/user/anonymous", get(user_anonymous))
        .route("/rest/api/user/memberof", get(user_memberof))
        .route("/rest/api/user/watch/content/{id}", get(watch_status))
        .route(
            "/rest/calendar-services/1.0/calendar/events.json",
            get(calendar_events),
        )
        .route(
            "/rest/calendar-services/1.0/calendar/subcalendars.json",
            get(subcalendars),
        )
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn page_fixture() -> Value {
    json!({
        "id": KNOWN_CONTENT_ID,
        "type": "page",
        "status": "current",
        "title": "Release notes",
        "space": {"id": 42, "key": KNOWN_SPACE_KEY, "name": "Development", "type": "global"},
        "version": {
            "by": user_fixture(),
            "when": "2015-06-01T10:00:00.000Z",
            "number": 3,
            "minorEdit": false
        }
    })
}

fn user_fixture() -> Value {
    json!({
        "type": "known",
        "username": KNOWN_USERNAME,
        "userKey": "ff8080814c4b2e77014c4b9e61a30003",
        "displayName": "John Doe"
    })
}

async fn content_list() -> Json<Value> {
    Json(json!({
        "results": [page_fixture()],
        "start": 0,
        "limit": 25,
        "size": 1
    }))
}

async fn content_get(Path(id): Path<String>) -> Result<Json<Value>, StatusCode> {
    if id == KNOWN_CONTENT_ID {
        Ok(Json(page_fixture()))
    } else {
        Err(StatusCode::NOT_FOUND)
    }
}

async fn content_children(Path(id): Path<String>) -> Result<Json<Value>, StatusCode> {
    if id != KNOWN_CONTENT_ID {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(json!({
        "page": {"results": [page_fixture()], "start": 0, "limit": 25, "size": 1}
    })))
}

async fn content_labels(Path(id): Path<String>) -> Result<Json<Value>, StatusCode> {
    if id != KNOWN_CONTENT_ID {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(json!({
        "results": [{"prefix": "global", "name": "release", "id": "163841"}],
        "start": 0,
        "limit": 200,
        "size": 1
    })))
}

async fn content_history(Path(id): Path<String>) -> Result<Json<Value>, StatusCode> {
    if id != KNOWN_CONTENT_ID {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(json!({
        "latest": true,
        "createdBy": user_fixture(),
        "createdDate": "2015-06-01T10:00:00.000Z"
    })))
}

async fn search(Query(params): Query<HashMap<String, String>>) -> Result<Json<Value>, StatusCode> {
    let cql = params.get("cql").ok_or(StatusCode::BAD_REQUEST)?;
    Ok(Json(json!({
        "results": [{
            "title": "Release notes",
            "excerpt": "notes for the next release",
            "url": format!("/display/{KNOWN_SPACE_KEY}/Release+notes"),
            "entityType": "content",
            "lastModified": "2015-06-01T10:00:00.000Z"
        }],
        "start": 0,
        "limit": 25,
        "size": 1,
        "totalSize": 1,
        "cqlQuery": cql,
        "searchDuration": 15
    })))
}

async fn space_list() -> Json<Value> {
    Json(json!({
        "results": [{"id": 42, "key": KNOWN_SPACE_KEY, "name": "Development", "type": "global"}],
        "start": 0,
        "limit": 25,
        "size": 1
    }))
}

async fn space_get(Path(key): Path<String>) -> Result<Json<Value>, StatusCode> {
    if key == KNOWN_SPACE_KEY {
        Ok(Json(json!({
            "id": 42, "key": KNOWN_SPACE_KEY, "name": "Development", "type": "global"
        })))
    } else {
        Err(StatusCode::NOT_FOUND)
    }
}

async fn user_get(
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, StatusCode> {
    match params.get("username") {
        Some(username) if username == KNOWN_USERNAME => Ok(Json(user_fixture())),
        Some(_) => Err(StatusCode::NOT_FOUND),
        None if params.contains_key("key") => Ok(Json(user_fixture())),
        None => Err(StatusCode::BAD_REQUEST),
    }
}

async fn user_current() -> Json<Value> {
    Json(user_fixture())
}

async fn user_anonymous() -> Json<Value> {
    Json(json!({"type": "anonymous", "displayName": "Anonymous"}))
}

async fn user_memberof() -> Json<Value> {
    Json(json!({
        "results": [{"type": "group", "name": "confluence-users"}],
        "start": 0,
        "limit": 25,
        "size": 1
    }))
}

async fn watch_status(Path(id): Path<String>) -> Result<Json<Value>, StatusCode> {
    if id == KNOWN_CONTENT_ID {
        Ok(Json(json!({"watching": true})))
    } else {
        Err(StatusCode::NOT_FOUND)
    }
}

async fn calendar_events(
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, StatusCode> {
    let sub_calendar_id = params
        .get("subCalendarId")
        .ok_or(StatusCode::BAD_REQUEST)?;

    if sub_calendar_id == FORBIDDEN_SUB_CALENDAR_ID {
        return Err(StatusCode::FORBIDDEN);
    }

    if sub_calendar_id != KNOWN_SUB_CALENDAR_ID {
        return Ok(Json(json!({"events": [], "success": true})));
    }

    Ok(Json(json!({
        "events": [{
            "id": "evt-1",
            "title": "Sprint review",
            "eventType": "other",
            "subCalendarId": KNOWN_SUB_CALENDAR_ID,
            "start": "2018-04-05T14:00:00.000Z",
            "end": "2018-04-05T15:00:00.000Z",
            "allDay": false,
            "editable": true
        }],
        "success": true
    })))
}

async fn subcalendars(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    // `include` narrows the listing; anything else returns the full set.
    let included = params
        .get("include")
        .map_or(true, |id| id == KNOWN_SUB_CALENDAR_ID);

    let payload = if included {
        json!([{
            "subCalendar": {
                "id": KNOWN_SUB_CALENDAR_ID,
                "name": "Team calendar",
                "type": "calendar",
                "spaceKey": KNOWN_SPACE_KEY,
                "color": "subcalendar-blue",
                "timeZoneId": "UTC"
            },
            "subscriberCount": 3,
            "watched": true,
            "editable": true
        }])
    } else {
        json!([])
    };

    Json(json!({"payload": payload, "success": true}))
}
