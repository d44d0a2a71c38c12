//! End-to-end tests against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives the client
//! through its default `UreqTransport` over real HTTP — URL building,
//! query encoding, auth headers, JSON decoding and status classification
//! all exercised together.

use confluence_core::{
    CalendarEventsParameters, CalendarsParameters, Client, CollectionParameters, Error,
    ExpandParameters, SearchParameters, SpaceParameters, UserParameters, WatchParameters,
};
use mock_server::{
    FORBIDDEN_SUB_CALENDAR_ID, KNOWN_CONTENT_ID, KNOWN_SPACE_KEY, KNOWN_SUB_CALENDAR_ID,
    KNOWN_USERNAME,
};

/// Start the mock server on a random port and return a client bound to it.
fn start_server() -> Client {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    Client::new(format!("http://{addr}"), "john", "secret")
}

#[test]
fn rest_api_surface() {
    let client = start_server();

    // Content by ID, with expansion parameters on the wire.
    let entity = client
        .get_content_by_id(
            KNOWN_CONTENT_ID,
            ExpandParameters {
                expand: vec!["space".to_string(), "version".to_string()],
            },
        )
        .unwrap();
    assert_eq!(entity.id, KNOWN_CONTENT_ID);
    assert_eq!(entity.entity_type, "page");
    assert_eq!(entity.space.unwrap().key, KNOWN_SPACE_KEY);
    assert_eq!(entity.version.unwrap().number, 3);

    // Unknown content: undocumented status falls through with its code.
    let err = client
        .get_content_by_id("1", ExpandParameters::default())
        .unwrap_err();
    assert!(matches!(err, Error::UnexpectedStatus(404)));

    // Content listing.
    let content = client
        .get_content(CollectionParameters {
            limit: 25,
            ..Default::default()
        })
        .unwrap();
    assert_eq!(content.size, 1);
    assert_eq!(content.results.len(), 1);

    // Children, labels, history.
    let children = client
        .get_content_children(KNOWN_CONTENT_ID, ExpandParameters::default())
        .unwrap();
    assert_eq!(children.pages.unwrap().results.len(), 1);

    let labels = client
        .get_content_labels(KNOWN_CONTENT_ID, CollectionParameters::default())
        .unwrap();
    assert_eq!(labels.results[0].name, "release");

    let history = client
        .get_content_history(KNOWN_CONTENT_ID, ExpandParameters::default())
        .unwrap();
    assert!(history.latest);
    assert!(history.created_date.is_some());

    // Search round-trips the CQL expression through percent-encoding.
    let result = client
        .search(SearchParameters {
            cql: "type = page".to_string(),
            limit: 25,
            ..Default::default()
        })
        .unwrap();
    assert_eq!(result.cql_query, "type = page");
    assert_eq!(result.total_size, 1);

    // Spaces.
    let spaces = client.get_spaces(SpaceParameters::default()).unwrap();
    assert_eq!(spaces.results[0].key, KNOWN_SPACE_KEY);

    let space = client
        .get_space(KNOWN_SPACE_KEY, ExpandParameters::default())
        .unwrap();
    assert_eq!(space.space_type, "global");

    // Users.
    let user = client
        .get_user(UserParameters {
            username: KNOWN_USERNAME.to_string(),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(user.username, KNOWN_USERNAME);

    let current = client.get_current_user(ExpandParameters::default()).unwrap();
    assert_eq!(current.display_name, "John Doe");

    let anonymous = client
        .get_anonymous_user(ExpandParameters::default())
        .unwrap();
    assert_eq!(anonymous.user_type, "anonymous");

    let groups = client
        .get_user_groups(UserParameters {
            username: KNOWN_USERNAME.to_string(),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(groups.results[0].name, "confluence-users");

    // Watch status.
    let watch = client
        .get_watch_status(KNOWN_CONTENT_ID, WatchParameters::default())
        .unwrap();
    assert!(watch.watching);
}

#[test]
fn team_calendars() {
    let client = start_server();

    // A readable calendar with a seeded event; the date decodes through
    // the strict profile.
    let events = client
        .get_calendar_events(CalendarEventsParameters {
            sub_calendar_id: KNOWN_SUB_CALENDAR_ID.to_string(),
            user_time_zone_id: "UTC".to_string(),
            ..Default::default()
        })
        .unwrap();
    assert!(events.success);
    assert_eq!(events.events.len(), 1);
    assert_eq!(events.events[0].title, "Sprint review");
    assert!(events.events[0].start.is_some());

    // Forbidden calendar: 403 comes back as the shared sentinel.
    let err = client
        .get_calendar_events(CalendarEventsParameters {
            sub_calendar_id: FORBIDDEN_SUB_CALENDAR_ID.to_string(),
            ..Default::default()
        })
        .unwrap_err();
    assert!(matches!(err, Error::PermissionDenied));

    // Pre-flight failures never produce traffic; the server would have
    // answered 400 for a missing id, but the client refuses locally.
    let err = client
        .get_calendar_events(CalendarEventsParameters::default())
        .unwrap_err();
    assert!(matches!(err, Error::MissingParameter("subCalendarId")));

    let err = client
        .get_calendar_events(CalendarEventsParameters {
            sub_calendar_id: "not-a-uuid".to_string(),
            ..Default::default()
        })
        .unwrap_err();
    assert!(matches!(err, Error::InvalidFormat { .. }));

    // Calendar listing, narrowed by an unwrapped include list.
    let calendars = client
        .get_calendars(CalendarsParameters {
            include_sub_calendar_id: vec![KNOWN_SUB_CALENDAR_ID.to_string()],
            ..Default::default()
        })
        .unwrap();
    assert!(calendars.success);
    assert_eq!(
        calendars.calendars[0].sub_calendar.as_ref().unwrap().id,
        KNOWN_SUB_CALENDAR_ID
    );
}
