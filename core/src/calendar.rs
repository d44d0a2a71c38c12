//! Team Calendars API: shapes, parameters and endpoint wrappers.
//!
//! # Design
//! The calendar service lives under its own REST base and has stricter
//! call-site rules than the core API: sub-calendar IDs must be canonical
//! lowercase hyphenated UUIDs and are validated before any request is
//! built, and both endpoints take a `_` cache-busting parameter so
//! intermediaries never serve a stale calendar.

use serde::Deserialize;
use uuid::Uuid;

use crate::client::{classify, Client};
use crate::date::Date;
use crate::error::{Error, Result};
use crate::http::HttpMethod;
use crate::query::{Parameters, QueryField};

/// Base path of the Team Calendars REST API.
const CALENDAR_REST_BASE: &str = "/rest/calendar-services/1.0";

/// Calendar contexts accepted by [`CalendarsParameters::calendar_context`].
pub const CALENDAR_CONTEXT_MY: &str = "myCalendars";
pub const CALENDAR_CONTEXT_SPACE: &str = "spaceCalendars";

/// Request parameters for fetching calendar events.
#[derive(Debug, Clone, Default)]
pub struct CalendarEventsParameters {
    pub sub_calendar_id: String,
    pub user_time_zone_id: String,
    pub start: Option<Date>,
    pub end: Option<Date>,
}

impl Parameters for CalendarEventsParameters {
    fn fields(&self) -> Vec<(&'static str, QueryField<'_>)> {
        vec![
            ("subCalendarId", QueryField::Text(&self.sub_calendar_id)),
            ("userTimeZoneId", QueryField::Text(&self.user_time_zone_id)),
            ("start", QueryField::TimeDate(self.start)),
            ("end", QueryField::TimeDate(self.end)),
            ("_", QueryField::CacheBuster),
        ]
    }
}

/// Request parameters for listing calendars.
#[derive(Debug, Clone, Default)]
pub struct CalendarsParameters {
    pub include_sub_calendar_id: Vec<String>,
    pub calendar_context: String,
    pub viewing_space_key: String,
}

impl Parameters for CalendarsParameters {
    fn fields(&self) -> Vec<(&'static str, QueryField<'_>)> {
        vec![
            ("include", QueryField::Unwrap(&self.include_sub_calendar_id)),
            ("calendarContext", QueryField::Text(&self.calendar_context)),
            ("viewingSpaceKey", QueryField::Text(&self.viewing_space_key)),
            ("_", QueryField::CacheBuster),
        ]
    }
}

/// Events of one sub-calendar.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CalendarEventCollection {
    pub events: Vec<CalendarEvent>,
    pub success: bool,
}

/// Calendars visible to the caller.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CalendarCollection {
    #[serde(rename = "payload")]
    pub calendars: Vec<Calendar>,
    pub success: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Calendar {
    pub users_permitted_to_view: Vec<String>,
    pub users_permitted_to_edit: Vec<String>,
    pub groups_permitted_to_view: Vec<String>,
    pub groups_permitted_to_edit: Vec<String>,
    pub warnings: Vec<String>,
    pub child_sub_calendars: Vec<Calendar>,
    pub subscriber_count: i64,
    pub sub_calendar: Option<SubCalendar>,
    pub reminder_me: bool,
    pub hidden: bool,
    pub editable: bool,
    pub reloadable: bool,
    pub deletable: bool,
    pub events_hidden: bool,
    pub watched_via_content: bool,
    pub administrable: bool,
    pub watched: bool,
    pub events_viewable: bool,
    pub events_editable: bool,
    pub subscribed_by_current_user: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SubCalendar {
    pub disable_event_types: Vec<String>,
    pub custom_event_types: Vec<CustomEventType>,
    // The API really does spell the key this way.
    #[serde(rename = "sanboxEventTypeReminders")]
    pub sandbox_event_type_reminders: Vec<EventTypeReminder>,
    pub creator: String,
    pub type_key: String,
    pub color: String,
    pub time_zone_id: String,
    pub description: String,
    #[serde(rename = "type")]
    pub sub_calendar_type: String,
    pub space_key: String,
    pub space_name: String,
    pub name: String,
    pub id: String,
    pub watchable: bool,
    pub event_invitees_supported: bool,
    pub restrictable: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CustomEventType {
    pub created: String,
    pub icon: String,
    pub period_in_mins: i64,
    pub custom_event_type_id: String,
    pub title: String,
    pub parent_sub_calendar_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EventTypeReminder {
    pub event_type_id: String,
    pub period_in_mins: i64,
    pub is_custom_event_type: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CalendarEvent {
    pub invitees: Vec<CalendarUser>,
    pub working_url: String,
    pub description: String,
    pub class_name: String,
    pub short_title: String,
    pub title: String,
    pub event_type: String,
    pub id: String,
    pub custom_event_type_id: String,
    pub sub_calendar_id: String,
    pub icon_url: String,
    pub medium_icon_url: String,
    pub background_color: String,
    pub border_color: String,
    pub text_color: String,
    pub color_scheme: String,
    pub start: Option<Date>,
    pub end: Option<Date>,
    pub original_start_date_time: Option<Date>,
    pub original_end_date_time: Option<Date>,
    pub expand_dates: bool,
    pub editable: bool,
    pub all_day: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CalendarUser {
    pub display_name: String,
    pub name: String,
    pub id: String,
    #[serde(rename = "type")]
    pub user_type: String,
    pub avatar_icon_url: String,
    pub email: String,
}

/// Whether `id` is a canonical sub-calendar ID: lowercase hex in
/// hyphenated 8-4-4-4-12 groups. Other UUID spellings (uppercase,
/// braced, unhyphenated) are rejected, matching the server.
pub fn is_valid_calendar_id(id: &str) -> bool {
    Uuid::try_parse(id).is_ok_and(|parsed| parsed.as_hyphenated().to_string() == id)
}

impl Client {
    /// Fetch the events of one sub-calendar.
    ///
    /// `sub_calendar_id` is mandatory and validated locally before any
    /// network call. Documented statuses: `403` →
    /// [`Error::PermissionDenied`].
    pub fn get_calendar_events(
        &self,
        params: CalendarEventsParameters,
    ) -> Result<CalendarEventCollection> {
        if params.sub_calendar_id.is_empty() {
            return Err(Error::MissingParameter("subCalendarId"));
        }
        if !is_valid_calendar_id(&params.sub_calendar_id) {
            return Err(Error::InvalidFormat {
                field: "subCalendarId",
                value: params.sub_calendar_id.clone(),
            });
        }

        let (status, payload) = self.do_request(
            HttpMethod::Get,
            &format!("{CALENDAR_REST_BASE}/calendar/events.json"),
            &params,
            None,
        )?;
        classify(status, payload)
    }

    /// List the calendars visible to the caller.
    ///
    /// Every entry of `include_sub_calendar_id` is validated locally
    /// before any network call. Documented statuses: `403` →
    /// [`Error::PermissionDenied`].
    pub fn get_calendars(&self, params: CalendarsParameters) -> Result<CalendarCollection> {
        for id in &params.include_sub_calendar_id {
            if id.is_empty() {
                return Err(Error::MissingParameter("include"));
            }
            if !is_valid_calendar_id(id) {
                return Err(Error::InvalidFormat {
                    field: "include",
                    value: id.clone(),
                });
            }
        }

        let (status, payload) = self.do_request(
            HttpMethod::Get,
            &format!("{CALENDAR_REST_BASE}/calendar/subcalendars.json"),
            &params,
            None,
        )?;
        classify(status, payload)
    }
}
