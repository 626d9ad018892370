//! Calendar API types and data structures.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

/// Event time - either a specific datetime or an all-day date.
///
/// Serializes to the same string forms the API uses (`dateTime` RFC 3339,
/// `date` as `YYYY-MM-DD`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventTime {
    DateTime(DateTime<FixedOffset>),
    Date(NaiveDate),
}

impl EventTime {
    pub fn is_all_day(&self) -> bool {
        matches!(self, EventTime::Date(_))
    }
}

/// Event attendee, kept as the API returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendee {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organizer: Option<bool>,
    #[serde(rename = "self", default, skip_serializing_if = "Option::is_none")]
    pub is_self: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optional: Option<bool>,
    /// Any other attendee fields, carried through unchanged.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Calendar metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Calendar {
    pub id: String,
    pub summary: String,
    pub description: Option<String>,
    pub time_zone: Option<String>,
    pub background_color: Option<String>,
    pub is_primary: bool,
    pub access_role: AccessRole,
}

/// Calendar access role.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub enum AccessRole {
    Owner,
    Writer,
    #[default]
    Reader,
    FreeBusyReader,
}

// API Response Types

/// Google Calendar API event resource (the fields the dashboard reads).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEvent {
    pub id: String,
    pub summary: Option<String>,
    pub start: Option<ApiEventTime>,
    pub end: Option<ApiEventTime>,
    /// `None` when the resource carries no `attendees` field at all.
    pub attendees: Option<Vec<Attendee>>,
    pub organizer: Option<ApiOrganizer>,
    pub status: Option<String>,
    pub html_link: Option<String>,
    pub hangout_link: Option<String>,
    pub conference_data: Option<ApiConferenceData>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEventTime {
    pub date_time: Option<String>,
    pub date: Option<String>,
    pub time_zone: Option<String>,
}

impl ApiEventTime {
    pub fn parse_date_time(&self) -> Option<EventTime> {
        let raw = self.date_time.as_deref()?;
        DateTime::parse_from_rfc3339(raw).ok().map(EventTime::DateTime)
    }

    pub fn parse_date(&self) -> Option<EventTime> {
        let raw = self.date.as_deref()?;
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok().map(EventTime::Date)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiOrganizer {
    pub email: Option<String>,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiConferenceData {
    #[serde(default)]
    pub entry_points: Vec<ApiEntryPoint>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEntryPoint {
    pub entry_point_type: Option<String>,
    pub uri: Option<String>,
}

/// API response for event list.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventListResponse {
    #[serde(default)]
    pub items: Vec<ApiEvent>,
    pub next_page_token: Option<String>,
}

/// API response for calendar list.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarListResponse {
    #[serde(default)]
    pub items: Vec<ApiCalendar>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCalendar {
    pub id: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub time_zone: Option<String>,
    pub background_color: Option<String>,
    #[serde(default)]
    pub primary: bool,
    pub access_role: Option<String>,
}

impl From<ApiCalendar> for Calendar {
    fn from(api: ApiCalendar) -> Self {
        let access_role = match api.access_role.as_deref() {
            Some("owner") => AccessRole::Owner,
            Some("writer") => AccessRole::Writer,
            Some("freeBusyReader") => AccessRole::FreeBusyReader,
            _ => AccessRole::Reader,
        };

        Self {
            id: api.id,
            summary: api.summary.unwrap_or_default(),
            description: api.description,
            time_zone: api.time_zone,
            background_color: api.background_color,
            is_primary: api.primary,
            access_role,
        }
    }
}

impl ApiEvent {
    /// Conferencing join link: the Meet link, else the first video entry point.
    pub fn join_link(&self) -> Option<String> {
        if let Some(link) = &self.hangout_link {
            return Some(link.clone());
        }
        self.conference_data
            .as_ref()?
            .entry_points
            .iter()
            .find(|ep| ep.entry_point_type.as_deref() == Some("video"))
            .and_then(|ep| ep.uri.clone())
    }
}
