//! View shapes handed to the dashboard.
//!
//! `CalendarEvent.people` is omitted when an event has no attendees, while
//! `Meeting.attendees` is always present (possibly empty). Both the agenda
//! renderer and the meeting list depend on that difference.

use serde::Serialize;

use crate::types::{ApiEvent, Attendee, EventTime};

/// Tag carried by the signed-in user's own events.
pub const USER_EVENT_TAG: &str = "meeting";

/// Display color for holiday events.
pub const HOLIDAY_COLOR: &str = "#039BE5";

/// How an agenda entry is styled: by calendar tag or by a fixed color.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EventTag {
    CalendarId(String),
    Color(String),
}

/// Agenda entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub start: Option<EventTime>,
    pub end: Option<EventTime>,
    #[serde(flatten)]
    pub tag: EventTag,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub people: Option<Vec<String>>,
}

impl CalendarEvent {
    /// Normalize one of the user's own events.
    pub fn from_user_event(api: ApiEvent) -> Self {
        let people: Vec<String> = api
            .attendees
            .unwrap_or_default()
            .into_iter()
            .filter_map(|a| a.email)
            .collect();

        Self {
            id: api.id,
            title: api.summary.unwrap_or_default(),
            start: api.start.as_ref().and_then(|t| t.parse_date_time().or_else(|| t.parse_date())),
            end: api.end.as_ref().and_then(|t| t.parse_date_time().or_else(|| t.parse_date())),
            tag: EventTag::CalendarId(USER_EVENT_TAG.to_string()),
            people: if people.is_empty() { None } else { Some(people) },
        }
    }

    /// Normalize a holiday: all-day, starting and ending on its start date.
    pub fn from_holiday(api: ApiEvent) -> Self {
        let day = api.start.as_ref().and_then(|t| t.parse_date().or_else(|| t.parse_date_time()));

        Self {
            id: api.id,
            title: api.summary.unwrap_or_default(),
            start: day.clone(),
            end: day,
            tag: EventTag::Color(HOLIDAY_COLOR.to_string()),
            people: None,
        }
    }
}

/// Meeting list entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Meeting {
    pub id: String,
    pub organizer: Option<String>,
    pub summary: String,
    pub start: Option<EventTime>,
    pub end: Option<EventTime>,
    pub show_link: Option<String>,
    pub join_link: Option<String>,
    pub attendees: Vec<Attendee>,
}

impl Meeting {
    pub fn from_api(api: ApiEvent) -> Self {
        let join_link = api.join_link();

        Self {
            id: api.id,
            organizer: api.organizer.and_then(|o| o.email),
            summary: api.summary.unwrap_or_default(),
            start: api.start.as_ref().and_then(|t| t.parse_date_time().or_else(|| t.parse_date())),
            end: api.end.as_ref().and_then(|t| t.parse_date_time().or_else(|| t.parse_date())),
            show_link: api.html_link,
            join_link,
            attendees: api.attendees.unwrap_or_default(),
        }
    }
}

/// Normalize and concatenate: user events first, then holidays, each half in
/// the order the API returned it.
pub fn aggregate_events(user_events: Vec<ApiEvent>, holidays: Vec<ApiEvent>) -> Vec<CalendarEvent> {
    user_events
        .into_iter()
        .map(CalendarEvent::from_user_event)
        .chain(holidays.into_iter().map(CalendarEvent::from_holiday))
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use chrono::NaiveDate;

    fn api_event(json: serde_json::Value) -> ApiEvent {
        serde_json::from_value(json).unwrap()
    }

    fn timed(id: &str, start: &str, end: &str) -> ApiEvent {
        api_event(serde_json::json!({
            "id": id,
            "summary": id,
            "start": {"dateTime": start},
            "end": {"dateTime": end}
        }))
    }

    #[test]
    fn test_no_attendees_omits_people_but_meeting_has_empty_list() {
        let event = timed("e1", "2024-02-01T10:00:00Z", "2024-02-01T11:00:00Z");

        let calendar_event = CalendarEvent::from_user_event(event.clone());
        assert_eq!(calendar_event.people, None);
        let value = serde_json::to_value(&calendar_event).unwrap();
        assert!(value.get("people").is_none());

        let meeting = Meeting::from_api(event);
        assert!(meeting.attendees.is_empty());
        let value = serde_json::to_value(&meeting).unwrap();
        assert_eq!(value["attendees"], serde_json::json!([]));
    }

    #[test]
    fn test_empty_attendee_list_also_omits_people() {
        let event = api_event(serde_json::json!({
            "id": "e1",
            "start": {"dateTime": "2024-02-01T10:00:00Z"},
            "end": {"dateTime": "2024-02-01T11:00:00Z"},
            "attendees": []
        }));
        assert_eq!(CalendarEvent::from_user_event(event).people, None);
    }

    #[test]
    fn test_user_event_extracts_attendee_emails() {
        let event = api_event(serde_json::json!({
            "id": "e1",
            "summary": "Project Review",
            "start": {"dateTime": "2024-02-01T14:00:00Z"},
            "end": {"dateTime": "2024-02-01T15:00:00Z"},
            "attendees": [
                {"email": "alice@example.com", "organizer": true},
                {"email": "bob@example.com", "responseStatus": "tentative"}
            ]
        }));

        let normalized = CalendarEvent::from_user_event(event);
        assert_eq!(normalized.title, "Project Review");
        assert_eq!(normalized.tag, EventTag::CalendarId("meeting".to_string()));
        assert_eq!(
            normalized.people,
            Some(vec!["alice@example.com".to_string(), "bob@example.com".to_string()])
        );

        let value = serde_json::to_value(&normalized).unwrap();
        assert_eq!(value["calendarId"], "meeting");
        assert!(value.get("color").is_none());
    }

    #[test]
    fn test_holiday_is_same_day_with_fixed_color() {
        let holiday = api_event(serde_json::json!({
            "id": "h1",
            "summary": "Christmas Day",
            "start": {"date": "2024-12-25"},
            "end": {"date": "2024-12-26"}
        }));

        let normalized = CalendarEvent::from_holiday(holiday);
        let day = EventTime::Date(NaiveDate::from_ymd_opt(2024, 12, 25).unwrap());
        assert_eq!(normalized.start, Some(day.clone()));
        assert_eq!(normalized.end, Some(day));
        assert_eq!(normalized.tag, EventTag::Color(HOLIDAY_COLOR.to_string()));

        let value = serde_json::to_value(&normalized).unwrap();
        assert_eq!(value["color"], "#039BE5");
        assert_eq!(value["start"], "2024-12-25");
        assert_eq!(value["end"], "2024-12-25");
    }

    #[test]
    fn test_aggregate_keeps_user_events_first() {
        let user = vec![
            timed("e1", "2024-02-01T10:00:00Z", "2024-02-01T10:30:00Z"),
            timed("e2", "2024-02-01T11:00:00Z", "2024-02-01T11:30:00Z"),
        ];
        let holidays = vec![api_event(serde_json::json!({
            "id": "h1",
            "summary": "Founders Day",
            "start": {"date": "2024-01-15"},
            "end": {"date": "2024-01-16"}
        }))];

        let ids: Vec<String> = aggregate_events(user, holidays).into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["e1", "e2", "h1"]);
    }

    #[test]
    fn test_aggregate_without_holidays() {
        let user = vec![timed("e1", "2024-02-01T10:00:00Z", "2024-02-01T10:30:00Z")];
        let events = aggregate_events(user, Vec::new());
        assert_eq!(events.len(), 1);
        assert!(events.iter().all(|e| matches!(e.tag, EventTag::CalendarId(_))));
    }

    #[test]
    fn test_meeting_fields() {
        let event = api_event(serde_json::json!({
            "id": "m1",
            "summary": "Standup",
            "organizer": {"email": "lead@example.com"},
            "start": {"dateTime": "2024-02-01T09:00:00-05:00"},
            "end": {"dateTime": "2024-02-01T09:15:00-05:00"},
            "htmlLink": "https://calendar.google.com/event?eid=m1",
            "hangoutLink": "https://meet.google.com/xyz",
            "attendees": [{"email": "dev@example.com", "responseStatus": "accepted"}]
        }));

        let meeting = Meeting::from_api(event);
        assert_eq!(meeting.organizer.as_deref(), Some("lead@example.com"));
        assert_eq!(meeting.show_link.as_deref(), Some("https://calendar.google.com/event?eid=m1"));
        assert_eq!(meeting.join_link.as_deref(), Some("https://meet.google.com/xyz"));
        assert_eq!(meeting.attendees.len(), 1);

        let value = serde_json::to_value(&meeting).unwrap();
        assert_eq!(value["showLink"], "https://calendar.google.com/event?eid=m1");
        assert_eq!(value["joinLink"], "https://meet.google.com/xyz");
        assert_eq!(value["attendees"][0]["email"], "dev@example.com");
    }

    #[test]
    fn test_meeting_without_organizer() {
        let event = timed("m2", "2024-02-01T09:00:00Z", "2024-02-01T09:15:00Z");
        let meeting = Meeting::from_api(event);
        assert_eq!(meeting.organizer, None);
        assert_eq!(meeting.join_link, None);
    }
}
