//! Google Calendar integration for gdesk.
//!
//! Provides the Calendar v3 client plus the dashboard's view shapes:
//! [`CalendarEvent`] for the agenda and [`Meeting`] for the meeting list.

pub mod client;
pub mod error;
pub mod holiday;
pub mod types;
pub mod view;

pub use client::{
    CalendarClient, EventOrder, EventQuery, MEETINGS_LIMIT, PRIMARY_CALENDAR, USER_EVENTS_LIMIT,
};
pub use error::CalendarError;
pub use holiday::{find_holiday_calendar, holiday_calendar_id};
pub use types::{AccessRole, ApiEvent, ApiEventTime, Attendee, Calendar, EventTime};
pub use view::{aggregate_events, CalendarEvent, EventTag, Meeting, HOLIDAY_COLOR, USER_EVENT_TAG};
