use crate::types::Calendar;

const HOLIDAY_MARKER: &str = "holiday";

/// First calendar whose display name contains "holiday", ignoring case.
pub fn find_holiday_calendar(calendars: &[Calendar]) -> Option<&Calendar> {
    calendars
        .iter()
        .find(|calendar| calendar.summary.to_lowercase().contains(HOLIDAY_MARKER))
}

pub fn holiday_calendar_id(calendars: &[Calendar]) -> Option<String> {
    find_holiday_calendar(calendars).map(|calendar| calendar.id.clone())
}
