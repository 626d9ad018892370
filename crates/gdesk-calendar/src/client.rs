//! Google Calendar API client.

use chrono::{DateTime, SecondsFormat, Utc};
use gdesk_core::ReqwestErrorExt;
use tracing::instrument;

use crate::error::CalendarError;
use crate::types::*;

const CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// The signed-in user's default calendar.
pub const PRIMARY_CALENDAR: &str = "primary";

/// Page size for the agenda fetch (the API maximum).
pub const USER_EVENTS_LIMIT: u32 = 2500;

/// Page size for the meeting list.
pub const MEETINGS_LIMIT: u32 = 100;

/// Sort order accepted by `events.list`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOrder {
    StartTime,
}

impl EventOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            EventOrder::StartTime => "startTime",
        }
    }
}

/// Parameters for `events.list`.
#[derive(Debug, Clone, PartialEq)]
pub struct EventQuery {
    pub calendar_id: String,
    pub time_min: DateTime<Utc>,
    pub max_results: u32,
    pub single_events: bool,
    pub order_by: EventOrder,
}

impl EventQuery {
    /// Upcoming events from now, recurring events expanded, by start time.
    pub fn upcoming(calendar_id: &str, max_results: u32) -> Self {
        Self {
            calendar_id: calendar_id.to_string(),
            time_min: Utc::now(),
            max_results,
            single_events: true,
            order_by: EventOrder::StartTime,
        }
    }

    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("timeMin", self.time_min.to_rfc3339_opts(SecondsFormat::Millis, true)),
            ("maxResults", self.max_results.to_string()),
            ("singleEvents", self.single_events.to_string()),
            ("orderBy", self.order_by.as_str().to_string()),
        ]
    }
}

pub struct CalendarClient {
    client: reqwest::Client,
    access_token: String,
    api_key: Option<String>,
    base_url: String,
}

impl CalendarClient {
    pub fn new(access_token: &str) -> Self {
        Self::new_with_base_url(access_token, CALENDAR_API_BASE)
    }

    pub fn new_with_base_url(access_token: &str, base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            access_token: access_token.to_string(),
            api_key: None,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Send the API key as `key=` on every request.
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|k| !k.is_empty());
        self
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        let request = self.client.get(url).bearer_auth(&self.access_token);
        match &self.api_key {
            Some(key) => request.query(&[("key", key)]),
            None => request,
        }
    }

    /// List the calendars visible to the user (first page).
    #[instrument(skip(self), level = "info")]
    pub async fn list_calendars(&self) -> Result<Vec<Calendar>, CalendarError> {
        let url = format!("{}/users/me/calendarList", self.base_url);

        let response = self
            .get(&url)
            .send()
            .await
            .map_err(|e| CalendarError::Network(e.into_network_error()))?;

        let resp: CalendarListResponse = self.handle_response(response, "calendarList").await?;
        if resp.next_page_token.is_some() {
            tracing::debug!("calendarList has more pages; only the first is used");
        }
        Ok(resp.items.into_iter().map(Calendar::from).collect())
    }

    /// List events on a calendar (first page).
    #[instrument(
        skip(self, query),
        fields(calendar_id = %query.calendar_id, max_results = query.max_results),
        level = "info"
    )]
    pub async fn list_events(&self, query: &EventQuery) -> Result<Vec<ApiEvent>, CalendarError> {
        let url = format!(
            "{}/calendars/{}/events",
            self.base_url,
            urlencoding::encode(&query.calendar_id),
        );

        let response = self
            .get(&url)
            .query(&query.to_params())
            .send()
            .await
            .map_err(|e| CalendarError::Network(e.into_network_error()))?;

        let resp: EventListResponse = self.handle_response(response, &query.calendar_id).await?;
        tracing::debug!(count = resp.items.len(), "events listed");
        Ok(resp.items)
    }

    /// Helper to handle API responses and errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
        resource: &str,
    ) -> Result<T, CalendarError> {
        let status = response.status();

        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| CalendarError::ApiError(format!("JSON parse error: {}", e)))
        } else if status.as_u16() == 401 {
            Err(CalendarError::TokenExpired)
        } else if status.as_u16() == 403 {
            Err(CalendarError::AuthRequired)
        } else if status.as_u16() == 404 {
            Err(CalendarError::CalendarNotFound(resource.to_string()))
        } else if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            Err(CalendarError::RateLimited(retry_after))
        } else {
            let text = response.text().await.unwrap_or_default();
            Err(CalendarError::ApiError(format!("{}: {}", status, text)))
        }
    }
}
