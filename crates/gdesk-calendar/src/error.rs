//! Errors from the Calendar v3 API.

use gdesk_core::NetworkError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CalendarError {
    #[error("Not authorized for the Calendar API")]
    AuthRequired,

    #[error("Access token rejected")]
    TokenExpired,

    #[error("Rate limited for {0}s")]
    RateLimited(u64),

    #[error("No such calendar: {0}")]
    CalendarNotFound(String),

    #[error("Calendar API error: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    Network(#[from] NetworkError),
}

impl CalendarError {
    /// Message shown on the dashboard.
    pub fn user_message(&self) -> String {
        match self {
            Self::AuthRequired => "Sign in with Google to see your calendar.".to_string(),
            Self::TokenExpired => "Your Google session has expired. Sign in again.".to_string(),
            Self::RateLimited(secs) => {
                format!("Google Calendar is throttling requests; retry in {}s.", secs)
            }
            Self::CalendarNotFound(id) => {
                format!("Calendar {} is not visible to this account.", id)
            }
            Self::ApiError(msg) => format!("Google Calendar request failed: {}", msg),
            Self::Network(e) => e.user_message().to_string(),
        }
    }

    /// A fresh token could fix this.
    pub fn should_refresh_token(&self) -> bool {
        matches!(self, Self::TokenExpired | Self::AuthRequired)
    }
}
