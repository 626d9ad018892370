//! Errors surfaced to session callers.

use gdesk_auth::AuthError;
use gdesk_calendar::CalendarError;
use gdesk_directory::DirectoryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Client is not configured: {0}")]
    NotConfigured(String),

    #[error("Client has not been initialized")]
    NotInitialized,

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Calendar(#[from] CalendarError),

    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

impl SessionError {
    pub fn user_message(&self) -> String {
        match self {
            SessionError::NotConfigured(_) => {
                "Google sign-in is not configured. Check your settings.".to_string()
            }
            SessionError::NotInitialized => "Still starting up. Please try again.".to_string(),
            SessionError::Auth(e) => e.user_message().to_string(),
            SessionError::Calendar(e) => e.user_message(),
            SessionError::Directory(e) => e.user_message(),
        }
    }

    /// Whether the user has to sign in again before retrying.
    pub fn requires_sign_in(&self) -> bool {
        match self {
            SessionError::Auth(
                AuthError::NotSignedIn | AuthError::TokenExpired | AuthError::InvalidGrant(_),
            ) => true,
            SessionError::Calendar(e) => e.should_refresh_token(),
            SessionError::Directory(DirectoryError::TokenExpired) => true,
            _ => false,
        }
    }
}
