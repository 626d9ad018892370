//! Authentication errors (OAuth, tokens, credentials).

use gdesk_core::NetworkError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("OAuth client is not configured")]
    NotConfigured,

    #[error("Not signed in")]
    NotSignedIn,

    #[error("Token expired")]
    TokenExpired,

    #[error("Refresh token rejected: {0}")]
    InvalidGrant(String),

    #[error("OAuth flow failed: {0}")]
    OAuthFailed(String),

    #[error("OAuth state mismatch")]
    CsrfMismatch,

    #[error("Port {0} already in use for OAuth callback")]
    PortInUse(u16),

    #[error("Token storage error: {0}")]
    Storage(String),

    #[error("Network error: {0}")]
    Network(#[from] NetworkError),
}

impl AuthError {
    pub fn user_message(&self) -> &'static str {
        match self {
            AuthError::NotConfigured => "Google sign-in is not configured. Check your settings.",
            AuthError::NotSignedIn => "Not signed in. Please sign in with Google.",
            AuthError::TokenExpired | AuthError::InvalidGrant(_) => {
                "Your session has expired. Please sign in again."
            }
            AuthError::OAuthFailed(_) => "Sign-in failed. Please try again.",
            AuthError::CsrfMismatch => "Sign-in could not be verified. Please try again.",
            AuthError::PortInUse(_) => "Sign-in port is busy. Close other apps and try again.",
            AuthError::Storage(_) => "Failed to access saved credentials.",
            AuthError::Network(e) => e.user_message(),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    #[test]
    fn test_expired_and_revoked_share_message() {
        assert_eq!(
            AuthError::TokenExpired.user_message(),
            AuthError::InvalidGrant("revoked".into()).user_message()
        );
    }

    #[test]
    fn test_network_message_delegates() {
        let err = AuthError::from(NetworkError::Timeout);
        assert_eq!(err.user_message(), NetworkError::Timeout.user_message());
    }
}
