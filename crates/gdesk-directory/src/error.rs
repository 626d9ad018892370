//! Directory-specific error types.

use gdesk_core::NetworkError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Not authorized to read the directory")]
    Forbidden,

    #[error("Customer not found: {0}")]
    CustomerNotFound(String),

    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    Network(#[from] NetworkError),
}

impl DirectoryError {
    /// User-friendly error message for UI display.
    pub fn user_message(&self) -> String {
        match self {
            Self::TokenExpired => "Your session has expired. Please sign in again.".to_string(),
            Self::Forbidden => "Your account cannot read the organization directory.".to_string(),
            Self::CustomerNotFound(_) => "Organization not found".to_string(),
            Self::RateLimited(secs) => format!("Too many requests. Please wait {} seconds.", secs),
            Self::ApiError(msg) => format!("Directory error: {}", msg),
            Self::Network(e) => e.user_message().to_string(),
        }
    }
}
