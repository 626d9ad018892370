//! Google sign-in for gdesk.
//!
//! Covers the silent check for an existing session (stored token, refreshed
//! when close to expiry) and the interactive browser flow used by `login`.

pub mod error;
pub mod google;
pub mod oauth;
pub mod storage;

pub use error::AuthError;
pub use google::{BasicProfile, GoogleOAuth2Provider, GOOGLE_SERVICE_ID};
pub use oauth::{OAuth2Config, OAuth2Provider, PendingAuthorization};
pub use storage::{TokenSet, TokenStore};
