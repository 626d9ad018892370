//! The seam between the session and Google's APIs.

use async_trait::async_trait;
use gdesk_auth::{AuthError, BasicProfile};
use gdesk_calendar::{ApiEvent, Calendar, CalendarError, EventQuery};
use gdesk_core::Config;
use gdesk_directory::{DirectoryError, DirectoryUser, UserQuery};

use crate::error::SessionError;

/// What the client needs to start: credentials and the scope set.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub api_key: Option<String>,
    pub client_id: String,
    pub client_secret: Option<String>,
    pub scopes: Vec<String>,
    pub redirect_port: u16,
}

impl ClientConfig {
    pub fn from_config(config: &Config) -> Result<Self, SessionError> {
        let client_id = config
            .google
            .client_id
            .clone()
            .filter(|_| config.google.is_configured())
            .ok_or_else(|| SessionError::NotConfigured("google.client_id".to_string()))?;

        Ok(Self {
            api_key: config.google.api_key.clone(),
            client_id,
            client_secret: config.google.client_secret.clone(),
            scopes: config.google.unique_scopes(),
            redirect_port: config.google.redirect_port,
        })
    }
}

/// Client for the identity provider plus the Calendar and Directory APIs.
///
/// `init` restores any existing session without prompting; `load_modules`
/// prepares the API clients for it. The list calls return the first page
/// of results only.
#[async_trait]
pub trait WorkspaceApi: Send + Sync {
    async fn init(&self, config: &ClientConfig) -> Result<(), SessionError>;

    async fn load_modules(&self) -> Result<(), SessionError>;

    fn is_signed_in(&self) -> bool;

    async fn basic_profile(&self) -> Result<BasicProfile, AuthError>;

    async fn list_calendars(&self) -> Result<Vec<Calendar>, CalendarError>;

    async fn list_events(&self, query: &EventQuery) -> Result<Vec<ApiEvent>, CalendarError>;

    async fn list_users(&self, query: &UserQuery) -> Result<Vec<DirectoryUser>, DirectoryError>;

    /// Interactive sign-in.
    async fn sign_in(&self) -> Result<(), SessionError>;

    async fn sign_out(&self) -> Result<(), SessionError>;
}
