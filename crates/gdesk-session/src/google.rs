//! [`WorkspaceApi`] backed by Google's REST endpoints.

use std::sync::Arc;

use async_trait::async_trait;
use gdesk_auth::{
    AuthError, BasicProfile, GoogleOAuth2Provider, OAuth2Provider, TokenSet, TokenStore,
    GOOGLE_SERVICE_ID,
};
use gdesk_calendar::{ApiEvent, Calendar, CalendarClient, CalendarError, EventQuery};
use gdesk_directory::{DirectoryClient, DirectoryError, DirectoryUser, UserQuery};
use parking_lot::RwLock;

use crate::api::{ClientConfig, WorkspaceApi};
use crate::error::SessionError;

/// Endpoint overrides; `None` keeps Google's production URL.
#[derive(Debug, Clone, Default)]
pub struct GoogleEndpoints {
    pub calendar: Option<String>,
    pub directory: Option<String>,
    pub token: Option<String>,
    pub userinfo: Option<String>,
}

struct Modules {
    calendar: Arc<CalendarClient>,
    directory: Arc<DirectoryClient>,
}

pub struct GoogleWorkspace {
    store: TokenStore,
    endpoints: GoogleEndpoints,
    provider: RwLock<Option<Arc<GoogleOAuth2Provider>>>,
    api_key: RwLock<Option<String>>,
    token: RwLock<Option<TokenSet>>,
    modules: RwLock<Option<Modules>>,
}

impl GoogleWorkspace {
    pub fn new(store: TokenStore) -> Self {
        Self::with_endpoints(store, GoogleEndpoints::default())
    }

    pub fn with_endpoints(store: TokenStore, endpoints: GoogleEndpoints) -> Self {
        Self {
            store,
            endpoints,
            provider: RwLock::new(None),
            api_key: RwLock::new(None),
            token: RwLock::new(None),
            modules: RwLock::new(None),
        }
    }

    fn provider(&self) -> Result<Arc<GoogleOAuth2Provider>, SessionError> {
        self.provider.read().clone().ok_or(SessionError::NotInitialized)
    }

    fn access_token(&self) -> Option<String> {
        self.token.read().as_ref().map(|t| t.access_token.clone())
    }

    fn calendar(&self) -> Result<Arc<CalendarClient>, CalendarError> {
        self.modules
            .read()
            .as_ref()
            .map(|m| m.calendar.clone())
            .ok_or(CalendarError::AuthRequired)
    }

    fn directory(&self) -> Result<Arc<DirectoryClient>, DirectoryError> {
        self.modules
            .read()
            .as_ref()
            .map(|m| m.directory.clone())
            .ok_or(DirectoryError::TokenExpired)
    }

    fn build_modules(&self) {
        let Some(access_token) = self.access_token() else {
            *self.modules.write() = None;
            return;
        };
        let api_key = self.api_key.read().clone();

        let calendar = match &self.endpoints.calendar {
            Some(base) => CalendarClient::new_with_base_url(&access_token, base),
            None => CalendarClient::new(&access_token),
        };
        let directory = match &self.endpoints.directory {
            Some(base) => DirectoryClient::new_with_base_url(&access_token, base),
            None => DirectoryClient::new(&access_token),
        };

        *self.modules.write() = Some(Modules {
            calendar: Arc::new(calendar.with_api_key(api_key.clone())),
            directory: Arc::new(directory.with_api_key(api_key)),
        });
    }
}

#[async_trait]
impl WorkspaceApi for GoogleWorkspace {
    async fn init(&self, config: &ClientConfig) -> Result<(), SessionError> {
        let mut provider = GoogleOAuth2Provider::new(
            config.client_id.clone(),
            config.client_secret.clone(),
            config.scopes.clone(),
            config.redirect_port,
        );
        if let (Some(token), Some(userinfo)) = (&self.endpoints.token, &self.endpoints.userinfo) {
            provider = provider.with_endpoints(token, userinfo);
        }
        let provider = Arc::new(provider);

        *self.provider.write() = Some(provider.clone());
        *self.api_key.write() = config.api_key.clone();

        let token = provider.silent_sign_in(&self.store).await?;
        *self.token.write() = token;
        Ok(())
    }

    async fn load_modules(&self) -> Result<(), SessionError> {
        self.build_modules();
        tracing::debug!(loaded = self.modules.read().is_some(), "calendar and directory modules");
        Ok(())
    }

    fn is_signed_in(&self) -> bool {
        self.token.read().is_some()
    }

    async fn basic_profile(&self) -> Result<BasicProfile, AuthError> {
        let provider = self.provider.read().clone().ok_or(AuthError::NotConfigured)?;
        let access_token = self.access_token().ok_or(AuthError::NotSignedIn)?;
        provider.basic_profile(&access_token).await
    }

    async fn list_calendars(&self) -> Result<Vec<Calendar>, CalendarError> {
        self.calendar()?.list_calendars().await
    }

    async fn list_events(&self, query: &EventQuery) -> Result<Vec<ApiEvent>, CalendarError> {
        self.calendar()?.list_events(query).await
    }

    async fn list_users(&self, query: &UserQuery) -> Result<Vec<DirectoryUser>, DirectoryError> {
        self.directory()?.list_users(query).await
    }

    async fn sign_in(&self) -> Result<(), SessionError> {
        let provider = self.provider()?;
        let token = provider.authenticate(&self.store).await?;
        *self.token.write() = Some(token);
        self.build_modules();
        Ok(())
    }

    async fn sign_out(&self) -> Result<(), SessionError> {
        self.store.delete(GOOGLE_SERVICE_ID)?;
        *self.token.write() = None;
        *self.modules.write() = None;
        Ok(())
    }
}
