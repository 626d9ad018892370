use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use gdesk_auth::TokenStore;
use gdesk_calendar::{
    aggregate_events, holiday_calendar_id, CalendarEvent, EventQuery, Meeting, MEETINGS_LIMIT,
    PRIMARY_CALENDAR, USER_EVENTS_LIMIT,
};
use gdesk_core::Config;
use gdesk_directory::{DirectoryUser, UserQuery};
use parking_lot::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::api::{ClientConfig, WorkspaceApi};
use crate::error::SessionError;
use crate::google::GoogleWorkspace;
use crate::state::{SessionState, ThemeState, UiState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    SignedIn,
    SignedOut,
}

/// Session and data context shared by the dashboard.
pub struct Session {
    api: Arc<dyn WorkspaceApi>,
    client_config: ClientConfig,
    state: Arc<RwLock<SessionState>>,
    ui: RwLock<UiState>,
    bootstrapped: AtomicBool,
    prefetch: Mutex<Option<JoinHandle<()>>>,
    cancel: CancellationToken,
}

impl Session {
    pub fn new(api: Arc<dyn WorkspaceApi>, client_config: ClientConfig, ui: UiState) -> Self {
        Self {
            api,
            client_config,
            state: Arc::new(RwLock::new(SessionState::default())),
            ui: RwLock::new(ui),
            bootstrapped: AtomicBool::new(false),
            prefetch: Mutex::new(None),
            cancel: CancellationToken::new(),
        }
    }

    /// Session over Google's APIs with tokens kept in the config directory.
    pub fn from_config(config: &Config) -> Result<Self, SessionError> {
        let client_config = ClientConfig::from_config(config)?;
        let api = Arc::new(GoogleWorkspace::new(TokenStore::new(config.token_dir())));
        Ok(Self::new(api, client_config, UiState::from(&config.ui)))
    }

    /// Start the client and check for an existing session without prompting.
    ///
    /// Runs once per session; later calls report the current status. When a
    /// session exists the current user and upcoming meetings are fetched in
    /// the background. On failure the session is left signed out with
    /// `last_error` set.
    #[tracing::instrument(skip(self), level = "info")]
    pub async fn bootstrap(&self) -> Result<SessionStatus, SessionError> {
        if self.bootstrapped.swap(true, Ordering::SeqCst) {
            tracing::debug!("bootstrap already ran");
            return Ok(self.status());
        }

        self.state.write().loading = true;
        let result = self.start_client().await;

        let mut state = self.state.write();
        state.loading = false;
        match result {
            Ok(true) => {
                state.logged_in = true;
                state.last_error = None;
                drop(state);
                tracing::info!("Existing Google session found");
                self.spawn_prefetch();
                Ok(SessionStatus::SignedIn)
            }
            Ok(false) => {
                state.logged_in = false;
                tracing::info!("No Google session; sign-in required");
                Ok(SessionStatus::SignedOut)
            }
            Err(e) => {
                state.logged_in = false;
                state.last_error = Some(e.to_string());
                tracing::error!("Session bootstrap failed: {}", e);
                Err(e)
            }
        }
    }

    async fn start_client(&self) -> Result<bool, SessionError> {
        self.api.init(&self.client_config).await?;
        self.api.load_modules().await?;
        Ok(self.api.is_signed_in())
    }

    fn spawn_prefetch(&self) {
        let api = self.api.clone();
        let state = self.state.clone();
        let cancel = self.cancel.child_token();

        let handle = tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => tracing::debug!("prefetch cancelled"),
                _ = prefetch(api, state) => {}
            }
        });

        if let Some(previous) = self.prefetch.lock().replace(handle) {
            previous.abort();
        }
    }

    /// Wait for the background fetch started by bootstrap or sign-in.
    pub async fn wait_for_prefetch(&self) {
        let handle = self.prefetch.lock().take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                if !e.is_cancelled() {
                    tracing::warn!("prefetch task failed: {}", e);
                }
            }
        }
    }

    /// Interactive sign-in; on success behaves like a bootstrap that found a session.
    pub async fn sign_in(&self) -> Result<(), SessionError> {
        if let Err(e) = self.api.sign_in().await {
            self.state.write().last_error = Some(e.to_string());
            return Err(e);
        }

        {
            let mut state = self.state.write();
            state.logged_in = true;
            state.last_error = None;
        }
        self.spawn_prefetch();
        Ok(())
    }

    pub async fn sign_out(&self) -> Result<(), SessionError> {
        let pending = self.prefetch.lock().take();
        if let Some(handle) = pending {
            handle.abort();
        }
        self.api.sign_out().await?;

        let mut state = self.state.write();
        state.logged_in = false;
        state.current_user.clear();
        Ok(())
    }

    /// Stop background work.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    pub async fn get_current_user(&self) -> Result<String, SessionError> {
        fetch_current_user(self.api.as_ref(), &self.state).await
    }

    pub async fn get_users(&self) -> Result<Vec<DirectoryUser>, SessionError> {
        Ok(self.api.list_users(&UserQuery::my_customer()).await?)
    }

    pub async fn get_meetings(&self) -> Result<Vec<Meeting>, SessionError> {
        fetch_meetings(self.api.as_ref()).await
    }

    pub async fn get_holiday_calendar_id(&self) -> Result<Option<String>, SessionError> {
        let calendars = self.api.list_calendars().await?;
        Ok(holiday_calendar_id(&calendars))
    }

    /// The user's upcoming events followed by upcoming holidays.
    pub async fn get_calendar_events(&self) -> Result<Vec<CalendarEvent>, SessionError> {
        let user_events = self
            .api
            .list_events(&EventQuery::upcoming(PRIMARY_CALENDAR, USER_EVENTS_LIMIT))
            .await?;

        let holidays = match self.get_holiday_calendar_id().await? {
            Some(calendar_id) => {
                self.api
                    .list_events(&EventQuery::upcoming(&calendar_id, USER_EVENTS_LIMIT))
                    .await?
            }
            None => {
                tracing::info!("No holiday calendar found");
                Vec::new()
            }
        };

        tracing::debug!(
            user = user_events.len(),
            holidays = holidays.len(),
            "calendar events fetched"
        );
        Ok(aggregate_events(user_events, holidays))
    }

    pub fn state(&self) -> SessionState {
        self.state.read().clone()
    }

    pub fn status(&self) -> SessionStatus {
        if self.state.read().logged_in {
            SessionStatus::SignedIn
        } else {
            SessionStatus::SignedOut
        }
    }

    pub fn set_logged_in(&self, logged_in: bool) {
        self.state.write().logged_in = logged_in;
    }

    pub fn set_loading(&self, loading: bool) {
        self.state.write().loading = loading;
    }

    pub fn ui(&self) -> UiState {
        self.ui.read().clone()
    }

    pub fn theme(&self) -> ThemeState {
        self.ui.read().theme.clone()
    }

    pub fn set_bg_color(&self, color: impl Into<String>) {
        self.ui.write().theme.bg_color = color.into();
    }

    pub fn set_font_color(&self, color: impl Into<String>) {
        self.ui.write().theme.font_color = color.into();
    }

    pub fn nav_expanded(&self) -> bool {
        self.ui.read().nav_expanded
    }

    pub fn set_nav_expanded(&self, expanded: bool) {
        self.ui.write().nav_expanded = expanded;
    }

    pub fn search_filters(&self) -> Vec<String> {
        self.ui.read().search_filters.clone()
    }

    pub fn set_search_filters(&self, filters: Vec<String>) {
        self.ui.write().search_filters = filters;
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn fetch_current_user(
    api: &dyn WorkspaceApi,
    state: &RwLock<SessionState>,
) -> Result<String, SessionError> {
    let profile = api.basic_profile().await?;
    state.write().current_user = profile.email.clone();
    Ok(profile.email)
}

async fn fetch_meetings(api: &dyn WorkspaceApi) -> Result<Vec<Meeting>, SessionError> {
    let events = api
        .list_events(&EventQuery::upcoming(PRIMARY_CALENDAR, MEETINGS_LIMIT))
        .await?;
    Ok(events.into_iter().map(Meeting::from_api).collect())
}

async fn prefetch(api: Arc<dyn WorkspaceApi>, state: Arc<RwLock<SessionState>>) {
    match fetch_meetings(api.as_ref()).await {
        Ok(meetings) => tracing::debug!(count = meetings.len(), "meetings prefetched"),
        Err(e) => tracing::warn!("Meeting prefetch failed: {}", e),
    }
    match fetch_current_user(api.as_ref(), &state).await {
        Ok(user) => tracing::info!("Signed in as {}", user),
        Err(e) => tracing::warn!("Current user prefetch failed: {}", e),
    }
}
