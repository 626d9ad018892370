//! Plain state carried by a session.

use gdesk_core::UiConfig;
use serde::Serialize;

/// Sign-in flags and the current user.
///
/// `loading` is only set while the client starts up and checks for an
/// existing session.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub logged_in: bool,
    pub loading: bool,
    pub current_user: String,
    /// Why the last bootstrap or sign-in failed, if it did.
    pub last_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeState {
    pub bg_color: String,
    pub font_color: String,
}

impl Default for ThemeState {
    fn default() -> Self {
        UiConfig::default().into()
    }
}

impl From<UiConfig> for ThemeState {
    fn from(ui: UiConfig) -> Self {
        Self {
            bg_color: ui.bg_color,
            font_color: ui.font_color,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UiState {
    pub nav_expanded: bool,
    pub theme: ThemeState,
    pub search_filters: Vec<String>,
}

impl From<&UiConfig> for UiState {
    fn from(ui: &UiConfig) -> Self {
        Self {
            nav_expanded: ui.nav_expanded,
            theme: ui.clone().into(),
            search_filters: Vec::new(),
        }
    }
}
