use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::ConfigError;

/// Scopes requested at sign-in.
///
/// This list is broader than what the dashboard reads; review it before
/// shipping to a new tenant.
pub const DEFAULT_SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/admin.directory.group",
    "https://www.googleapis.com/auth/admin.directory.user",
    "https://www.googleapis.com/auth/admin.directory.group.member",
    "https://www.googleapis.com/auth/admin.directory.user",
    "https://www.googleapis.com/auth/admin.directory.user.security",
    "https://www.googleapis.com/auth/cloud-platform",
    "https://www.googleapis.com/auth/devstorage.full_control",
    "https://www.googleapis.com/auth/devstorage.read_write",
    "https://www.googleapis.com/auth/gmail.send",
    "https://www.googleapis.com/auth/calendar",
];

const ENV_API_KEY: &str = "GDESK_API_KEY";
const ENV_CLIENT_ID: &str = "GDESK_CLIENT_ID";
const ENV_CLIENT_SECRET: &str = "GDESK_CLIENT_SECRET";

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application configuration directory
    pub config_dir: PathBuf,

    /// Google API client settings
    #[serde(default)]
    pub google: GoogleConfig,

    /// UI preferences
    #[serde(default)]
    pub ui: UiConfig,
}

/// Google API client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleConfig {
    /// Browser API key, sent as `key=` on REST calls when present
    #[serde(default)]
    pub api_key: Option<String>,

    /// OAuth client ID
    #[serde(default)]
    pub client_id: Option<String>,

    /// OAuth client secret (installed-app clients still carry one)
    #[serde(default)]
    pub client_secret: Option<String>,

    /// Scopes requested at sign-in
    #[serde(default = "default_scopes")]
    pub scopes: Vec<String>,

    /// Loopback port for the OAuth redirect
    #[serde(default = "default_redirect_port")]
    pub redirect_port: u16,
}

fn default_scopes() -> Vec<String> {
    DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect()
}

fn default_redirect_port() -> u16 {
    8080
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            client_id: None,
            client_secret: None,
            scopes: default_scopes(),
            redirect_port: default_redirect_port(),
        }
    }
}

impl GoogleConfig {
    /// Scopes with duplicates removed, first occurrence wins.
    pub fn unique_scopes(&self) -> Vec<String> {
        let mut seen = Vec::with_capacity(self.scopes.len());
        for scope in &self.scopes {
            if !seen.contains(scope) {
                seen.push(scope.clone());
            }
        }
        seen
    }

    /// Check if OAuth credentials are present (not placeholders)
    pub fn is_configured(&self) -> bool {
        matches!(&self.client_id, Some(id) if !id.is_empty() && !id.starts_with("YOUR_"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Accent background color
    #[serde(default = "default_bg_color")]
    pub bg_color: String,

    /// Foreground color drawn on the accent
    #[serde(default = "default_font_color")]
    pub font_color: String,

    /// Navigation pane starts expanded
    #[serde(default)]
    pub nav_expanded: bool,
}

fn default_bg_color() -> String {
    "#0078D4".to_string()
}

fn default_font_color() -> String {
    "#FFFFFF".to_string()
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            bg_color: default_bg_color(),
            font_color: default_font_color(),
            nav_expanded: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gdesk");

        Self {
            config_dir,
            google: GoogleConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default location, creating it if missing,
    /// then apply `GDESK_*` environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load configuration and validate it.
    ///
    /// Warnings are logged; errors fail the load.
    pub fn load_validated() -> Result<(Self, ValidationResult), ConfigError> {
        let config = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()));
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    /// Load from an explicit file, writing defaults there if it doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            let mut config = Self::default();
            if let Some(parent) = path.parent() {
                config.config_dir = parent.to_path_buf();
            }
            config.save_to(path)?;
            return Ok(config);
        }

        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed(e.to_string()))?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Replace secrets with values from `lookup` (normally the process environment).
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup(ENV_API_KEY) {
            self.google.api_key = Some(key);
        }
        if let Some(id) = lookup(ENV_CLIENT_ID) {
            self.google.client_id = Some(id);
        }
        if let Some(secret) = lookup(ENV_CLIENT_SECRET) {
            self.google.client_secret = Some(secret);
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        if !self.google.is_configured() {
            result.add_error("google.client_id", "OAuth client ID is not configured");
        }

        if self.google.api_key.as_deref().map_or(true, str::is_empty) {
            result.add_warning(
                "google.api_key",
                "No API key configured; quota is billed to the OAuth client",
            );
        }

        if self.google.scopes.is_empty() {
            result.add_error("google.scopes", "At least one scope is required");
        }
        for scope in &self.google.scopes {
            match Url::parse(scope) {
                Ok(url) if url.scheme() == "https" => {}
                _ => result.add_error(
                    "google.scopes",
                    format!("Scope is not an https URL: {}", scope),
                ),
            }
        }

        if self.google.redirect_port == 0 {
            result.add_error("google.redirect_port", "Port cannot be 0");
        }

        let colors = [
            ("ui.bg_color", &self.ui.bg_color),
            ("ui.font_color", &self.ui.font_color),
        ];
        for (field, value) in colors {
            if !is_hex_color(value) {
                result.add_error(field, format!("Expected a #RRGGBB color, got: {}", value));
            }
        }

        result
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path()?)
    }

    fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::WriteFailed(e.to_string()))?;
        }

        let contents =
            toml::to_string_pretty(self).map_err(|e| ConfigError::WriteFailed(e.to_string()))?;

        std::fs::write(path, contents).map_err(|e| ConfigError::WriteFailed(e.to_string()))
    }

    /// Directory holding stored OAuth tokens.
    pub fn token_dir(&self) -> PathBuf {
        self.config_dir.join("tokens")
    }

    fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?.join("gdesk");
        Ok(config_dir.join("config.toml"))
    }
}

fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    fn configured() -> Config {
        let mut config = Config::default();
        config.google.client_id = Some("client.apps.googleusercontent.com".to_string());
        config.google.api_key = Some("AIza-test".to_string());
        config
    }

    #[test]
    fn test_configured_config_is_valid() {
        let result = configured().validate();
        assert!(result.is_valid(), "errors: {:?}", result.errors);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_missing_client_id_is_an_error() {
        let result = Config::default().validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "google.client_id"));
    }

    #[test]
    fn test_missing_api_key_is_a_warning() {
        let mut config = configured();
        config.google.api_key = None;
        let result = config.validate();
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.field == "google.api_key"));
    }

    #[test]
    fn test_bad_color_rejected() {
        let mut config = configured();
        config.ui.bg_color = "blue".to_string();
        let result = config.validate();
        assert!(result.errors.iter().any(|e| e.field == "ui.bg_color"));
    }

    #[test]
    fn test_non_https_scope_rejected() {
        let mut config = configured();
        config.google.scopes.push("calendar".to_string());
        let result = config.validate();
        assert!(result.errors.iter().any(|e| e.message.contains("calendar")));
    }

    #[test]
    fn test_unique_scopes_drops_repeats_in_order() {
        let scopes = GoogleConfig::default().unique_scopes();
        let user_scope = "https://www.googleapis.com/auth/admin.directory.user";
        assert_eq!(scopes.iter().filter(|s| *s == user_scope).count(), 1);
        assert_eq!(scopes.len(), DEFAULT_SCOPES.len() - 1);
        assert_eq!(scopes[1], user_scope);
        assert_eq!(
            scopes.last().map(String::as_str),
            Some("https://www.googleapis.com/auth/calendar")
        );
    }

    #[test]
    fn test_env_overrides_replace_secrets() {
        let mut config = Config::default();
        config.apply_overrides(|key| match key {
            "GDESK_API_KEY" => Some("env-key".to_string()),
            "GDESK_CLIENT_ID" => Some("env-client".to_string()),
            _ => None,
        });
        assert_eq!(config.google.api_key.as_deref(), Some("env-key"));
        assert_eq!(config.google.client_id.as_deref(), Some("env-client"));
        assert_eq!(config.google.client_secret, None);
    }

    #[test]
    fn test_load_from_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.config_dir, dir.path());
        assert_eq!(config.ui.bg_color, "#0078D4");
        assert_eq!(config.ui.font_color, "#FFFFFF");

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.google.scopes, config.google.scopes);
    }

    #[test]
    fn test_load_from_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "config_dir = \"/tmp/gdesk\"\n[google]\nclient_id = \"abc\"\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.google.client_id.as_deref(), Some("abc"));
        assert_eq!(config.google.redirect_port, 8080);
        assert!(!config.ui.nav_expanded);
        assert_eq!(config.token_dir(), PathBuf::from("/tmp/gdesk/tokens"));
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "this is = = not toml").unwrap();

        assert!(matches!(Config::load_from(&path), Err(ConfigError::ParseError(_))));
    }
}
