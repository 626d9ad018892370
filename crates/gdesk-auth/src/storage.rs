use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::error::AuthError;

/// Token set for OAuth2 authentication
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenSet {
    /// Access token for API requests
    pub access_token: String,

    /// Optional refresh token for token renewal
    pub refresh_token: Option<String>,

    /// Token expiration timestamp (Unix timestamp)
    pub expires_at: i64,

    /// Scopes granted to this token
    pub scopes: Vec<String>,
}

impl TokenSet {
    /// Check if the token needs refresh (within 5 minutes of expiry)
    pub fn needs_refresh(&self) -> bool {
        let now = chrono::Utc::now().timestamp();
        now >= self.expires_at - 300
    }

    /// Check if the token is expired
    pub fn is_expired(&self) -> bool {
        let now = chrono::Utc::now().timestamp();
        now >= self.expires_at
    }
}

/// File-backed token storage, one JSON file per service.
#[derive(Debug, Clone)]
pub struct TokenStore {
    root: PathBuf,
}

impl TokenStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn token_path(&self, service: &str) -> PathBuf {
        self.root.join(format!("{}.json", service))
    }

    /// Store a token set, creating the directory on first use.
    pub fn store(&self, service: &str, token_set: &TokenSet) -> Result<(), AuthError> {
        fs::create_dir_all(&self.root)
            .map_err(|e| AuthError::Storage(format!("create {}: {}", self.root.display(), e)))?;

        let json = serde_json::to_string_pretty(token_set)
            .map_err(|e| AuthError::Storage(e.to_string()))?;

        let path = self.token_path(service);
        fs::write(&path, json).map_err(|e| AuthError::Storage(e.to_string()))?;

        tracing::info!("Stored token for service: {} at {:?}", service, path);
        Ok(())
    }

    /// Load the stored token set, `None` if nothing was stored.
    pub fn load(&self, service: &str) -> Result<Option<TokenSet>, AuthError> {
        let path = self.token_path(service);
        if !path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&path).map_err(|e| AuthError::Storage(e.to_string()))?;
        let token_set = serde_json::from_str(&json)
            .map_err(|e| AuthError::Storage(format!("corrupt token file: {}", e)))?;

        tracing::debug!("Loaded token for service: {}", service);
        Ok(Some(token_set))
    }

    pub fn delete(&self, service: &str) -> Result<(), AuthError> {
        let path = self.token_path(service);

        if path.exists() {
            fs::remove_file(&path).map_err(|e| AuthError::Storage(e.to_string()))?;
            tracing::info!("Deleted token for service: {}", service);
        }

        Ok(())
    }

    pub fn has_token(&self, service: &str) -> bool {
        matches!(self.load(service), Ok(Some(_)))
    }
}
