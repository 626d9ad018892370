//! Google OAuth2 provider: sign-in, token refresh and the basic profile.

use async_trait::async_trait;
use gdesk_core::ReqwestErrorExt;
use serde::{Deserialize, Serialize};

use crate::error::AuthError;
use crate::oauth::{OAuth2Config, OAuth2Provider};
use crate::storage::{TokenSet, TokenStore};

pub const GOOGLE_SERVICE_ID: &str = "google";

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";

// Requested alongside the configured scopes so the basic profile is readable.
const PROFILE_SCOPES: &[&str] = &["email", "profile"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleTokenResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: u64,
    #[serde(default)]
    pub token_type: String,
    #[serde(default)]
    pub scope: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

/// Basic profile of the signed-in user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicProfile {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
}

pub struct GoogleOAuth2Provider {
    config: OAuth2Config,
    userinfo_url: String,
    http: reqwest::Client,
}

impl GoogleOAuth2Provider {
    pub fn new(
        client_id: String,
        client_secret: Option<String>,
        scopes: Vec<String>,
        redirect_port: u16,
    ) -> Self {
        let mut scopes = scopes;
        for extra in PROFILE_SCOPES {
            if !scopes.iter().any(|s| s == extra) {
                scopes.push(extra.to_string());
            }
        }

        Self {
            config: OAuth2Config {
                client_id,
                client_secret,
                auth_url: GOOGLE_AUTH_URL.to_string(),
                token_url: GOOGLE_TOKEN_URL.to_string(),
                redirect_port,
                scopes,
                extra_params: vec![
                    ("access_type".to_string(), "offline".to_string()),
                    ("prompt".to_string(), "consent".to_string()),
                ],
            },
            userinfo_url: GOOGLE_USERINFO_URL.to_string(),
            http: reqwest::Client::new(),
        }
    }

    /// Point the token and userinfo endpoints somewhere else (mock servers, proxies).
    pub fn with_endpoints(mut self, token_url: &str, userinfo_url: &str) -> Self {
        self.config.token_url = token_url.to_string();
        self.userinfo_url = userinfo_url.to_string();
        self
    }

    /// Refresh an expired access token.
    #[tracing::instrument(skip(self, refresh_token), level = "info")]
    pub async fn refresh_token(
        &self,
        refresh_token: &str,
    ) -> Result<GoogleTokenResponse, AuthError> {
        let mut form = vec![
            ("client_id", self.config.client_id.as_str()),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
        ];
        if let Some(secret) = &self.config.client_secret {
            form.push(("client_secret", secret.as_str()));
        }

        let response = self
            .http
            .post(&self.config.token_url)
            .form(&form)
            .send()
            .await
            .map_err(|e| AuthError::Network(e.into_network_error()))?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<GoogleTokenResponse>()
                .await
                .map_err(|e| AuthError::Network(e.into_network_error()));
        }

        let body = response.text().await.unwrap_or_default();
        match serde_json::from_str::<GoogleErrorResponse>(&body) {
            Ok(err) if err.error == "invalid_grant" => Err(AuthError::InvalidGrant(
                err.error_description.unwrap_or(err.error),
            )),
            _ => Err(AuthError::OAuthFailed(format!("Token refresh failed: {}: {}", status, body))),
        }
    }

    /// Fetch the basic profile for an access token.
    #[tracing::instrument(skip(self, access_token), level = "info")]
    pub async fn basic_profile(&self, access_token: &str) -> Result<BasicProfile, AuthError> {
        let response = self
            .http
            .get(&self.userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AuthError::Network(e.into_network_error()))?;

        match response.status().as_u16() {
            200..=299 => response
                .json::<BasicProfile>()
                .await
                .map_err(|e| AuthError::Network(e.into_network_error())),
            401 => Err(AuthError::TokenExpired),
            status => {
                let text = response.text().await.unwrap_or_default();
                Err(AuthError::OAuthFailed(format!(
                    "User info request failed: {}: {}",
                    status, text
                )))
            }
        }
    }

    /// Non-interactive check for an existing session.
    ///
    /// Returns a usable token when one is stored and either still fresh or
    /// refreshable. A revoked refresh token clears the stored set and yields
    /// `None`. Other refresh failures keep a not-yet-expired token and are
    /// returned as errors once it has expired.
    #[tracing::instrument(skip(self, store), level = "info")]
    pub async fn silent_sign_in(&self, store: &TokenStore) -> Result<Option<TokenSet>, AuthError> {
        let Some(token_set) = store.load(GOOGLE_SERVICE_ID)? else {
            tracing::info!("No stored Google token");
            return Ok(None);
        };

        if !token_set.needs_refresh() {
            return Ok(Some(token_set));
        }

        let Some(refresh_token) = token_set.refresh_token.clone() else {
            if token_set.is_expired() {
                tracing::info!("Stored Google token expired and cannot be refreshed");
                return Ok(None);
            }
            return Ok(Some(token_set));
        };

        let refreshed = match self.refresh_token(&refresh_token).await {
            Ok(refreshed) => refreshed,
            Err(AuthError::InvalidGrant(reason)) => {
                tracing::warn!("Refresh token rejected ({}), clearing stored session", reason);
                store.delete(GOOGLE_SERVICE_ID)?;
                return Ok(None);
            }
            Err(e) if !token_set.is_expired() => {
                tracing::warn!(
                    "Token refresh failed ({}), using the current token until it expires",
                    e
                );
                return Ok(Some(token_set));
            }
            Err(e) => return Err(e),
        };

        let new_token_set = TokenSet {
            access_token: refreshed.access_token,
            refresh_token: refreshed.refresh_token.or(Some(refresh_token)),
            expires_at: chrono::Utc::now().timestamp() + refreshed.expires_in as i64,
            scopes: refreshed
                .scope
                .map(|s| s.split(' ').map(|s| s.to_string()).collect())
                .unwrap_or(token_set.scopes),
        };
        store.store(GOOGLE_SERVICE_ID, &new_token_set)?;

        tracing::info!("Refreshed stored Google token");
        Ok(Some(new_token_set))
    }
}

#[async_trait]
impl OAuth2Provider for GoogleOAuth2Provider {
    fn service_id(&self) -> &str {
        GOOGLE_SERVICE_ID
    }

    fn config(&self) -> &OAuth2Config {
        &self.config
    }
}
