use async_trait::async_trait;
use oauth2::basic::BasicClient;
use oauth2::reqwest::async_http_client;
use oauth2::{
    AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, PkceCodeChallenge,
    PkceCodeVerifier, RedirectUrl, Scope, TokenResponse, TokenUrl,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{oneshot, Mutex};
use warp::Filter;

use crate::error::AuthError;
use crate::storage::{TokenSet, TokenStore};

type CallbackSender = Arc<Mutex<Option<oneshot::Sender<(String, String)>>>>;

const CALLBACK_PAGE: &str = "<html><body><h1>Signed in</h1>\
    <p>You can close this window and return to gdesk.</p></body></html>";

/// OAuth2 configuration
#[derive(Debug, Clone)]
pub struct OAuth2Config {
    /// Client ID from OAuth provider
    pub client_id: String,

    /// Client secret, if the client type has one
    pub client_secret: Option<String>,

    /// Authorization endpoint URL
    pub auth_url: String,

    /// Token endpoint URL
    pub token_url: String,

    /// Loopback port the redirect lands on
    pub redirect_port: u16,

    /// Scopes to request
    pub scopes: Vec<String>,

    /// Provider-specific query parameters on the authorization URL
    pub extra_params: Vec<(String, String)>,
}

impl OAuth2Config {
    pub fn redirect_uri(&self) -> String {
        format!("http://localhost:{}/callback", self.redirect_port)
    }
}

/// An authorization request waiting for its callback.
pub struct PendingAuthorization {
    pub url: String,
    pub csrf_token: CsrfToken,
    pub pkce_verifier: PkceCodeVerifier,
}

/// OAuth2 provider trait
#[async_trait]
pub trait OAuth2Provider: Send + Sync {
    /// Service identifier used as the token file name
    fn service_id(&self) -> &str;

    fn config(&self) -> &OAuth2Config;

    fn client(&self) -> Result<BasicClient, AuthError> {
        let config = self.config();
        let invalid = |what: &str, e: oauth2::url::ParseError| {
            AuthError::OAuthFailed(format!("Invalid {}: {}", what, e))
        };

        Ok(BasicClient::new(
            ClientId::new(config.client_id.clone()),
            config.client_secret.clone().map(ClientSecret::new),
            AuthUrl::new(config.auth_url.clone()).map_err(|e| invalid("auth URL", e))?,
            Some(TokenUrl::new(config.token_url.clone()).map_err(|e| invalid("token URL", e))?),
        )
        .set_redirect_uri(
            RedirectUrl::new(config.redirect_uri()).map_err(|e| invalid("redirect URI", e))?,
        ))
    }

    /// Build the authorization URL with a fresh CSRF state and PKCE challenge.
    fn authorize(&self) -> Result<PendingAuthorization, AuthError> {
        let config = self.config();
        let client = self.client()?;

        let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();

        let mut request = client.authorize_url(CsrfToken::new_random);
        for scope in &config.scopes {
            request = request.add_scope(Scope::new(scope.clone()));
        }
        for (name, value) in &config.extra_params {
            request = request.add_extra_param(name.as_str(), value.as_str());
        }

        let (url, csrf_token) = request.set_pkce_challenge(pkce_challenge).url();

        Ok(PendingAuthorization {
            url: url.to_string(),
            csrf_token,
            pkce_verifier,
        })
    }

    /// Complete the flow with the authorization code and persist the tokens.
    async fn exchange_code(
        &self,
        code: String,
        pkce_verifier: PkceCodeVerifier,
        store: &TokenStore,
    ) -> Result<TokenSet, AuthError> {
        let client = self.client()?;

        let token_result = client
            .exchange_code(AuthorizationCode::new(code))
            .set_pkce_verifier(pkce_verifier)
            .request_async(async_http_client)
            .await
            .map_err(|e| {
                AuthError::OAuthFailed(format!("Failed to exchange authorization code: {}", e))
            })?;

        let expires_in = token_result
            .expires_in()
            .map(|d| d.as_secs() as i64)
            .unwrap_or(3600);

        let scopes = token_result
            .scopes()
            .map(|s| s.iter().map(|scope| scope.to_string()).collect())
            .unwrap_or_else(|| self.config().scopes.clone());

        let token_set = TokenSet {
            access_token: token_result.access_token().secret().clone(),
            refresh_token: token_result.refresh_token().map(|t| t.secret().clone()),
            expires_at: chrono::Utc::now().timestamp() + expires_in,
            scopes,
        };

        store.store(self.service_id(), &token_set)?;

        tracing::info!("OAuth2 flow completed for {}", self.service_id());
        Ok(token_set)
    }

    /// Perform the full flow with the system browser and a loopback callback server.
    async fn authenticate(&self, store: &TokenStore) -> Result<TokenSet, AuthError> {
        let pending = self.authorize()?;
        let port = self.config().redirect_port;

        let (tx, rx) = oneshot::channel();
        let tx: CallbackSender = Arc::new(Mutex::new(Some(tx)));
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let routes = warp::get()
            .and(warp::path("callback"))
            .and(warp::query::<HashMap<String, String>>())
            .and(warp::any().map(move || tx.clone()))
            .and_then(|params: HashMap<String, String>, tx: CallbackSender| async move {
                let code = params.get("code").cloned().unwrap_or_default();
                let state = params.get("state").cloned().unwrap_or_default();

                if let Some(sender) = tx.lock().await.take() {
                    let _ = sender.send((code, state));
                }

                Ok::<_, warp::Rejection>(warp::reply::html(CALLBACK_PAGE))
            });

        let (_, server) = warp::serve(routes)
            .try_bind_with_graceful_shutdown(([127, 0, 0, 1], port), async {
                shutdown_rx.await.ok();
            })
            .map_err(|_| AuthError::PortInUse(port))?;
        tokio::spawn(server);

        tracing::info!("Opening browser for Google sign-in");
        tracing::debug!("Auth URL: {}", pending.url);
        if let Err(e) = webbrowser::open(&pending.url) {
            tracing::warn!("Failed to open browser ({}); visit {} manually", e, pending.url);
        }

        let received = rx.await;
        let _ = shutdown_tx.send(());
        let (code, state) =
            received.map_err(|_| AuthError::OAuthFailed("callback server closed".to_string()))?;

        if state != *pending.csrf_token.secret() {
            return Err(AuthError::CsrfMismatch);
        }
        if code.is_empty() {
            return Err(AuthError::OAuthFailed(
                "callback carried no authorization code".to_string(),
            ));
        }

        self.exchange_code(code, pending.pkce_verifier, store).await
    }
}
