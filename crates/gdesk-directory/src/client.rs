//! Admin SDK Directory API client.

use gdesk_core::ReqwestErrorExt;
use tracing::instrument;

use crate::error::DirectoryError;
use crate::types::{DirectoryUser, UserListResponse};

const DIRECTORY_API_BASE: &str = "https://admin.googleapis.com/admin/directory/v1";

/// Alias for the signed-in administrator's own account.
pub const MY_CUSTOMER: &str = "my_customer";

/// Page size for the user list.
pub const USERS_LIMIT: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserOrder {
    Email,
}

impl UserOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            UserOrder::Email => "email",
        }
    }
}

/// Parameters for `users.list`.
#[derive(Debug, Clone, PartialEq)]
pub struct UserQuery {
    pub customer: String,
    pub max_results: u32,
    pub order_by: UserOrder,
}

impl UserQuery {
    /// First users of the caller's own organization, by email.
    pub fn my_customer() -> Self {
        Self {
            customer: MY_CUSTOMER.to_string(),
            max_results: USERS_LIMIT,
            order_by: UserOrder::Email,
        }
    }

    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("customer", self.customer.clone()),
            ("maxResults", self.max_results.to_string()),
            ("orderBy", self.order_by.as_str().to_string()),
        ]
    }
}

pub struct DirectoryClient {
    client: reqwest::Client,
    access_token: String,
    api_key: Option<String>,
    base_url: String,
}

impl DirectoryClient {
    pub fn new(access_token: &str) -> Self {
        Self::new_with_base_url(access_token, DIRECTORY_API_BASE)
    }

    pub fn new_with_base_url(access_token: &str, base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            access_token: access_token.to_string(),
            api_key: None,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|k| !k.is_empty());
        self
    }

    /// List directory users (first page).
    #[instrument(skip(self), level = "info")]
    pub async fn list_users(
        &self,
        query: &UserQuery,
    ) -> Result<Vec<DirectoryUser>, DirectoryError> {
        let url = format!("{}/users", self.base_url);

        let mut request = self
            .client
            .get(&url)
            .bearer_auth(&self.access_token)
            .query(&query.to_params());
        if let Some(key) = &self.api_key {
            request = request.query(&[("key", key)]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| DirectoryError::Network(e.into_network_error()))?;

        let status = response.status();
        match status.as_u16() {
            200..=299 => {
                let resp: UserListResponse = response
                    .json()
                    .await
                    .map_err(|e| DirectoryError::ApiError(format!("JSON parse error: {}", e)))?;
                tracing::debug!(count = resp.users.len(), "users listed");
                Ok(resp.users)
            }
            401 => Err(DirectoryError::TokenExpired),
            403 => Err(DirectoryError::Forbidden),
            404 => Err(DirectoryError::CustomerNotFound(query.customer.clone())),
            429 => {
                let retry_after = response
                    .headers()
                    .get("Retry-After")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(60);
                Err(DirectoryError::RateLimited(retry_after))
            }
            _ => {
                let text = response.text().await.unwrap_or_default();
                Err(DirectoryError::ApiError(format!("{}: {}", status, text)))
            }
        }
    }
}
