//! OAuth2 refresh-token grant

use async_trait::async_trait;

use super::AccessToken;
use super::TokenProvider;
use super::common::TOKEN_URL;
use super::common::handle_token_response;
use crate::error::AuthError;

/// Exchanges a long-lived refresh token for an access token on every call.
///
/// This is how `authorized_user` credentials (as written by `gcloud auth
/// application-default login` or an installed-app OAuth flow) are used.
///
/// # Example
///
/// ```ignore
/// use sheetgate_lib::auth::RefreshTokenProvider;
///
/// let provider = RefreshTokenProvider::new(client_id, client_secret, refresh_token);
/// let token = provider.get_token().await?;
/// ```
#[derive(Clone)]
pub struct RefreshTokenProvider {
    client_id: String,
    client_secret: String,
    refresh_token: String,
    token_url: String,
    http_client: reqwest::Client,
}

impl RefreshTokenProvider {
    /// Creates a provider against the default Google token endpoint.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            refresh_token: refresh_token.into(),
            token_url: TOKEN_URL.to_string(),
            http_client: reqwest::Client::new(),
        }
    }

    /// Overrides the token endpoint.
    pub fn token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self
    }

    /// Uses a custom HTTP client.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = client;
        self
    }
}

#[async_trait]
impl TokenProvider for RefreshTokenProvider {
    async fn get_token(&self) -> Result<AccessToken, AuthError> {
        let params = [
            ("grant_type", "refresh_token"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("refresh_token", self.refresh_token.as_str()),
        ];

        let response = self
            .http_client
            .post(&self.token_url)
            .form(&params)
            .send()
            .await?;

        handle_token_response(response).await
    }
}

impl std::fmt::Debug for RefreshTokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshTokenProvider")
            .field("client_id", &self.client_id)
            .field("token_url", &self.token_url)
            .finish_non_exhaustive()
    }
}
