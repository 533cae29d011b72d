//! TokenProvider trait and AccessToken

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use crate::error::AuthError;

/// An OAuth2 access token with optional expiration.
#[derive(Debug, Clone)]
pub struct AccessToken {
    /// The bearer token used for API authentication.
    pub access_token: String,
    /// When the token expires, if known.
    pub expires_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    /// Creates a new access token with just the token string.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            expires_at: None,
        }
    }

    /// Creates a new access token with expiration time.
    pub fn with_expiry(access_token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            access_token: access_token.into(),
            expires_at: Some(expires_at),
        }
    }

    /// Returns `true` if the token has expired.
    ///
    /// Returns `false` if expiration time is unknown.
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|exp| Utc::now() >= exp)
    }

    /// Returns the token as a bearer authorization header value.
    pub fn as_bearer(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}

/// Trait for providing access tokens to the Sheets client.
///
/// The client calls `get_token` once per fetch. Nothing is cached between
/// requests, so implementations that talk to a token endpoint do so every
/// time.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use sheetgate_lib::auth::{AccessToken, TokenProvider};
/// use sheetgate_lib::error::AuthError;
///
/// struct EnvTokenProvider;
///
/// #[async_trait]
/// impl TokenProvider for EnvTokenProvider {
///     async fn get_token(&self) -> Result<AccessToken, AuthError> {
///         let token = std::env::var("GOOGLE_ACCESS_TOKEN")
///             .map_err(|e| AuthError::InvalidCredentials(e.to_string()))?;
///         Ok(AccessToken::new(token))
///     }
/// }
/// ```
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Gets an access token valid for the Drive and Sheets read-only scopes.
    async fn get_token(&self) -> Result<AccessToken, AuthError>;
}

/// A simple token provider that always returns the same static token.
///
/// # Example
///
/// ```
/// use sheetgate_lib::auth::StaticTokenProvider;
///
/// let provider = StaticTokenProvider::new("ya29.my-access-token");
/// ```
#[derive(Debug, Clone)]
pub struct StaticTokenProvider {
    token: AccessToken,
}

impl StaticTokenProvider {
    /// Creates a new static token provider with the given access token.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            token: AccessToken::new(access_token),
        }
    }

    /// Creates a new static token provider from an existing AccessToken.
    pub fn from_token(token: AccessToken) -> Self {
        Self { token }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn get_token(&self) -> Result<AccessToken, AuthError> {
        Ok(self.token.clone())
    }
}
