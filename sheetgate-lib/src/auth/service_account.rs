//! OAuth2 JWT-bearer grant for service accounts

use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::Algorithm;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use serde::Serialize;

use super::AccessToken;
use super::TokenProvider;
use super::common::TOKEN_URL;
use super::common::handle_token_response;
use crate::error::AuthError;

/// Scopes requested for reading spreadsheets and looking them up by name.
pub const SHEETS_SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/spreadsheets.readonly",
    "https://www.googleapis.com/auth/drive.readonly",
];

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Lifetime of a signed assertion. Google caps it at one hour.
const ASSERTION_LIFETIME_SECS: i64 = 3600;

#[derive(Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: String,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

/// Signs an RS256 assertion with a service-account key and exchanges it for
/// an access token on every call.
///
/// # Example
///
/// ```ignore
/// use sheetgate_lib::auth::ServiceAccountTokenProvider;
///
/// let provider = ServiceAccountTokenProvider::new(
///     "reader@project.iam.gserviceaccount.com",
///     private_key_pem,
/// )?
/// .key_id("0123abcd");
/// let token = provider.get_token().await?;
/// ```
#[derive(Clone)]
pub struct ServiceAccountTokenProvider {
    client_email: String,
    key: EncodingKey,
    key_id: Option<String>,
    scopes: Vec<String>,
    token_url: String,
    http_client: reqwest::Client,
}

impl ServiceAccountTokenProvider {
    /// Creates a provider from the account email and its PEM private key.
    ///
    /// Fails if the key is not a valid RSA private key.
    pub fn new(
        client_email: impl Into<String>,
        private_key_pem: &str,
    ) -> Result<Self, AuthError> {
        let key = EncodingKey::from_rsa_pem(private_key_pem.as_bytes())
            .map_err(|e| AuthError::InvalidCredentials(format!("invalid private key: {}", e)))?;

        Ok(Self {
            client_email: client_email.into(),
            key,
            key_id: None,
            scopes: SHEETS_SCOPES.iter().map(|s| s.to_string()).collect(),
            token_url: TOKEN_URL.to_string(),
            http_client: reqwest::Client::new(),
        })
    }

    /// Sets the `kid` header, the `private_key_id` of the key file.
    pub fn key_id(mut self, key_id: impl Into<String>) -> Self {
        self.key_id = Some(key_id.into());
        self
    }

    /// Replaces the requested scopes.
    pub fn scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    /// Overrides the token endpoint, which is also the assertion audience.
    pub fn token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self
    }

    /// Uses a custom HTTP client.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = client;
        self
    }

    fn assertion(&self) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            iss: &self.client_email,
            scope: self.scopes.join(" "),
            aud: &self.token_url,
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        };

        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.key_id.clone();

        jsonwebtoken::encode(&header, &claims, &self.key)
            .map_err(|e| AuthError::InvalidCredentials(format!("failed to sign assertion: {}", e)))
    }
}

#[async_trait]
impl TokenProvider for ServiceAccountTokenProvider {
    async fn get_token(&self) -> Result<AccessToken, AuthError> {
        let assertion = self.assertion()?;
        let params = [
            ("grant_type", JWT_BEARER_GRANT),
            ("assertion", assertion.as_str()),
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

impl std::fmt::Debug for ServiceAccountTokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountTokenProvider")
            .field("client_email", &self.client_email)
            .field("key_id", &self.key_id)
            .field("scopes", &self.scopes)
            .field("token_url", &self.token_url)
            .finish_non_exhaustive()
    }
}
