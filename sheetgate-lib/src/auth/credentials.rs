//! Loading Google credentials from the environment or a token file

use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

use super::RefreshTokenProvider;
use super::ServiceAccountTokenProvider;
use super::StaticTokenProvider;
use super::TokenProvider;
use super::common::TOKEN_URL;
use crate::error::AuthError;

/// Environment variable holding the credentials JSON.
pub const DEFAULT_CREDENTIALS_ENV: &str = "GOOGLE_CREDENTIALS";

/// Token file read when the environment variable is not set.
pub const DEFAULT_TOKEN_FILE: &str = "tokens/token.json";

/// Credentials usable for reading spreadsheets.
///
/// Accepted documents:
/// - `service_account` key files as downloaded from the Cloud console;
/// - `authorized_user` JSON (`client_id`, `client_secret`, `refresh_token`),
///   with or without the `type` field, optionally with `token_uri`;
/// - a bare access token (`{"access_token": "..."}` or `{"token": "..."}`).
///
/// Any other `type` is rejected.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Service-account key, signed into a JWT-bearer assertion.
    ServiceAccount {
        client_email: String,
        private_key: String,
        private_key_id: Option<String>,
        token_uri: String,
    },
    /// OAuth client plus refresh token.
    AuthorizedUser {
        client_id: String,
        client_secret: String,
        refresh_token: String,
        token_uri: String,
    },
    /// A ready-made access token.
    AccessToken(String),
}

#[derive(Deserialize)]
struct CredentialsDocument {
    #[serde(rename = "type")]
    kind: Option<String>,
    client_id: Option<String>,
    client_secret: Option<String>,
    refresh_token: Option<String>,
    token_uri: Option<String>,
    client_email: Option<String>,
    private_key: Option<String>,
    private_key_id: Option<String>,
    #[serde(alias = "token")]
    access_token: Option<String>,
}

impl Credentials {
    /// Parses a credentials JSON document.
    pub fn from_json(json: &str) -> Result<Self, AuthError> {
        let doc: CredentialsDocument =
            serde_json::from_str(json).map_err(|e| AuthError::Parse(e.to_string()))?;

        match doc.kind.as_deref() {
            None | Some("authorized_user") => {}
            Some("service_account") => {
                return match (doc.client_email, doc.private_key) {
                    (Some(client_email), Some(private_key)) => Ok(Self::ServiceAccount {
                        client_email,
                        private_key,
                        private_key_id: doc.private_key_id,
                        token_uri: doc.token_uri.unwrap_or_else(|| TOKEN_URL.to_string()),
                    }),
                    _ => Err(AuthError::Parse(
                        "service account key needs client_email and private_key".to_string(),
                    )),
                };
            }
            Some(kind) => return Err(AuthError::UnsupportedCredentials(kind.to_string())),
        }

        match (doc.client_id, doc.client_secret, doc.refresh_token) {
            (Some(client_id), Some(client_secret), Some(refresh_token)) => {
                Ok(Self::AuthorizedUser {
                    client_id,
                    client_secret,
                    refresh_token,
                    token_uri: doc.token_uri.unwrap_or_else(|| TOKEN_URL.to_string()),
                })
            }
            _ => match doc.access_token {
                Some(token) if doc.kind.is_none() => Ok(Self::AccessToken(token)),
                _ => Err(AuthError::Parse(
                    "expected client_id, client_secret and refresh_token, or access_token"
                        .to_string(),
                )),
            },
        }
    }

    /// Loads credentials, preferring `env_value` over the file at `path`.
    ///
    /// `env_value` is the raw value of the environment variable `env_var`;
    /// an empty value counts as unset.
    pub fn load(env_var: &str, env_value: Option<&str>, path: &Path) -> Result<Self, AuthError> {
        if let Some(json) = env_value.filter(|v| !v.trim().is_empty()) {
            return match Self::from_json(json) {
                Ok(credentials) => {
                    log::info!("Using Google credentials from environment variable");
                    Ok(credentials)
                }
                Err(e) => {
                    log::error!("Failed to parse {} environment variable: {}", env_var, e);
                    Err(e)
                }
            };
        }

        if path.exists() {
            let credentials = std::fs::read_to_string(path)
                .map_err(AuthError::from)
                .and_then(|json| Self::from_json(&json));
            return match credentials {
                Ok(credentials) => {
                    log::info!("Using Google credentials from local token file");
                    Ok(credentials)
                }
                Err(e) => {
                    log::error!("Failed to read local token file {}: {}", path.display(), e);
                    Err(e)
                }
            };
        }

        Err(AuthError::CredentialsNotFound {
            env_var: env_var.to_string(),
            path: path.display().to_string(),
        })
    }

    /// Builds the token provider for these credentials.
    ///
    /// Fails if a service-account private key cannot be read.
    pub fn token_provider(
        &self,
        http_client: reqwest::Client,
    ) -> Result<Arc<dyn TokenProvider>, AuthError> {
        let provider: Arc<dyn TokenProvider> = match self {
            Self::ServiceAccount {
                client_email,
                private_key,
                private_key_id,
                token_uri,
            } => {
                let mut provider = ServiceAccountTokenProvider::new(client_email, private_key)?
                    .token_url(token_uri)
                    .http_client(http_client);
                if let Some(key_id) = private_key_id {
                    provider = provider.key_id(key_id);
                }
                Arc::new(provider)
            }
            Self::AuthorizedUser {
                client_id,
                client_secret,
                refresh_token,
                token_uri,
            } => Arc::new(
                RefreshTokenProvider::new(client_id, client_secret, refresh_token)
                    .token_url(token_uri)
                    .http_client(http_client),
            ),
            Self::AccessToken(token) => Arc::new(StaticTokenProvider::new(token)),
        };
        Ok(provider)
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ServiceAccount {
                client_email,
                private_key_id,
                token_uri,
                ..
            } => f
                .debug_struct("ServiceAccount")
                .field("client_email", client_email)
                .field("private_key_id", private_key_id)
                .field("token_uri", token_uri)
                .finish_non_exhaustive(),
            Self::AuthorizedUser {
                client_id,
                token_uri,
                ..
            } => f
                .debug_struct("AuthorizedUser")
                .field("client_id", client_id)
                .field("token_uri", token_uri)
                .finish_non_exhaustive(),
            Self::AccessToken(_) => f.write_str("AccessToken(..)"),
        }
    }
}
