//! Authentication error types

/// Errors that can occur while loading credentials or exchanging them for a token.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Neither the environment variable nor the token file holds credentials.
    #[error("Google credentials not found in {env_var} or {path}")]
    CredentialsNotFound {
        /// Environment variable that was checked.
        env_var: String,
        /// Token file path that was checked.
        path: String,
    },

    /// The token endpoint rejected the client or refresh token.
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// The credentials document is of a kind this crate cannot use.
    #[error("Unsupported credentials type: {0}")]
    UnsupportedCredentials(String),

    /// The refresh token has expired or been revoked.
    #[error("Token expired and refresh failed: {message}")]
    TokenExpired { message: String },

    /// Network error during authentication.
    #[error("Network error during auth: {0}")]
    Network(#[from] reqwest::Error),

    /// Failed to parse a credentials document or token response.
    #[error("Auth parse error: {0}")]
    Parse(String),

    /// Failed to read the local token file.
    #[error("Failed to read credentials file: {0}")]
    Io(#[from] std::io::Error),
}
