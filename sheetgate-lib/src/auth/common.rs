//! Shared OAuth utilities

use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;

use super::AccessToken;
use crate::error::AuthError;

/// Google OAuth2 token endpoint.
pub(crate) const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

// =============================================================================
// Token Response Parsing
// =============================================================================

/// Token response from the Google token endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    #[serde(default, deserialize_with = "deserialize_expires_in")]
    pub expires_in: Option<u64>,
}

/// Deserializes `expires_in` which can be either a number or a string.
fn deserialize_expires_in<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        Number(u64),
    }

    match Option::<StringOrNumber>::deserialize(deserializer)? {
        None => Ok(None),
        Some(StringOrNumber::Number(n)) => Ok(Some(n)),
        Some(StringOrNumber::String(s)) => s
            .parse::<u64>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("invalid expires_in value: {}", s))),
    }
}

impl TokenResponse {
    pub fn into_access_token(self) -> AccessToken {
        match self.expires_in {
            Some(secs) => AccessToken::with_expiry(
                self.access_token,
                Utc::now() + Duration::seconds(secs as i64),
            ),
            None => AccessToken::new(self.access_token),
        }
    }
}

/// Error response from the Google token endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    pub error: String,
    pub error_description: Option<String>,
}

/// Maps OAuth error codes to AuthError variants.
pub(crate) fn map_error_response(error: ErrorResponse) -> AuthError {
    let description = error
        .error_description
        .unwrap_or_else(|| error.error.clone());

    match error.error.as_str() {
        "invalid_grant" => {
            if description.contains("expired") || description.contains("revoked") {
                AuthError::TokenExpired {
                    message: description,
                }
            } else {
                AuthError::InvalidCredentials(description)
            }
        }
        "invalid_client" | "unauthorized_client" => AuthError::InvalidCredentials(description),
        _ => AuthError::Parse(description),
    }
}

/// Turns a token endpoint response into a token or a mapped error.
pub(crate) async fn handle_token_response(
    response: reqwest::Response,
) -> Result<AccessToken, AuthError> {
    if response.status().is_success() {
        let token_response: TokenResponse = response.json().await?;
        Ok(token_response.into_access_token())
    } else {
        let error_response: ErrorResponse =
            response.json().await.unwrap_or_else(|_| ErrorResponse {
                error: "unknown".to_string(),
                error_description: None,
            });
        Err(map_error_response(error_response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expires_in_as_number_or_string() {
        let r: TokenResponse =
            serde_json::from_str(r#"{"access_token": "a", "expires_in": 3599}"#).unwrap();
        assert_eq!(r.expires_in, Some(3599));

        let r: TokenResponse =
            serde_json::from_str(r#"{"access_token": "a", "expires_in": "3599"}"#).unwrap();
        assert_eq!(r.expires_in, Some(3599));

        let r: TokenResponse = serde_json::from_str(r#"{"access_token": "a"}"#).unwrap();
        assert_eq!(r.expires_in, None);
        assert!(r.into_access_token().expires_at.is_none());
    }

    #[test]
    fn test_map_error_response() {
        let err = map_error_response(ErrorResponse {
            error: "invalid_grant".into(),
            error_description: Some("Token has been expired or revoked.".into()),
        });
        assert!(matches!(err, AuthError::TokenExpired { .. }));

        let err = map_error_response(ErrorResponse {
            error: "invalid_client".into(),
            error_description: None,
        });
        assert!(matches!(err, AuthError::InvalidCredentials(ref m) if m == "invalid_client"));

        let err = map_error_response(ErrorResponse {
            error: "server_error".into(),
            error_description: Some("try later".into()),
        });
        assert!(matches!(err, AuthError::Parse(_)));
    }
}
