//! API error types

use std::time::Duration;

/// Errors that can occur while talking to the Drive and Sheets APIs.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// HTTP error response from the API.
    #[error("HTTP {status}: {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Error message.
        message: String,
    },

    /// Network error during API call.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Request timed out.
    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse API response.
    #[error("Response parse error: {message}")]
    Parse {
        /// Description of the parse error.
        message: String,
        /// Raw response body, if available.
        body: Option<String>,
    },

    /// No spreadsheet with the requested name is visible to the credentials.
    #[error("Spreadsheet not found: {name}")]
    SpreadsheetNotFound {
        /// The spreadsheet name that was looked up.
        name: String,
    },
}

impl ApiError {
    /// Creates a new HTTP error.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// Creates a new parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            body: None,
        }
    }

    /// Creates a new parse error with the raw response body.
    pub fn parse_with_body(message: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            body: Some(body.into()),
        }
    }

    /// Returns `true` if the error came from a missing spreadsheet or worksheet.
    ///
    /// The Sheets API answers an unknown worksheet with `400 Unable to parse range`.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::SpreadsheetNotFound { .. } => true,
            Self::Http { status, message } => {
                *status == 404 || (*status == 400 && message.contains("Unable to parse range"))
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_detection() {
        assert!(ApiError::SpreadsheetNotFound { name: "Budget".into() }.is_not_found());
        assert!(ApiError::http(400, "Unable to parse range: 'missing'").is_not_found());
        assert!(ApiError::http(404, "Requested entity was not found.").is_not_found());
        assert!(!ApiError::http(400, "Invalid value").is_not_found());
        assert!(!ApiError::http(500, "boom").is_not_found());
    }

    #[test]
    fn test_display() {
        let err = ApiError::http(429, "Quota exceeded");
        assert_eq!(err.to_string(), "HTTP 429: Quota exceeded");
    }
}
