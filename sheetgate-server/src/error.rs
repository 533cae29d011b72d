//! Server error types

use hyper::StatusCode;
use serde_json::Value;
use serde_json::json;

/// Errors raised while reading the process configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A variable holds a value of the wrong shape.
    #[error("Invalid value for {name}: {value:?} ({reason})")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: String,
    },

    /// The log file could not be opened.
    #[error("Failed to open log file: {0}")]
    LogFile(#[from] std::io::Error),

    /// A global logger was already installed.
    #[error("Failed to initialize logger: {0}")]
    Logger(#[from] log::SetLoggerError),
}

/// One failed query parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryError {
    /// Parameter name.
    pub name: String,
    /// Machine-readable error kind.
    pub kind: &'static str,
    /// Human-readable message.
    pub message: String,
}

impl QueryError {
    /// Creates a new query error.
    pub fn new(name: impl Into<String>, kind: &'static str, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            message: message.into(),
        }
    }

    fn to_json(&self) -> Value {
        json!({
            "type": self.kind,
            "loc": ["query", self.name],
            "msg": self.message,
        })
    }
}

impl std::fmt::Display for QueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.name, self.message)
    }
}

/// Errors that end a request with a non-200 status.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    /// The server has no API key to compare against.
    #[error("API key not configured on server")]
    ApiKeyNotConfigured,

    /// No bearer credentials were sent.
    #[error("Not authenticated")]
    NotAuthenticated,

    /// The bearer credentials do not match.
    #[error("Invalid API key")]
    InvalidApiKey,

    /// One or more query parameters failed validation.
    #[error("Invalid query parameters")]
    Query(Vec<QueryError>),

    /// The data source could not be set up.
    #[error("{0}")]
    Upstream(String),

    /// Unknown path.
    #[error("Not Found")]
    NotFound,

    /// Known path, wrong method.
    #[error("Method Not Allowed")]
    MethodNotAllowed,
}

impl RequestError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::ApiKeyNotConfigured | Self::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotAuthenticated => StatusCode::FORBIDDEN,
            Self::InvalidApiKey => StatusCode::UNAUTHORIZED,
            Self::Query(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }

    /// JSON body: `{"detail": ...}`.
    pub fn body(&self) -> Value {
        match self {
            Self::Query(errors) => json!({
                "detail": errors.iter().map(QueryError::to_json).collect::<Vec<_>>(),
            }),
            other => json!({ "detail": other.to_string() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(RequestError::ApiKeyNotConfigured.status(), 500);
        assert_eq!(RequestError::NotAuthenticated.status(), 403);
        assert_eq!(RequestError::InvalidApiKey.status(), 401);
        assert_eq!(RequestError::Query(vec![]).status(), 422);
        assert_eq!(RequestError::Upstream("x".into()).status(), 500);
    }

    #[test]
    fn test_query_error_body() {
        let err = RequestError::Query(vec![QueryError::new("page", "int_parsing", "bad")]);
        assert_eq!(
            err.body(),
            json!({"detail": [{"type": "int_parsing", "loc": ["query", "page"], "msg": "bad"}]})
        );
    }

    #[test]
    fn test_plain_body() {
        assert_eq!(
            RequestError::InvalidApiKey.body(),
            json!({"detail": "Invalid API key"})
        );
    }
}
