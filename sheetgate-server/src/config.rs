//! Process configuration from the environment

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use log::LevelFilter;
use sheetgate_lib::auth::DEFAULT_CREDENTIALS_ENV;
use sheetgate_lib::auth::DEFAULT_TOKEN_FILE;
use sheetgate_lib::source::SheetRef;

use crate::error::ConfigError;

/// Environment variable holding the API key clients must present.
pub const API_KEY_ENV: &str = "API_KEY";

/// Server settings.
///
/// Read once at startup. The API key is deliberately not part of it: it is
/// looked up on every request, so a missing key is a per-request 500 rather
/// than a startup failure.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: LevelFilter,
    pub log_file: PathBuf,
    pub credentials_env: String,
    pub token_file: PathBuf,
    /// Fixed sheet behind the transactions endpoint.
    pub budget_sheet: SheetRef,
    /// Timeout for each Google API call.
    pub request_timeout: Option<Duration>,
}

impl Config {
    /// Reads the configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the configuration through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        let request_timeout = match lookup("REQUEST_TIMEOUT_SECS") {
            Some(raw) => Some(Duration::from_secs(parse("REQUEST_TIMEOUT_SECS", raw)?)),
            None => None,
        };

        Ok(Self {
            host: get("HOST", "0.0.0.0"),
            port: parse("PORT", get("PORT", "8000"))?,
            log_level: parse("LOG_LEVEL", get("LOG_LEVEL", "info"))?,
            log_file: PathBuf::from(get("LOG_FILE", "sheetgate.log")),
            credentials_env: DEFAULT_CREDENTIALS_ENV.to_string(),
            token_file: PathBuf::from(get("GOOGLE_TOKEN_FILE", DEFAULT_TOKEN_FILE)),
            budget_sheet: SheetRef::new(
                get("BUDGET_SPREADSHEET", "Budget tracker"),
                get("BUDGET_WORKSHEET", "transactions"),
            ),
            request_timeout,
        })
    }

    /// `host:port` to bind.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse<T>(name: &'static str, value: String) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidValue {
            name,
            reason: e.to_string(),
            value,
        })
}
