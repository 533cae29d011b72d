//! Google Drive + Sheets backed source

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

use super::SheetRef;
use super::SheetSource;
use super::SourceConnector;
use crate::auth::AccessToken;
use crate::auth::Credentials;
use crate::auth::DEFAULT_CREDENTIALS_ENV;
use crate::auth::DEFAULT_TOKEN_FILE;
use crate::auth::TokenProvider;
use crate::error::ApiError;
use crate::error::Error;
use crate::table::RawGrid;

const DRIVE_BASE_URL: &str = "https://www.googleapis.com";
const SHEETS_BASE_URL: &str = "https://sheets.googleapis.com";
const SPREADSHEET_MIME_TYPE: &str = "application/vnd.google-apps.spreadsheet";

/// Client reading worksheet values through the Google Drive and Sheets APIs.
///
/// Spreadsheets are addressed by name, as a user sees them in Drive; the
/// first visible spreadsheet with that name wins. One [`fetch_grid`] asks the
/// token provider once and reuses the token for both API calls.
///
/// [`fetch_grid`]: SheetSource::fetch_grid
///
/// # Example
///
/// ```ignore
/// use sheetgate_lib::auth::StaticTokenProvider;
/// use sheetgate_lib::source::{GoogleSheetsClient, SheetRef, SheetSource};
///
/// let client = GoogleSheetsClient::builder()
///     .token_provider(StaticTokenProvider::new("ya29.token"))
///     .build();
///
/// let grid = client
///     .fetch_grid(&SheetRef::new("Budget tracker", "transactions"))
///     .await?;
/// ```
#[derive(Clone)]
pub struct GoogleSheetsClient {
    inner: Arc<GoogleSheetsClientInner>,
}

struct GoogleSheetsClientInner {
    drive_base_url: String,
    sheets_base_url: String,
    token_provider: Arc<dyn TokenProvider>,
    http_client: Client,
    timeout: Option<Duration>,
}

impl GoogleSheetsClient {
    /// Creates a new builder for constructing a client.
    pub fn builder() -> GoogleSheetsClientBuilder<Missing> {
        GoogleSheetsClientBuilder::new()
    }

    /// Gets a token from the configured provider.
    pub async fn access_token(&self) -> Result<AccessToken, Error> {
        Ok(self.inner.token_provider.get_token().await?)
    }

    /// Looks up the ID of the spreadsheet called `name`.
    pub async fn find_spreadsheet_id(
        &self,
        token: &AccessToken,
        name: &str,
    ) -> Result<String, Error> {
        #[derive(Deserialize)]
        struct FileList {
            #[serde(default)]
            files: Vec<DriveFile>,
        }

        #[derive(Deserialize)]
        struct DriveFile {
            id: String,
        }

        let mut url = parse_url(&format!(
            "{}/drive/v3/files",
            self.inner.drive_base_url.trim_end_matches('/')
        ))?;
        url.query_pairs_mut()
            .append_pair("q", &drive_name_query(name))
            .append_pair("fields", "files(id,name)")
            .append_pair("pageSize", "1")
            .append_pair("supportsAllDrives", "true")
            .append_pair("includeItemsFromAllDrives", "true");

        let list: FileList = self.get_json(token, url).await?;
        list.files
            .into_iter()
            .next()
            .map(|file| file.id)
            .ok_or_else(|| {
                ApiError::SpreadsheetNotFound {
                    name: name.to_string(),
                }
                .into()
            })
    }

    /// Reads every value of `worksheet` in the spreadsheet with ID `spreadsheet_id`.
    pub async fn worksheet_values(
        &self,
        token: &AccessToken,
        spreadsheet_id: &str,
        worksheet: &str,
    ) -> Result<RawGrid, Error> {
        #[derive(Deserialize)]
        struct ValueRange {
            #[serde(default)]
            values: Vec<Vec<serde_json::Value>>,
        }

        let mut url = parse_url(&format!(
            "{}/v4/spreadsheets/{}/values/{}",
            self.inner.sheets_base_url.trim_end_matches('/'),
            urlencoding::encode(spreadsheet_id),
            urlencoding::encode(&a1_sheet_range(worksheet)),
        ))?;
        url.query_pairs_mut()
            .append_pair("valueRenderOption", "FORMATTED_VALUE")
            .append_pair("majorDimension", "ROWS");

        let range: ValueRange = self.get_json(token, url).await?;
        Ok(range
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect())
            .collect())
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        token: &AccessToken,
        url: Url,
    ) -> Result<T, Error> {
        let mut request = self
            .inner
            .http_client
            .get(url)
            .bearer_auth(&token.access_token);

        if let Some(timeout) = self.inner.timeout {
            request = request.timeout(timeout);
        }

        let response = request
            .send()
            .await
            .map_err(|e| self.send_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.send_error(e))?;

        if !status.is_success() {
            return Err(ApiError::http(status.as_u16(), error_message(&body)).into());
        }

        serde_json::from_str(&body)
            .map_err(|e| ApiError::parse_with_body(e.to_string(), body).into())
    }

    fn send_error(&self, error: reqwest::Error) -> ApiError {
        match self.inner.timeout {
            Some(timeout) if error.is_timeout() => ApiError::Timeout(timeout),
            _ => ApiError::Network(error),
        }
    }
}

#[async_trait]
impl SheetSource for GoogleSheetsClient {
    async fn fetch_grid(&self, sheet: &SheetRef) -> Result<RawGrid, Error> {
        let token = self.access_token().await?;
        let id = self.find_spreadsheet_id(&token, &sheet.spreadsheet).await?;
        self.worksheet_values(&token, &id, &sheet.worksheet).await
    }
}

impl std::fmt::Debug for GoogleSheetsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleSheetsClient")
            .field("drive_base_url", &self.inner.drive_base_url)
            .field("sheets_base_url", &self.inner.sheets_base_url)
            .field("timeout", &self.inner.timeout)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn parse_url(raw: &str) -> Result<Url, ApiError> {
    Url::parse(raw).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", raw, e)))
}

/// Drive search expression matching a live spreadsheet by exact name.
///
/// Drive query strings escape `\` and `'` with a backslash.
fn drive_name_query(name: &str) -> String {
    let escaped = name.replace('\\', "\\\\").replace('\'', "\\'");
    format!(
        "name = '{}' and mimeType = '{}' and trashed = false",
        escaped, SPREADSHEET_MIME_TYPE
    )
}

/// A1 range selecting a whole worksheet. Quotes inside the name are doubled.
fn a1_sheet_range(worksheet: &str) -> String {
    format!("'{}'", worksheet.replace('\'', "''"))
}

fn cell_text(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Pulls `error.message` out of a Google error body, falling back to the body.
fn error_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: ErrorDetail,
    }

    #[derive(Deserialize)]
    struct ErrorDetail {
        message: String,
    }

    serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| body.to_string())
}

// =============================================================================
// Typestate Builder
// =============================================================================

/// Marker type for missing required builder fields.
pub struct Missing;

/// Marker type for set builder fields.
pub struct Set<T>(T);

/// Builder for constructing a [`GoogleSheetsClient`].
///
/// `token_provider` is required and enforced at compile time.
pub struct GoogleSheetsClientBuilder<Provider> {
    token_provider: Provider,
    drive_base_url: String,
    sheets_base_url: String,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    http_client: Option<Client>,
}

impl GoogleSheetsClientBuilder<Missing> {
    /// Creates a new builder pointing at the public Google endpoints.
    pub fn new() -> Self {
        Self {
            token_provider: Missing,
            drive_base_url: DRIVE_BASE_URL.to_string(),
            sheets_base_url: SHEETS_BASE_URL.to_string(),
            timeout: None,
            connect_timeout: None,
            http_client: None,
        }
    }

    /// Sets the token provider for authentication.
    pub fn token_provider<T: TokenProvider + 'static>(
        self,
        provider: T,
    ) -> GoogleSheetsClientBuilder<Set<Arc<dyn TokenProvider>>> {
        self.shared_token_provider(Arc::new(provider))
    }

    /// Sets an already shared token provider.
    pub fn shared_token_provider(
        self,
        provider: Arc<dyn TokenProvider>,
    ) -> GoogleSheetsClientBuilder<Set<Arc<dyn TokenProvider>>> {
        GoogleSheetsClientBuilder {
            token_provider: Set(provider),
            drive_base_url: self.drive_base_url,
            sheets_base_url: self.sheets_base_url,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            http_client: self.http_client,
        }
    }
}

impl Default for GoogleSheetsClientBuilder<Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> GoogleSheetsClientBuilder<P> {
    /// Overrides the Drive API base URL.
    pub fn drive_base_url(mut self, url: impl Into<String>) -> Self {
        self.drive_base_url = url.into();
        self
    }

    /// Overrides the Sheets API base URL.
    pub fn sheets_base_url(mut self, url: impl Into<String>) -> Self {
        self.sheets_base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout.
    ///
    /// This is applied when building the HTTP client.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets a custom HTTP client.
    ///
    /// If not set, a default client will be created.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }
}

impl GoogleSheetsClientBuilder<Set<Arc<dyn TokenProvider>>> {
    /// Builds the [`GoogleSheetsClient`].
    pub fn build(self) -> Result<GoogleSheetsClient, ApiError> {
        let http_client = match self.http_client {
            Some(client) => client,
            None => {
                let mut builder = Client::builder();
                if let Some(timeout) = self.connect_timeout {
                    builder = builder.connect_timeout(timeout);
                }
                builder.build()?
            }
        };

        Ok(GoogleSheetsClient {
            inner: Arc::new(GoogleSheetsClientInner {
                drive_base_url: self.drive_base_url,
                sheets_base_url: self.sheets_base_url,
                token_provider: self.token_provider.0,
                http_client,
                timeout: self.timeout,
            }),
        })
    }
}

// =============================================================================
// GoogleConnector
// =============================================================================

/// Builds a fresh [`GoogleSheetsClient`] for every request.
///
/// Credentials are re-read on each [`connect`](SourceConnector::connect):
/// first from the environment variable, then from the token file.
#[derive(Debug, Clone)]
pub struct GoogleConnector {
    credentials_env: String,
    token_file: PathBuf,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
}

impl GoogleConnector {
    /// Creates a connector reading `GOOGLE_CREDENTIALS` or `tokens/token.json`.
    pub fn new() -> Self {
        Self {
            credentials_env: DEFAULT_CREDENTIALS_ENV.to_string(),
            token_file: PathBuf::from(DEFAULT_TOKEN_FILE),
            timeout: None,
            connect_timeout: None,
        }
    }

    /// Sets the environment variable holding the credentials JSON.
    pub fn credentials_env(mut self, name: impl Into<String>) -> Self {
        self.credentials_env = name.into();
        self
    }

    /// Sets the fallback token file.
    pub fn token_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.token_file = path.into();
        self
    }

    /// Sets the per-request timeout of the clients it builds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connect timeout of the clients it builds.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }
}

impl Default for GoogleConnector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SourceConnector for GoogleConnector {
    async fn connect(&self) -> Result<Arc<dyn SheetSource>, Error> {
        let env_value = std::env::var(&self.credentials_env).ok();
        let credentials =
            Credentials::load(&self.credentials_env, env_value.as_deref(), &self.token_file)?;

        let mut http = Client::builder();
        if let Some(timeout) = self.connect_timeout {
            http = http.connect_timeout(timeout);
        }
        let http_client = http.build().map_err(ApiError::from)?;

        let token_provider = credentials.token_provider(http_client.clone())?;
        let mut builder = GoogleSheetsClient::builder()
            .shared_token_provider(token_provider)
            .http_client(http_client);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        let source: Arc<dyn SheetSource> = Arc::new(builder.build()?);
        Ok(source)
    }
}
