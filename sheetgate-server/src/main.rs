//! HTTP API serving windowed, paginated spreadsheet tables.

mod config;
mod error;
mod logging;
mod query;
mod routes;
mod server;

use std::sync::Arc;

use sheetgate_lib::diagnostics::LogDiagnostics;
use sheetgate_lib::source::GoogleConnector;
use tokio::net::TcpListener;

use crate::config::API_KEY_ENV;
use crate::config::Config;
use crate::server::ApiKey;
use crate::server::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;
    logging::init(config.log_level, &config.log_file)?;

    let mut connector = GoogleConnector::new()
        .credentials_env(&config.credentials_env)
        .token_file(&config.token_file);
    if let Some(timeout) = config.request_timeout {
        connector = connector.timeout(timeout);
    }

    let state = Arc::new(AppState {
        api_key: ApiKey::Env(API_KEY_ENV.to_string()),
        connector: Arc::new(connector),
        diagnostics: Arc::new(LogDiagnostics),
        budget_sheet: config.budget_sheet.clone(),
    });

    if state.api_key.current().is_none() {
        log::warn!(
            "{} is not set; authenticated endpoints will answer 500",
            API_KEY_ENV
        );
    }

    let listener = TcpListener::bind(config.bind_address()).await?;
    log::info!("Listening on http://{}", listener.local_addr()?);

    server::serve(listener, state).await?;
    Ok(())
}
