//! Integration tests against the real Google APIs.
//!
//! These tests require real credentials and are ignored by default.
//! To run them, create a `.env` file in the sheetgate-lib directory with
//! (a service-account key JSON works in place of `authorized_user`):
//!
//! ```env
//! GOOGLE_CREDENTIALS={"type": "authorized_user", "client_id": "...", "client_secret": "...", "refresh_token": "..."}
//! SHEETGATE_TEST_SPREADSHEET=Budget tracker
//! SHEETGATE_TEST_WORKSHEET=transactions
//! ```
//!
//! Then run: `cargo test -p sheetgate-lib -- --ignored`

use std::env;

use sheetgate_lib::diagnostics::LogDiagnostics;
use sheetgate_lib::load_table;
use sheetgate_lib::source::GoogleConnector;
use sheetgate_lib::source::SheetRef;
use sheetgate_lib::source::SheetSource;
use sheetgate_lib::source::SourceConnector;
use sheetgate_lib::table::WindowSpec;

fn load_env() -> Option<SheetRef> {
    let _ = dotenvy::dotenv();

    env::var("GOOGLE_CREDENTIALS").ok()?;
    let spreadsheet = env::var("SHEETGATE_TEST_SPREADSHEET").ok()?;
    let worksheet = env::var("SHEETGATE_TEST_WORKSHEET").ok()?;

    Some(SheetRef::new(spreadsheet, worksheet))
}

#[tokio::test]
#[ignore = "requires real credentials in .env file"]
async fn test_fetch_grid() {
    let sheet = load_env().expect("Missing required environment variables. See module docs.");

    let source = GoogleConnector::new()
        .connect()
        .await
        .unwrap_or_else(|e| panic!("connect failed: {}", e));
    let grid = source.fetch_grid(&sheet).await.expect("fetch failed");

    assert!(!grid.is_empty(), "worksheet should have at least a header row");
    println!("Fetched {} rows", grid.len());
}

#[tokio::test]
#[ignore = "requires real credentials in .env file"]
async fn test_load_windowed_table() {
    let sheet = load_env().expect("Missing required environment variables. See module docs.");

    let source = GoogleConnector::new()
        .connect()
        .await
        .unwrap_or_else(|e| panic!("connect failed: {}", e));
    let table = load_table(
        source.as_ref(),
        &sheet,
        WindowSpec::new().limit_rows(5).limit_columns(3),
        &LogDiagnostics,
    )
    .await;

    assert!(table.columns().len() <= 3);
    assert!(table.len() <= 5);
    println!("Columns: {:?}", table.columns());
}
