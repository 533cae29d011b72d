//! Fetch a worksheet and print it as JSON.
//!
//! Run with: cargo run --example fetch_worksheet -- "<spreadsheet>" "<worksheet>"
//!
//! Requires GOOGLE_CREDENTIALS (in the environment or a .env file) or
//! tokens/token.json.

use std::env;

use sheetgate_lib::diagnostics::LogDiagnostics;
use sheetgate_lib::load_table;
use sheetgate_lib::response::TableResponse;
use sheetgate_lib::source::GoogleConnector;
use sheetgate_lib::source::SheetRef;
use sheetgate_lib::source::SourceConnector;
use sheetgate_lib::table::WindowSpec;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    let mut args = env::args().skip(1);
    let spreadsheet = args.next().expect("usage: fetch_worksheet <spreadsheet> <worksheet>");
    let worksheet = args.next().expect("usage: fetch_worksheet <spreadsheet> <worksheet>");

    let source = GoogleConnector::new().connect().await?;
    let table = load_table(
        source.as_ref(),
        &SheetRef::new(spreadsheet, worksheet),
        WindowSpec::new(),
        &LogDiagnostics,
    )
    .await;

    let body = TableResponse::from_table("Data retrieved successfully", table);
    println!("{}", serde_json::to_string_pretty(&body)?);

    Ok(())
}
