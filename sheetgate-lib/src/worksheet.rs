//! Fetch-then-extract for one request.

use std::time::Instant;

use crate::diagnostics::DiagnosticEvent;
use crate::diagnostics::Diagnostics;
use crate::source::SheetRef;
use crate::source::SheetSource;
use crate::table::Table;
use crate::table::WindowSpec;
use crate::table::try_extract;

/// Fetches `sheet` from `source` and cuts `window` out of it.
///
/// Fetch failures and windows that do not fit both yield [`Table::empty`];
/// the cause, the request parameters and the elapsed time go to
/// `diagnostics`. Exactly one event is reported per call.
///
/// # Example
///
/// ```ignore
/// let table = load_table(
///     source.as_ref(),
///     &SheetRef::new("Budget tracker", "transactions"),
///     WindowSpec::new(),
///     &LogDiagnostics,
/// )
/// .await;
/// ```
pub async fn load_table(
    source: &dyn SheetSource,
    sheet: &SheetRef,
    window: WindowSpec,
    diagnostics: &dyn Diagnostics,
) -> Table {
    let started = Instant::now();
    log::info!(
        "Starting table load for {} (limit_rows: {})",
        sheet,
        window.limit_rows
    );

    let grid = match source.fetch_grid(sheet).await {
        Ok(grid) => grid,
        Err(e) => {
            diagnostics.report(&DiagnosticEvent::source_failed(
                Some(sheet.clone()),
                window,
                &e,
                started.elapsed(),
            ));
            return Table::empty();
        }
    };

    match try_extract(&grid, window) {
        Ok(table) => {
            diagnostics.report(&DiagnosticEvent::extracted(
                Some(sheet.clone()),
                window,
                table.len(),
                started.elapsed(),
            ));
            table
        }
        Err(e) => {
            diagnostics.report(&DiagnosticEvent::window_failed(
                Some(sheet.clone()),
                window,
                e,
                started.elapsed(),
            ));
            Table::empty()
        }
    }
}
