//! Structured reporting for table loads.
//!
//! Extraction and loading never fail loudly; instead every outcome, and in
//! particular every degraded one, is handed to a [`Diagnostics`]
//! implementation together with the request parameters and elapsed time.

use std::time::Duration;

use crate::error::Error;
use crate::error::WindowError;
use crate::source::SheetRef;
use crate::table::WindowSpec;

/// Why a request produced an empty table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DegradeCause {
    /// The spreadsheet or worksheet does not exist. Holds the rendered error.
    NotFound(String),
    /// The grid could not be fetched. Holds the rendered error.
    Source(String),
    /// The grid was fetched but the window does not fit it.
    Window(WindowError),
}

impl std::fmt::Display for DegradeCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(message) => write!(f, "not found: {}", message),
            Self::Source(message) => write!(f, "source unavailable: {}", message),
            Self::Window(error) => write!(f, "{}", error),
        }
    }
}

/// Result of one extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A table was produced with this many data rows.
    Extracted { rows: usize },
    /// The empty table was returned instead.
    Degraded(DegradeCause),
}

/// One diagnostic event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticEvent {
    /// The sheet being read, when known.
    pub sheet: Option<SheetRef>,
    /// The requested window, before clamping.
    pub window: WindowSpec,
    /// Time spent, including the fetch when there was one.
    pub elapsed: Duration,
    /// What happened.
    pub outcome: Outcome,
}

impl DiagnosticEvent {
    /// Event for a successful extraction.
    pub fn extracted(
        sheet: Option<SheetRef>,
        window: WindowSpec,
        rows: usize,
        elapsed: Duration,
    ) -> Self {
        Self {
            sheet,
            window,
            elapsed,
            outcome: Outcome::Extracted { rows },
        }
    }

    /// Event for a fetch that failed.
    pub fn source_failed(
        sheet: Option<SheetRef>,
        window: WindowSpec,
        error: &Error,
        elapsed: Duration,
    ) -> Self {
        let cause = if error.is_not_found() {
            DegradeCause::NotFound(error.to_string())
        } else {
            DegradeCause::Source(error.to_string())
        };
        Self {
            sheet,
            window,
            elapsed,
            outcome: Outcome::Degraded(cause),
        }
    }

    /// Event for a window that did not fit the grid.
    pub fn window_failed(
        sheet: Option<SheetRef>,
        window: WindowSpec,
        error: WindowError,
        elapsed: Duration,
    ) -> Self {
        Self {
            sheet,
            window,
            elapsed,
            outcome: Outcome::Degraded(DegradeCause::Window(error)),
        }
    }

    /// Returns `true` if the request fell back to the empty table.
    pub fn is_degraded(&self) -> bool {
        matches!(self.outcome, Outcome::Degraded(_))
    }

    /// Severity the event is logged at.
    ///
    /// A header with no data rows below it is a warning even though it is not
    /// degraded; so are missing sheets and windows that do not fit. Any other
    /// fetch failure is an error.
    pub fn level(&self) -> log::Level {
        match &self.outcome {
            Outcome::Extracted { rows: 0 } => log::Level::Warn,
            Outcome::Extracted { .. } => log::Level::Info,
            Outcome::Degraded(DegradeCause::Source(_)) => log::Level::Error,
            Outcome::Degraded(_) => log::Level::Warn,
        }
    }
}

/// Receives diagnostic events.
///
/// Implementations must be cheap and must not fail; they run on the request
/// path.
pub trait Diagnostics: Send + Sync {
    /// Records one event.
    fn report(&self, event: &DiagnosticEvent);
}

/// Writes events through the `log` facade, at [`DiagnosticEvent::level`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn report(&self, event: &DiagnosticEvent) {
        let sheet = event
            .sheet
            .as_ref()
            .map(|sheet| sheet.to_string())
            .unwrap_or_else(|| "<grid>".to_string());
        let secs = event.elapsed.as_secs_f64();

        let level = event.level();

        match &event.outcome {
            Outcome::Extracted { rows: 0 } => {
                log::log!(
                    level,
                    "No data rows below the header in {} after {:.2}s (row_start={}, limit_rows={})",
                    sheet,
                    secs,
                    event.window.row_start,
                    event.window.limit_rows
                );
            }
            Outcome::Extracted { rows } => {
                log::log!(
                    level,
                    "Retrieved and processed {} rows from {} in {:.2}s",
                    rows,
                    sheet,
                    secs
                );
            }
            Outcome::Degraded(cause) => {
                log::log!(
                    level,
                    "Returning empty table for {} after {:.2}s: {} (row_start={}, column_start={}, limit_columns={}, limit_rows={})",
                    sheet,
                    secs,
                    cause,
                    event.window.row_start,
                    event.window.column_start,
                    event.window.limit_columns,
                    event.window.limit_rows
                );
            }
        }
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopDiagnostics;

impl Diagnostics for NoopDiagnostics {
    fn report(&self, _event: &DiagnosticEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;

    #[test]
    fn test_cause_display() {
        let cause = DegradeCause::Window(WindowError::EmptyGrid);
        assert_eq!(cause.to_string(), "grid is empty");

        let cause = DegradeCause::Source("HTTP 403: forbidden".into());
        assert_eq!(cause.to_string(), "source unavailable: HTTP 403: forbidden");
    }

    #[test]
    fn test_is_degraded() {
        let ok = DiagnosticEvent::extracted(None, WindowSpec::new(), 3, Duration::ZERO);
        assert!(!ok.is_degraded());

        let failed = DiagnosticEvent::window_failed(
            None,
            WindowSpec::new(),
            WindowError::EmptyGrid,
            Duration::ZERO,
        );
        assert!(failed.is_degraded());
    }

    #[test]
    fn test_not_found_fetches_are_their_own_cause() {
        let missing = Error::from(ApiError::SpreadsheetNotFound {
            name: "Budget".into(),
        });
        let event = DiagnosticEvent::source_failed(None, WindowSpec::new(), &missing, Duration::ZERO);
        assert_eq!(
            event.outcome,
            Outcome::Degraded(DegradeCause::NotFound("Spreadsheet not found: Budget".into()))
        );
        assert_eq!(event.level(), log::Level::Warn);

        let denied = Error::from(ApiError::http(403, "The caller does not have permission"));
        let event = DiagnosticEvent::source_failed(None, WindowSpec::new(), &denied, Duration::ZERO);
        assert!(matches!(event.outcome, Outcome::Degraded(DegradeCause::Source(_))));
        assert_eq!(event.level(), log::Level::Error);
    }

    #[test]
    fn test_header_only_table_is_a_warning() {
        let header_only = DiagnosticEvent::extracted(None, WindowSpec::new(), 0, Duration::ZERO);
        assert!(!header_only.is_degraded());
        assert_eq!(header_only.level(), log::Level::Warn);

        let rows = DiagnosticEvent::extracted(None, WindowSpec::new(), 2, Duration::ZERO);
        assert_eq!(rows.level(), log::Level::Info);
    }
}
