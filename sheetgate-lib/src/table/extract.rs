//! Windowed table extraction.

use std::time::Instant;

use super::RawRow;
use super::Row;
use super::Table;
use super::WindowSpec;
use crate::diagnostics::DiagnosticEvent;
use crate::diagnostics::Diagnostics;
use crate::diagnostics::LogDiagnostics;
use crate::error::WindowError;

/// Cuts a table out of `grid`, logging structural failures as warnings.
///
/// Never fails: when the window does not fit the grid the result is
/// [`Table::empty`]. See [`try_extract`] for the rules.
///
/// # Example
///
/// ```
/// use sheetgate_lib::table::{extract, WindowSpec};
///
/// let grid = vec![
///     vec!["id".to_string(), "name".to_string()],
///     vec!["1".to_string(), "Alice".to_string()],
///     vec!["2".to_string(), String::new()],
/// ];
/// let table = extract(&grid, WindowSpec::new());
///
/// assert_eq!(table.columns(), ["id", "name"]);
/// assert_eq!(table.rows()[1], vec![Some("2".to_string()), None]);
/// ```
pub fn extract(grid: &[RawRow], window: WindowSpec) -> Table {
    extract_with(grid, window, &LogDiagnostics)
}

/// Like [`extract`], but reports the outcome to `diagnostics`.
pub fn extract_with(grid: &[RawRow], window: WindowSpec, diagnostics: &dyn Diagnostics) -> Table {
    let started = Instant::now();
    match try_extract(grid, window) {
        Ok(table) => {
            diagnostics.report(&DiagnosticEvent::extracted(
                None,
                window,
                table.len(),
                started.elapsed(),
            ));
            table
        }
        Err(error) => {
            diagnostics.report(&DiagnosticEvent::window_failed(
                None,
                window,
                error,
                started.elapsed(),
            ));
            Table::empty()
        }
    }
}

/// Cuts a table out of `grid`, returning the structural failure if any.
///
/// - The header is the row at `row_start`, read from `column_start` onward and
///   cut to `limit_columns` when set.
/// - Data rows follow the header. `limit_rows` bounds the scanned index range,
///   not the number of rows produced.
/// - Rows that do not reach `column_start` are skipped but still use up their
///   slot in the scanned range.
/// - Every produced row has exactly the header width: short rows are padded,
///   long rows are cut.
/// - Empty cells, original or padding, become `None`.
///
/// A header on the last row of the grid is not a failure: the result has the
/// columns and no rows, and the loader logs it as a warning.
pub fn try_extract(grid: &[RawRow], window: WindowSpec) -> Result<Table, WindowError> {
    let row_idx = window.header_row_index();
    let col_idx = window.header_column_index();

    if grid.is_empty() {
        return Err(WindowError::EmptyGrid);
    }

    let header_row = grid.get(row_idx).ok_or(WindowError::RowStartOutOfRange {
        row_start: row_idx.saturating_add(1),
        rows: grid.len(),
    })?;

    if col_idx >= header_row.len() {
        return Err(WindowError::ColumnStartOutOfRange {
            column_start: col_idx.saturating_add(1),
            row_start: row_idx + 1,
            width: header_row.len(),
        });
    }

    let mut columns = header_row[col_idx..].to_vec();
    if window.limit_columns > 0 {
        columns.truncate(window.limit_columns);
    }

    let first_data_row = row_idx + 1;
    let end = if window.limit_rows > 0 {
        first_data_row
            .saturating_add(window.limit_rows)
            .min(grid.len())
    } else {
        grid.len()
    };

    let rows = grid[first_data_row..end]
        .iter()
        .filter(|row| row.len() > col_idx)
        .map(|row| normalize_row(&row[col_idx..], columns.len()))
        .collect();

    Ok(Table { columns, rows })
}

/// Fits one row slice to `width` cells and turns blanks into `None`.
fn normalize_row(cells: &[String], width: usize) -> Row {
    let mut row: Row = cells
        .iter()
        .take(width)
        .map(|cell| (!cell.is_empty()).then(|| cell.clone()))
        .collect();
    row.resize(width, None);
    row
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::diagnostics::Outcome;

    fn grid(rows: &[&[&str]]) -> Vec<RawRow> {
        rows.iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect()
    }

    fn cells(values: &[Option<&str>]) -> Row {
        values.iter().map(|v| v.map(str::to_string)).collect()
    }

    #[derive(Default)]
    struct Recorder(Mutex<Vec<DiagnosticEvent>>);

    impl Diagnostics for Recorder {
        fn report(&self, event: &DiagnosticEvent) {
            self.0.lock().unwrap().push(event.clone());
        }
    }

    #[test]
    fn test_basic_extraction() {
        let g = grid(&[&["id", "name"], &["1", "Alice"], &["2", ""]]);
        let table = try_extract(&g, WindowSpec::new()).unwrap();

        assert_eq!(table.columns(), ["id", "name"]);
        assert_eq!(
            table.rows(),
            [cells(&[Some("1"), Some("Alice")]), cells(&[Some("2"), None])]
        );
    }

    #[test]
    fn test_header_only_grid() {
        let g = grid(&[&["h1", "h2"]]);
        let table = try_extract(&g, WindowSpec::new()).unwrap();

        assert_eq!(table.columns(), ["h1", "h2"]);
        assert!(table.rows().is_empty());
    }

    #[test]
    fn test_empty_grid() {
        assert_eq!(
            try_extract(&[], WindowSpec::new()),
            Err(WindowError::EmptyGrid)
        );
    }

    #[test]
    fn test_row_start_past_end() {
        let g = grid(&[&["a"], &["1"]]);
        assert_eq!(
            try_extract(&g, WindowSpec::new().row_start(3)),
            Err(WindowError::RowStartOutOfRange {
                row_start: 3,
                rows: 2
            })
        );
        assert!(try_extract(&g, WindowSpec::new().row_start(2)).is_ok());
    }

    #[test]
    fn test_column_start_past_header() {
        let g = grid(&[&["a", "b"], &["1", "2", "3", "4", "5"]]);
        assert_eq!(
            try_extract(&g, WindowSpec::new().column_start(5)),
            Err(WindowError::ColumnStartOutOfRange {
                column_start: 5,
                row_start: 1,
                width: 2
            })
        );
        // Data rows are wider, but the header decides.
        assert!(try_extract(&g, WindowSpec::new().column_start(3)).is_err());
    }

    #[test]
    fn test_non_positive_starts_are_clamped() {
        let g = grid(&[&["a", "b"], &["1", "2"]]);
        let clamped = try_extract(&g, WindowSpec::new().row_start(-3).column_start(0)).unwrap();
        assert_eq!(clamped, try_extract(&g, WindowSpec::new()).unwrap());
    }

    #[test]
    fn test_window_offsets() {
        let g = grid(&[
            &["title"],
            &["", "x", "y", "z"],
            &["", "1", "2", "3"],
            &["", "4", "5", "6"],
        ]);
        let table = try_extract(&g, WindowSpec::new().row_start(2).column_start(2)).unwrap();

        assert_eq!(table.columns(), ["x", "y", "z"]);
        assert_eq!(
            table.rows(),
            [
                cells(&[Some("1"), Some("2"), Some("3")]),
                cells(&[Some("4"), Some("5"), Some("6")])
            ]
        );
    }

    #[test]
    fn test_limit_columns() {
        let g = grid(&[&["a", "b", "c"], &["1", "2", "3"]]);

        let table = try_extract(&g, WindowSpec::new().limit_columns(2)).unwrap();
        assert_eq!(table.columns(), ["a", "b"]);
        assert_eq!(table.rows(), [cells(&[Some("1"), Some("2")])]);

        let table = try_extract(&g, WindowSpec::new().limit_columns(10)).unwrap();
        assert_eq!(table.columns(), ["a", "b", "c"]);
    }

    #[test]
    fn test_limit_rows_counts_data_rows_only() {
        let g = grid(&[&["a"], &["1"], &["2"], &["3"]]);
        let table = try_extract(&g, WindowSpec::new().limit_rows(2)).unwrap();
        assert_eq!(table.rows(), [cells(&[Some("1")]), cells(&[Some("2")])]);

        let table = try_extract(&g, WindowSpec::new().limit_rows(0)).unwrap();
        assert_eq!(table.len(), 3);

        let table = try_extract(&g, WindowSpec::new().limit_rows(100)).unwrap();
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_short_rows_are_skipped_but_use_their_slot() {
        let g = grid(&[
            &["", "a", "b"],
            &["", "1"],
            &["only"],
            &[],
            &["", "4", "5"],
        ]);
        let table = try_extract(&g, WindowSpec::new().column_start(2).limit_rows(3)).unwrap();

        // Scanned rows 2..=4; two of them are too short to reach column 2.
        assert_eq!(table.rows(), [cells(&[Some("1"), None])]);

        let table = try_extract(&g, WindowSpec::new().column_start(2)).unwrap();
        assert_eq!(
            table.rows(),
            [cells(&[Some("1"), None]), cells(&[Some("4"), Some("5")])]
        );
    }

    #[test]
    fn test_blank_rows_are_kept() {
        let g = grid(&[&["a", "b"], &["", ""], &[""]]);
        let table = try_extract(&g, WindowSpec::new()).unwrap();
        assert_eq!(table.rows(), [cells(&[None, None]), cells(&[None, None])]);
    }

    #[test]
    fn test_wide_rows_are_cut_to_header_width() {
        let g = grid(&[&["a", "b"], &["1", "2", "3"]]);
        let table = try_extract(&g, WindowSpec::new()).unwrap();
        assert_eq!(table.rows(), [cells(&[Some("1"), Some("2")])]);
    }

    #[test]
    fn test_duplicate_headers_keep_positions() {
        let g = grid(&[&["x", "x", ""], &["1", "2", "3"]]);
        let table = try_extract(&g, WindowSpec::new()).unwrap();
        assert_eq!(table.columns(), ["x", "x", ""]);
        assert_eq!(table.rows()[0].len(), 3);
    }

    #[test]
    fn test_extract_reports_to_diagnostics() {
        let recorder = Recorder::default();
        let g = grid(&[&["a"], &["1"]]);

        let table = extract_with(&g, WindowSpec::new().column_start(9), &recorder);
        assert_eq!(table, Table::empty());

        let table = extract_with(&g, WindowSpec::new(), &recorder);
        assert_eq!(table.len(), 1);

        let events = recorder.0.lock().unwrap();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0].outcome, Outcome::Degraded(_)));
        assert_eq!(events[0].window.column_start, 9);
        assert_eq!(events[1].outcome, Outcome::Extracted { rows: 1 });
    }

    #[test]
    fn test_extract_degrades_to_empty_table() {
        assert_eq!(extract(&[], WindowSpec::new()), Table::empty());
        let g = grid(&[&["a"]]);
        assert_eq!(extract(&g, WindowSpec::new().row_start(5)), Table::empty());
    }
}
