//! Tabular data cut from a spreadsheet grid.
//!
//! The flow for every request is grid → [`extract`] → [`Table`] →
//! [`paginate`] → [`PagedResult`]. Both steps are pure and synchronous; the
//! only slow step, fetching the grid, lives in [`crate::source`].

mod extract;
mod page;

pub use extract::extract;
pub use extract::extract_with;
pub use extract::try_extract;
pub use page::Page;
pub use page::PagedResult;
pub use page::paginate;

/// One raw row of cell text as delivered by the data source.
pub type RawRow = Vec<String>;

/// Ragged 2-D grid of cell text. Blank cells are empty strings.
pub type RawGrid = Vec<RawRow>;

/// One normalized table row. `None` is a blank cell.
pub type Row = Vec<Option<String>>;

// =============================================================================
// WindowSpec
// =============================================================================

/// Which part of a grid becomes the table.
///
/// `row_start` is the 1-based header row and `column_start` the 1-based first
/// column. Values below 1 are treated as 1. A limit of 0 means unbounded;
/// `limit_rows` counts data rows only, never the header.
///
/// # Example
///
/// ```
/// use sheetgate_lib::table::WindowSpec;
///
/// let window = WindowSpec::new().row_start(3).column_start(2).limit_rows(50);
/// assert_eq!(window.header_row_index(), 2);
/// assert_eq!(window.header_column_index(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSpec {
    /// 1-based header row, as requested.
    pub row_start: i64,
    /// 1-based first column, as requested.
    pub column_start: i64,
    /// Maximum number of columns, 0 for all.
    pub limit_columns: usize,
    /// Maximum number of data rows scanned, 0 for all.
    pub limit_rows: usize,
}

impl WindowSpec {
    /// Creates a window covering the whole grid with the header in row 1.
    pub fn new() -> Self {
        Self {
            row_start: 1,
            column_start: 1,
            limit_columns: 0,
            limit_rows: 0,
        }
    }

    /// Sets the 1-based header row.
    pub fn row_start(mut self, row_start: i64) -> Self {
        self.row_start = row_start;
        self
    }

    /// Sets the 1-based first column.
    pub fn column_start(mut self, column_start: i64) -> Self {
        self.column_start = column_start;
        self
    }

    /// Sets the column limit (0 = unbounded).
    pub fn limit_columns(mut self, limit_columns: usize) -> Self {
        self.limit_columns = limit_columns;
        self
    }

    /// Sets the data row limit (0 = unbounded).
    pub fn limit_rows(mut self, limit_rows: usize) -> Self {
        self.limit_rows = limit_rows;
        self
    }

    /// Zero-based index of the header row after clamping.
    pub fn header_row_index(&self) -> usize {
        clamp_to_index(self.row_start)
    }

    /// Zero-based index of the first column after clamping.
    pub fn header_column_index(&self) -> usize {
        clamp_to_index(self.column_start)
    }
}

impl Default for WindowSpec {
    fn default() -> Self {
        Self::new()
    }
}

fn clamp_to_index(one_based: i64) -> usize {
    usize::try_from(one_based.max(1) - 1).unwrap_or(usize::MAX)
}

// =============================================================================
// Table
// =============================================================================

/// Rectangular table with named columns.
///
/// Every row has exactly `columns().len()` cells. Column names come verbatim
/// from the header row and may repeat; only position identifies a column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    /// Creates a table, fitting every row to the header width.
    ///
    /// Short rows are padded with `None`, long rows are truncated.
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, None);
                row
            })
            .collect();
        Self { columns, rows }
    }

    /// The table with no columns and no rows.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Column names in order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows in source order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Returns `true` when there is nothing to show: no rows or no columns.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.columns.is_empty()
    }

    /// Consumes the table and returns `(columns, rows)`.
    pub fn into_parts(self) -> (Vec<String>, Vec<Row>) {
        (self.columns, self.rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_clamps_to_first_cell() {
        let window = WindowSpec::new().row_start(0).column_start(-7);
        assert_eq!(window.header_row_index(), 0);
        assert_eq!(window.header_column_index(), 0);

        let window = WindowSpec::new().row_start(4).column_start(3);
        assert_eq!(window.header_row_index(), 3);
        assert_eq!(window.header_column_index(), 2);
    }

    #[test]
    fn test_new_fits_rows_to_width() {
        let table = Table::new(
            vec!["a".into(), "b".into()],
            vec![
                vec![Some("1".into())],
                vec![Some("1".into()), Some("2".into()), Some("3".into())],
            ],
        );
        assert_eq!(table.rows()[0], vec![Some("1".to_string()), None]);
        assert_eq!(
            table.rows()[1],
            vec![Some("1".to_string()), Some("2".to_string())]
        );
    }

    #[test]
    fn test_is_empty() {
        assert!(Table::empty().is_empty());
        assert!(Table::new(vec!["h1".into()], vec![]).is_empty());
        assert!(!Table::new(vec!["h1".into()], vec![vec![None]]).is_empty());
    }
}
