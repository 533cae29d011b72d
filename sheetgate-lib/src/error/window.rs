//! Table window errors

/// Structural reasons a window cannot be cut from a grid.
///
/// These never reach HTTP callers as failures; the extractor degrades to an
/// empty table and reports the cause through diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WindowError {
    /// The grid has no rows at all.
    #[error("grid is empty")]
    EmptyGrid,

    /// The header row lies past the last row of the grid.
    #[error("row_start {row_start} is beyond data length {rows}")]
    RowStartOutOfRange {
        /// Clamped 1-based header row.
        row_start: usize,
        /// Number of rows in the grid.
        rows: usize,
    },

    /// The header row does not reach the requested first column.
    #[error("column_start {column_start} is beyond the width {width} of row {row_start}")]
    ColumnStartOutOfRange {
        /// Clamped 1-based first column.
        column_start: usize,
        /// Clamped 1-based header row.
        row_start: usize,
        /// Number of cells in the header row.
        width: usize,
    },
}
