//! Where grids come from.
//!
//! A [`SheetSource`] turns a [`SheetRef`] into a [`RawGrid`]. A
//! [`SourceConnector`] builds a fresh source for every request, mirroring the
//! one-client-per-request model of the service: nothing is pooled or cached.

mod google;
mod memory;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Error;
use crate::table::RawGrid;

pub use google::GoogleConnector;
pub use google::GoogleSheetsClient;
pub use google::GoogleSheetsClientBuilder;
pub use google::Missing;
pub use google::Set;
pub use memory::MemorySource;

/// Names a worksheet inside a spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SheetRef {
    /// Spreadsheet (file) name.
    pub spreadsheet: String,
    /// Worksheet (tab) name.
    pub worksheet: String,
}

impl SheetRef {
    /// Creates a new sheet reference.
    pub fn new(spreadsheet: impl Into<String>, worksheet: impl Into<String>) -> Self {
        Self {
            spreadsheet: spreadsheet.into(),
            worksheet: worksheet.into(),
        }
    }
}

impl std::fmt::Display for SheetRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.spreadsheet, self.worksheet)
    }
}

/// Provides the raw cell grid of a worksheet.
#[async_trait]
pub trait SheetSource: Send + Sync {
    /// Fetches every value of the worksheet, rows in order.
    ///
    /// Rows may have different lengths; blank cells are empty strings.
    async fn fetch_grid(&self, sheet: &SheetRef) -> Result<RawGrid, Error>;
}

/// Acquires a [`SheetSource`] for one request.
///
/// Failures here are configuration or credential problems, not data
/// problems, and are surfaced to the caller.
#[async_trait]
pub trait SourceConnector: Send + Sync {
    /// Builds a source ready to fetch.
    async fn connect(&self) -> Result<Arc<dyn SheetSource>, Error>;
}
