//! In-memory source

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use super::SheetRef;
use super::SheetSource;
use super::SourceConnector;
use crate::error::ApiError;
use crate::error::Error;
use crate::table::RawGrid;

/// A source backed by grids held in memory.
///
/// Unknown sheets fail the way a missing remote worksheet does. Also acts as
/// its own [`SourceConnector`].
///
/// # Example
///
/// ```
/// use sheetgate_lib::source::MemorySource;
///
/// let source = MemorySource::new().with_sheet(
///     "Budget tracker",
///     "transactions",
///     vec![vec!["date".into(), "amount".into()]],
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    sheets: HashMap<SheetRef, RawGrid>,
}

impl MemorySource {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a worksheet.
    pub fn with_sheet(
        mut self,
        spreadsheet: impl Into<String>,
        worksheet: impl Into<String>,
        grid: RawGrid,
    ) -> Self {
        self.sheets.insert(SheetRef::new(spreadsheet, worksheet), grid);
        self
    }
}

#[async_trait]
impl SheetSource for MemorySource {
    async fn fetch_grid(&self, sheet: &SheetRef) -> Result<RawGrid, Error> {
        self.sheets.get(sheet).cloned().ok_or_else(|| {
            Error::Api(ApiError::SpreadsheetNotFound {
                name: sheet.to_string(),
            })
        })
    }
}

#[async_trait]
impl SourceConnector for MemorySource {
    async fn connect(&self) -> Result<Arc<dyn SheetSource>, Error> {
        let source: Arc<dyn SheetSource> = Arc::new(self.clone());
        Ok(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_known_and_unknown() {
        let source = MemorySource::new().with_sheet("s", "w", vec![vec!["a".into()]]);

        let grid = source.fetch_grid(&SheetRef::new("s", "w")).await.unwrap();
        assert_eq!(grid, vec![vec!["a".to_string()]]);

        let err = source.fetch_grid(&SheetRef::new("s", "other")).await.unwrap_err();
        assert!(matches!(err, Error::Api(ref e) if e.is_not_found()));
    }
}
