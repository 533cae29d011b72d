//! Query string parsing and validation

use std::collections::HashMap;

use sheetgate_lib::source::SheetRef;
use sheetgate_lib::table::WindowSpec;

use crate::error::QueryError;
use crate::error::RequestError;

/// Largest page size a client may ask for.
pub const MAX_PAGE_SIZE: i64 = 1000;

/// Decoded query parameters plus the validation errors collected so far.
///
/// Every accessor records its own failure, so one response lists every bad
/// parameter at once.
#[derive(Debug, Default)]
pub struct Query {
    params: HashMap<String, String>,
    errors: Vec<QueryError>,
}

impl Query {
    /// Decodes a raw query string. For repeated keys the last value wins.
    pub fn parse(raw: Option<&str>) -> Self {
        let params = url::form_urlencoded::parse(raw.unwrap_or("").as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        Self {
            params,
            errors: Vec::new(),
        }
    }

    /// A required string parameter.
    pub fn required(&mut self, name: &str) -> String {
        match self.params.get(name) {
            Some(value) => value.clone(),
            None => {
                self.errors
                    .push(QueryError::new(name, "missing", "Field required"));
                String::new()
            }
        }
    }

    /// An optional integer parameter with inclusive bounds.
    pub fn int(&mut self, name: &str, min: Option<i64>, max: Option<i64>) -> Option<i64> {
        let raw = self.params.get(name)?;
        let value = match raw.trim().parse::<i64>() {
            Ok(value) => value,
            Err(_) => {
                self.errors.push(QueryError::new(
                    name,
                    "int_parsing",
                    "Input should be a valid integer, unable to parse string as an integer",
                ));
                return None;
            }
        };

        if let Some(min) = min
            && value < min
        {
            self.errors.push(QueryError::new(
                name,
                "greater_than_equal",
                format!("Input should be greater than or equal to {}", min),
            ));
            return None;
        }
        if let Some(max) = max
            && value > max
        {
            self.errors.push(QueryError::new(
                name,
                "less_than_equal",
                format!("Input should be less than or equal to {}", max),
            ));
            return None;
        }

        Some(value)
    }

    /// Fails with every collected error, if any.
    pub fn finish(self) -> Result<(), RequestError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(RequestError::Query(self.errors))
        }
    }
}

/// Parameters of `GET /data/worksheet`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorksheetQuery {
    pub sheet: SheetRef,
    pub window: WindowSpec,
}

impl WorksheetQuery {
    /// Validates the worksheet query. Limits must not be negative.
    pub fn from_query(mut query: Query) -> Result<Self, RequestError> {
        let spreadsheet = query.required("spreadsheet_name");
        let worksheet = query.required("worksheet_name");
        let row_start = query.int("row_start", None, None).unwrap_or(1);
        let column_start = query.int("column_start", None, None).unwrap_or(1);
        let limit_columns = query.int("limit_columns", Some(0), None).unwrap_or(0);
        let limit_rows = query.int("limit_rows", Some(0), None).unwrap_or(0);
        query.finish()?;

        Ok(Self {
            sheet: SheetRef::new(spreadsheet, worksheet),
            window: WindowSpec::new()
                .row_start(row_start)
                .column_start(column_start)
                .limit_columns(usize::try_from(limit_columns).unwrap_or(usize::MAX))
                .limit_rows(usize::try_from(limit_rows).unwrap_or(usize::MAX)),
        })
    }
}

/// Parameters of `GET /data/budget_tracker/transactions`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl PageQuery {
    /// Validates `page >= 1` and `1 <= page_size <= 1000`, both optional.
    pub fn from_query(mut query: Query) -> Result<Self, RequestError> {
        let page = query.int("page", Some(1), Some(u32::MAX as i64));
        let page_size = query.int("page_size", Some(1), Some(MAX_PAGE_SIZE));
        query.finish()?;

        Ok(Self {
            page: page.and_then(|p| u32::try_from(p).ok()),
            page_size: page_size.and_then(|p| u32::try_from(p).ok()),
        })
    }
}
