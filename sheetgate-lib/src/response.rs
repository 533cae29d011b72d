//! JSON bodies returned by the HTTP API

use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use crate::table::PagedResult;
use crate::table::Row;
use crate::table::Table;

/// One row as a JSON object, keyed by column name in column order.
pub type Record = Map<String, Value>;

/// Pagination fields added to paged responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
    pub total_pages: usize,
    pub has_next: bool,
    pub has_previous: bool,
}

/// Body of a table response.
///
/// Empty results carry only `message`, `data` and `total_rows`; results with
/// data add `columns`, and paged results add the [`Pagination`] fields.
///
/// # Example
///
/// ```
/// use sheetgate_lib::response::TableResponse;
/// use sheetgate_lib::table::Table;
///
/// let body = TableResponse::from_table("ok", Table::new(vec!["a".into()], vec![vec![None]]));
/// assert_eq!(
///     serde_json::to_string(&body).unwrap(),
///     r#"{"message":"ok","columns":["a"],"data":[{"a":null}],"total_rows":1}"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<String>>,
    pub data: Vec<Record>,
    pub total_rows: usize,
    #[serde(flatten)]
    pub pagination: Option<Pagination>,
}

impl TableResponse {
    /// A response with no data.
    pub fn empty(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            columns: None,
            data: Vec::new(),
            total_rows: 0,
            pagination: None,
        }
    }

    /// A response carrying a whole table.
    pub fn from_table(message: impl Into<String>, table: Table) -> Self {
        let (columns, rows) = table.into_parts();
        let data = records(&columns, rows);
        Self {
            message: message.into(),
            total_rows: data.len(),
            data,
            columns: Some(columns),
            pagination: None,
        }
    }

    /// A response carrying a pager result.
    pub fn from_paged(message: impl Into<String>, result: PagedResult) -> Self {
        match result {
            PagedResult::Unpaginated(table) => Self::from_table(message, table),
            PagedResult::Paginated { columns, page } => {
                let pagination = Pagination {
                    page: page.page(),
                    page_size: page.page_size(),
                    total_pages: page.total_pages(),
                    has_next: page.has_next(),
                    has_previous: page.has_previous(),
                };
                let total_rows = page.total_rows();
                Self {
                    message: message.into(),
                    data: records(&columns, page.into_items()),
                    total_rows,
                    columns: Some(columns),
                    pagination: Some(pagination),
                }
            }
        }
    }
}

/// Turns rows into JSON objects keyed by `columns`.
///
/// With duplicate column names the later cell wins; the key keeps the
/// position of its first occurrence.
pub fn records(columns: &[String], rows: Vec<Row>) -> Vec<Record> {
    rows.into_iter().map(|row| record(columns, row)).collect()
}

fn record(columns: &[String], row: Row) -> Record {
    columns
        .iter()
        .zip(row)
        .map(|(name, cell)| (name.clone(), cell.map_or(Value::Null, Value::String)))
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::table::paginate;

    fn table(n: usize) -> Table {
        Table::new(
            vec!["id".into(), "note".into()],
            (0..n)
                .map(|i| vec![Some(i.to_string()), (i % 2 == 0).then(|| "even".to_string())])
                .collect(),
        )
    }

    #[test]
    fn test_empty_body() {
        let body = serde_json::to_value(TableResponse::empty("No data")).unwrap();
        assert_eq!(body, json!({"message": "No data", "data": [], "total_rows": 0}));
    }

    #[test]
    fn test_table_body() {
        let body = serde_json::to_value(TableResponse::from_table("ok", table(2))).unwrap();
        assert_eq!(
            body,
            json!({
                "message": "ok",
                "columns": ["id", "note"],
                "data": [{"id": "0", "note": "even"}, {"id": "1", "note": null}],
                "total_rows": 2
            })
        );
    }

    #[test]
    fn test_paged_body() {
        let result = paginate(table(25), Some(3), Some(10));
        let body = serde_json::to_value(TableResponse::from_paged("page", result)).unwrap();

        assert_eq!(body["total_rows"], 25);
        assert_eq!(body["page"], 3);
        assert_eq!(body["page_size"], 10);
        assert_eq!(body["total_pages"], 3);
        assert_eq!(body["has_next"], false);
        assert_eq!(body["has_previous"], true);
        assert_eq!(body["data"].as_array().unwrap().len(), 5);
        assert_eq!(body["data"][0]["id"], "20");
    }

    #[test]
    fn test_unpaginated_result_has_no_pagination_fields() {
        let result = paginate(table(3), None, Some(10));
        let body = serde_json::to_value(TableResponse::from_paged("all", result)).unwrap();
        assert!(body.get("page").is_none());
        assert_eq!(body["total_rows"], 3);
    }

    #[test]
    fn test_duplicate_columns() {
        let columns = vec!["x".to_string(), "y".to_string(), "x".to_string()];
        let rows = vec![vec![Some("1".into()), Some("2".into()), Some("3".into())]];
        let out = records(&columns, rows);

        assert_eq!(out[0].len(), 2);
        assert_eq!(out[0]["x"], "3");
        assert_eq!(out[0].keys().collect::<Vec<_>>(), ["x", "y"]);
    }
}
