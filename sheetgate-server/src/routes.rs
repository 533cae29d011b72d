//! Request routing and handlers

use http_body_util::Full;
use hyper::Method;
use hyper::Request;
use hyper::Response;
use hyper::StatusCode;
use hyper::body::Bytes;
use hyper::header;
use hyper::header::HeaderMap;
use hyper::header::HeaderValue;
use hyper::http::request::Parts;
use serde_json::json;
use sheetgate_lib::error::Error;
use sheetgate_lib::load_table;
use sheetgate_lib::response::TableResponse;
use sheetgate_lib::source::SheetRef;
use sheetgate_lib::table::Table;
use sheetgate_lib::table::WindowSpec;
use sheetgate_lib::table::paginate;

use crate::error::RequestError;
use crate::query::PageQuery;
use crate::query::Query;
use crate::query::WorksheetQuery;
use crate::server::AppState;

/// Dispatches one request and renders the JSON response.
///
/// Request bodies are never read.
pub async fn route<B>(req: Request<B>, state: &AppState) -> Response<Full<Bytes>> {
    let (parts, _) = req.into_parts();

    let response = match dispatch(&parts, state).await {
        Ok(body) => json_response(StatusCode::OK, &body),
        Err(e) => json_response(e.status(), &e.body()),
    };

    log::info!(
        "{} {} -> {}",
        parts.method,
        parts.uri.path(),
        response.status().as_u16()
    );
    response
}

async fn dispatch(req: &Parts, state: &AppState) -> Result<serde_json::Value, RequestError> {
    let path = req.uri.path();
    let known = matches!(
        path,
        "/" | "/health" | "/data/worksheet" | "/data/budget_tracker/transactions"
    );
    if !known {
        return Err(RequestError::NotFound);
    }
    if req.method != Method::GET {
        return Err(RequestError::MethodNotAllowed);
    }

    match path {
        "/" => Ok(json!({"Hello": "World"})),
        "/health" => Ok(json!({"status": "healthy"})),
        "/data/worksheet" => {
            verify_api_key(&req.headers, state)?;
            let query = WorksheetQuery::from_query(Query::parse(req.uri.query()))?;
            let body = worksheet(query, state).await?;
            Ok(to_value(&body))
        }
        _ => {
            verify_api_key(&req.headers, state)?;
            let query = PageQuery::from_query(Query::parse(req.uri.query()))?;
            let body = transactions(query, state).await?;
            Ok(to_value(&body))
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// `GET /data/worksheet`
async fn worksheet(query: WorksheetQuery, state: &AppState) -> Result<TableResponse, RequestError> {
    let table = fetch(&query.sheet, query.window, state)
        .await
        .map_err(|e| RequestError::Upstream(format!("Error retrieving worksheet data: {}", e)))?;

    if table.is_empty() {
        return Ok(TableResponse::empty(
            "No data found or unable to retrieve data",
        ));
    }
    Ok(TableResponse::from_table("Data retrieved successfully", table))
}

/// `GET /data/budget_tracker/transactions`
async fn transactions(query: PageQuery, state: &AppState) -> Result<TableResponse, RequestError> {
    let table = fetch(&state.budget_sheet, WindowSpec::new(), state)
        .await
        .map_err(|e| RequestError::Upstream(format!("Error retrieving transactions: {}", e)))?;

    if table.is_empty() {
        return Ok(TableResponse::empty("No transactions found"));
    }

    let message = match (query.page, query.page_size) {
        (Some(_), Some(_)) => "Transactions retrieved successfully",
        _ => "All transactions retrieved successfully",
    };
    Ok(TableResponse::from_paged(
        message,
        paginate(table, query.page, query.page_size),
    ))
}

/// Acquires a fresh source and loads the table from it.
///
/// Only source acquisition can fail; fetch and window problems come back as
/// the empty table.
async fn fetch(
    sheet: &SheetRef,
    window: WindowSpec,
    state: &AppState,
) -> Result<Table, Error> {
    let source = state.connector.connect().await.inspect_err(|e| {
        log::error!("Failed to set up data source for {}: {}", sheet, e);
    })?;
    Ok(load_table(source.as_ref(), sheet, window, state.diagnostics.as_ref()).await)
}

// =============================================================================
// Helpers
// =============================================================================

/// Checks `Authorization: Bearer <key>` against the configured key.
fn verify_api_key(headers: &HeaderMap, state: &AppState) -> Result<(), RequestError> {
    let presented = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split_once(' '))
        .filter(|(scheme, token)| scheme.eq_ignore_ascii_case("bearer") && !token.is_empty())
        .map(|(_, token)| token.trim());

    let Some(presented) = presented else {
        return Err(RequestError::NotAuthenticated);
    };

    let expected = state
        .api_key
        .current()
        .ok_or(RequestError::ApiKeyNotConfigured)?;

    if presented != expected {
        return Err(RequestError::InvalidApiKey);
    }
    Ok(())
}

fn to_value(body: &TableResponse) -> serde_json::Value {
    serde_json::to_value(body).unwrap_or_else(|e| {
        log::error!("Failed to serialize response: {}", e);
        json!({"message": "Failed to serialize response", "data": [], "total_rows": 0})
    })
}

fn json_response(status: StatusCode, body: &serde_json::Value) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from(body.to_string())));
    *response.status_mut() = status;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    response
}
