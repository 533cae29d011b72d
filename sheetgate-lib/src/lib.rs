//! Spreadsheet tables over HTTP
//!
//! Reads a worksheet from Google Sheets, cuts a header-anchored window out
//! of its raw cell grid, and shapes the result (optionally paginated) into
//! JSON response bodies.

pub mod auth;
pub mod diagnostics;
pub mod error;
pub mod response;
pub mod source;
pub mod table;

mod worksheet;

#[cfg(test)]
mod testing;

pub use worksheet::load_table;
