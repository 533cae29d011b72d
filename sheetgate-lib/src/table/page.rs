//! Page type and the pager.

use super::Row;
use super::Table;

/// One page of table rows with pagination information.
///
/// # Example
///
/// ```ignore
/// match paginate(table, Some(2), Some(50)) {
///     PagedResult::Paginated { page, .. } => {
///         println!("page {} of {}", page.page(), page.total_pages());
///         if page.has_next() {
///             println!("more rows follow");
///         }
///     }
///     PagedResult::Unpaginated(table) => println!("{} rows", table.len()),
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    items: Vec<Row>,
    page: u32,
    page_size: u32,
    total_rows: usize,
    total_pages: usize,
}

impl Page {
    /// Rows on this page.
    pub fn items(&self) -> &[Row] {
        &self.items
    }

    /// Consumes the page and returns its rows.
    pub fn into_items(self) -> Vec<Row> {
        self.items
    }

    /// 1-based page number, as requested.
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Requested page size.
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Number of rows in the whole table.
    pub fn total_rows(&self) -> usize {
        self.total_rows
    }

    /// Number of pages the table splits into.
    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    /// Returns `true` if a later page exists.
    pub fn has_next(&self) -> bool {
        (self.page as usize) < self.total_pages
    }

    /// Returns `true` if this is not the first page.
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// Returns `true` if this page has no rows.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of rows on this page.
    pub fn len(&self) -> usize {
        self.items.len()
    }
}

/// Output of [`paginate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PagedResult {
    /// No pagination was requested; the whole table.
    Unpaginated(Table),
    /// One page of the table.
    Paginated {
        /// Column names of the table the page was cut from.
        columns: Vec<String>,
        /// The page itself.
        page: Page,
    },
}

impl PagedResult {
    /// Column names.
    pub fn columns(&self) -> &[String] {
        match self {
            Self::Unpaginated(table) => table.columns(),
            Self::Paginated { columns, .. } => columns,
        }
    }

    /// Rows being returned.
    pub fn rows(&self) -> &[Row] {
        match self {
            Self::Unpaginated(table) => table.rows(),
            Self::Paginated { page, .. } => page.items(),
        }
    }

    /// Number of rows in the whole table, not just this page.
    pub fn total_rows(&self) -> usize {
        match self {
            Self::Unpaginated(table) => table.len(),
            Self::Paginated { page, .. } => page.total_rows(),
        }
    }

    /// The page, when pagination was requested.
    pub fn page(&self) -> Option<&Page> {
        match self {
            Self::Unpaginated(_) => None,
            Self::Paginated { page, .. } => Some(page),
        }
    }
}

/// Splits `table` into pages and returns the requested one.
///
/// Without both `page` and `page_size` the table is returned whole. A page
/// past the end is empty rather than an error. Callers validate
/// `page >= 1` and `1 <= page_size <= 1000`; out-of-range values still never
/// panic (a zero page size gives zero pages).
pub fn paginate(table: Table, page: Option<u32>, page_size: Option<u32>) -> PagedResult {
    let (page, page_size) = match (page, page_size) {
        (Some(page), Some(page_size)) => (page, page_size),
        _ => return PagedResult::Unpaginated(table),
    };

    let (columns, rows) = table.into_parts();
    let total_rows = rows.len();
    let size = page_size as usize;
    let total_pages = if size == 0 {
        0
    } else {
        total_rows.div_ceil(size)
    };

    let start = (page.saturating_sub(1) as usize)
        .saturating_mul(size)
        .min(total_rows);
    let end = start.saturating_add(size).min(total_rows);
    let items = rows.into_iter().skip(start).take(end - start).collect();

    PagedResult::Paginated {
        columns,
        page: Page {
            items,
            page,
            page_size,
            total_rows,
            total_pages,
        },
    }
}
