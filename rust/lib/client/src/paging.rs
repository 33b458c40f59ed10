//! Offset pagination over a table.
//!
//! Hosted PostgREST caps the rows returned per request, so full-table reads
//! walk the table in fixed-size pages ordered by a stable key.

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::ApiError;

/// Default rows per page.
pub const DEFAULT_PAGE_SIZE: usize = 1000;

/// One page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest<'a> {
    pub table: &'a str,
    /// PostgREST `select` list, e.g. `"id,product_id,batch_number"`.
    pub columns: &'a str,
    /// PostgREST `order` clause, e.g. `"id.asc"`.
    pub order: &'a str,
    pub offset: usize,
    pub limit: usize,
}

/// Rows of one page plus the server-reported total, when known.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub rows: Vec<T>,
    pub total: Option<usize>,
}

/// Anything that can serve one page of a table.
#[async_trait::async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page<T>(&self, request: &PageRequest<'_>) -> Result<Page<T>, ApiError>
    where
        T: DeserializeOwned + Send;
}

/// Read a whole table page by page.
///
/// When the server reports a total, paging continues until that many rows
/// have been read, since the server may cap a page below `page_size`.
/// Without a total, a short page ends the read. An empty page always does.
/// Any page failure aborts the read; there are no retries.
pub async fn fetch_all<S, T>(
    source: &S,
    table: &str,
    columns: &str,
    page_size: usize,
) -> Result<Vec<T>, ApiError>
where
    S: PageSource + ?Sized,
    T: DeserializeOwned + Send,
{
    let page_size = page_size.max(1);
    let mut rows = Vec::new();
    let mut offset = 0;

    loop {
        let request = PageRequest {
            table,
            columns,
            order: "id.asc",
            offset,
            limit: page_size,
        };
        let page: Page<T> = source.fetch_page(&request).await?;
        let fetched = page.rows.len();
        debug!(table, offset, fetched, total = ?page.total, "fetched page");

        rows.extend(page.rows);
        offset += fetched;

        if fetched == 0 {
            break;
        }
        match page.total {
            Some(total) if offset >= total => break,
            Some(_) => {}
            None if fetched < page_size => break,
            None => {}
        }
    }

    Ok(rows)
}

/// Parse the total out of a `Content-Range` header (`0-999/4213`, `*/0`).
pub fn parse_content_range_total(header: &str) -> Option<usize> {
    header
        .rsplit_once('/')
        .and_then(|(_, total)| total.trim().parse().ok())
}
