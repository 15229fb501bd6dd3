//! Page/limit handling shared by every list endpoint.

use std::future::Future;

use serde::Serialize;

/// Page size used when the client sends none or an invalid one.
pub const DEFAULT_LIMIT: i64 = 10;

/// First page number.
pub const DEFAULT_PAGE: i64 = 1;

/// A normalized page request. `limit` and `page` are always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    limit: i64,
    page: i64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            page: DEFAULT_PAGE,
        }
    }
}

impl PageRequest {
    /// Build a request, replacing values below 1 with the defaults.
    pub fn new(limit: i64, page: i64) -> Self {
        Self {
            limit: if limit < 1 { DEFAULT_LIMIT } else { limit },
            page: if page < 1 { DEFAULT_PAGE } else { page },
        }
    }

    /// Build a request from raw query-string values.
    ///
    /// Missing or unparsable values fall back to the defaults.
    pub fn from_query(limit: Option<&str>, page: Option<&str>) -> Self {
        let parse = |raw: Option<&str>| raw.and_then(|v| v.trim().parse::<i64>().ok()).unwrap_or(0);
        Self::new(parse(limit), parse(page))
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    /// Rows to skip before this page.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

/// Pagination metadata reported with every page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub limit: i64,
    pub page: i64,
    /// Number of rows on this page.
    pub show: usize,
    pub total: i64,
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub info: PageInfo,
}

impl<T> Page<T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Fetch one page given the total row count.
///
/// When the offset is at or past `total` the fetch is skipped and an empty
/// page is returned.
pub async fn paginate<T, E, F, Fut>(
    request: PageRequest,
    total: i64,
    fetch: F,
) -> Result<Page<T>, E>
where
    F: FnOnce(i64, i64) -> Fut,
    Fut: Future<Output = Result<Vec<T>, E>>,
{
    let offset = request.offset();
    let items = if offset < total {
        fetch(request.limit(), offset).await?
    } else {
        Vec::new()
    };

    Ok(Page {
        info: PageInfo {
            limit: request.limit(),
            page: request.page(),
            show: items.len(),
            total,
        },
        items,
    })
}
