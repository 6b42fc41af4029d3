//! Search, status filtering and pagination for list views.
//!
//! The repositories apply these rules in SQL; [`list_page`] applies them to a
//! collection that is already in memory. Both share [`PageRequest`] so page
//! parsing, clamping and page counts behave identically.

use std::borrow::Cow;

use serde::Serialize;

use crate::job_status::{JobStatus, StatusFilter};
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Pagination defaults
// ---------------------------------------------------------------------------

/// Page size used when the caller supplies none (or garbage).
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Largest page size a caller may request.
pub const MAX_PAGE_SIZE: i64 = 100;

// ---------------------------------------------------------------------------
// Page request
// ---------------------------------------------------------------------------

/// A validated 1-based page number and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub page_size: i64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Build a request from numeric values, clamping the page to `>= 1` and
    /// the size to `1..=MAX_PAGE_SIZE`.
    pub fn new(page: i64, page_size: i64) -> Self {
        Self {
            page: page.max(1),
            page_size: clamp_page_size(Some(page_size)),
        }
    }

    /// Build a request from raw query-string values.
    ///
    /// Missing or non-numeric values fall back to page 1 and
    /// [`DEFAULT_PAGE_SIZE`].
    pub fn from_raw(page: Option<&str>, page_size: Option<&str>) -> Self {
        let page = parse_number(page).unwrap_or(1);
        let page_size = clamp_page_size(parse_number(page_size));
        Self {
            page: page.max(1),
            page_size,
        }
    }

    /// Number of rows to skip.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    /// Clamp to page 1 when the page lies beyond the last page for `total` rows.
    pub fn within(self, total: i64) -> Self {
        if self.page > total_pages(total, self.page_size) {
            Self { page: 1, ..self }
        } else {
            self
        }
    }
}

fn parse_number(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
}

/// Clamp a user-provided page size to valid bounds.
pub fn clamp_page_size(page_size: Option<i64>) -> i64 {
    page_size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE)
}

/// `ceil(total / page_size)`; zero rows means zero pages.
pub fn total_pages(total: i64, page_size: i64) -> i64 {
    if total <= 0 {
        return 0;
    }
    let size = page_size.max(1);
    (total + size - 1) / size
}

// ---------------------------------------------------------------------------
// Response envelope
// ---------------------------------------------------------------------------

/// Count metadata for a pagination control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub page: i64,
    pub page_size: i64,
    /// Rows matching the search and filters, across all pages.
    pub total: i64,
    pub total_pages: i64,
    /// 1-based position of the first row on this page (0 when empty).
    pub from: i64,
    /// 1-based position of the last row on this page (0 when empty).
    pub to: i64,
}

impl PageInfo {
    /// Describe `len` rows returned for `request` out of `total`.
    pub fn new(request: PageRequest, total: i64, len: usize) -> Self {
        let len = len as i64;
        let (from, to) = if len == 0 {
            (0, 0)
        } else {
            let from = request.offset() + 1;
            (from, from + len - 1)
        };
        Self {
            page: request.page,
            page_size: request.page_size,
            total,
            total_pages: total_pages(total, request.page_size),
            from,
            to,
        }
    }
}

/// `{ "data": [...], "pagination": {...} }` response envelope.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub pagination: PageInfo,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, request: PageRequest, total: i64) -> Self {
        let pagination = PageInfo::new(request, total, data.len());
        Self { data, pagination }
    }
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// Normalize a search term: trimmed, `None` when blank.
pub fn normalize_search(search: Option<&str>) -> Option<String> {
    search
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Build an `ILIKE` pattern matching `term` anywhere, with `\`, `%` and `_`
/// escaped so they match literally.
pub fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// A record that can be listed by [`list_page`].
pub trait Listable {
    /// Text fields searched by the free-text term.
    fn search_fields(&self) -> Vec<Cow<'_, str>>;

    /// Sort key; lists are newest first.
    fn created_at(&self) -> Timestamp;

    /// Tie-breaker for equal creation times; higher sorts first.
    fn sort_id(&self) -> i64;

    /// Status for the status filter. Records without one only pass `all`.
    fn job_status(&self) -> Option<JobStatus> {
        None
    }
}

/// Case-insensitive substring match of `needle` against any search field.
pub fn matches_search<T: Listable>(item: &T, needle: &str) -> bool {
    let needle = needle.to_lowercase();
    item.search_fields()
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Search, filter and page parameters for a list request.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub search: Option<String>,
    pub status: StatusFilter,
    pub page: PageRequest,
}

/// Filter, order (newest first) and slice an in-memory collection.
pub fn list_page<T: Listable>(items: Vec<T>, query: &ListQuery) -> Page<T> {
    let mut filtered: Vec<T> = items
        .into_iter()
        .filter(|item| match query.status {
            StatusFilter::All => true,
            filter => item.job_status().is_some_and(|s| filter.matches(s)),
        })
        .filter(|item| match query.search.as_deref() {
            Some(term) => matches_search(item, term),
            None => true,
        })
        .collect();

    filtered.sort_by(|a, b| {
        b.created_at()
            .cmp(&a.created_at())
            .then_with(|| b.sort_id().cmp(&a.sort_id()))
    });

    let total = filtered.len() as i64;
    let request = query.page.within(total);
    let data: Vec<T> = filtered
        .into_iter()
        .skip(request.offset() as usize)
        .take(request.page_size as usize)
        .collect();

    Page::new(data, request, total)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
