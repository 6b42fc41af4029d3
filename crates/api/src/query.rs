//! Shared query parameter types for list endpoints.

use repairdesk_core::error::CoreError;
use repairdesk_core::job_status::StatusFilter;
use repairdesk_core::listing::{normalize_search, ListQuery, PageRequest};
use serde::Deserialize;

/// `?search=&status=&page=&pageSize=&limit=`
///
/// Numbers are taken as raw strings so that garbage falls back to the
/// defaults instead of failing extraction. `pageSize` also accepts
/// `page_size`; `limit` is used when `pageSize` is absent or not a number.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
    pub status: Option<String>,
    pub page: Option<String>,
    #[serde(rename = "pageSize", alias = "page_size")]
    pub page_size: Option<String>,
    pub limit: Option<String>,
}

impl ListParams {
    /// Page and page size, defaulted and clamped.
    pub fn page_request(&self) -> PageRequest {
        let size = [self.page_size.as_deref(), self.limit.as_deref()]
            .into_iter()
            .flatten()
            .find(|raw| raw.trim().parse::<i64>().is_ok());
        PageRequest::from_raw(self.page.as_deref(), size)
    }

    /// Full list query. Fails with `InvalidStatus` for an unknown status filter.
    pub fn list_query(&self) -> Result<ListQuery, CoreError> {
        Ok(ListQuery {
            search: normalize_search(self.search.as_deref()),
            status: StatusFilter::parse(self.status.as_deref())?,
            page: self.page_request(),
        })
    }
}
