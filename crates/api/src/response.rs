//! Response envelope for list payloads that are not paged.
//!
//! Paged lists use `repairdesk_core::listing::Page`, which carries the same
//! `data` key plus pagination metadata.

use serde::Serialize;

/// `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
