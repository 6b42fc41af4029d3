//! Customer model and DTOs.

use repairdesk_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::nullable;

/// A customer row from the `customers` table plus its derived visit count.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Customer {
    pub id: DbId,
    pub name: String,
    pub mobile: String,
    pub address: Option<String>,
    pub national_id: Option<String>,
    /// Job cards linked to this customer by id or sharing its mobile.
    /// Computed on every read; never stored.
    pub visit_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new customer.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCustomer {
    pub name: String,
    pub mobile: String,
    pub address: Option<String>,
    pub national_id: Option<String>,
}

/// DTO for updating an existing customer. All fields are optional.
///
/// For `address` and `national_id` an explicit `null` clears the value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCustomer {
    pub name: Option<String>,
    pub mobile: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub address: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub national_id: Option<Option<String>>,
}

/// One line of the visit-count report.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct VisitCount {
    pub customer_id: DbId,
    pub name: String,
    pub mobile: String,
    pub visit_count: i64,
}
