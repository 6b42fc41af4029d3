//! Job card (repair ticket) model and DTOs.

use std::borrow::Cow;

use repairdesk_core::job_status::JobStatus;
use repairdesk_core::listing::Listable;
use repairdesk_core::types::{DbId, Money, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::nullable;

/// A job card row from the `job_cards` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct JobCard {
    pub id: DbId,
    /// Customer-facing bill number; always equal to `id`.
    pub bill_no: i64,
    pub customer_name: String,
    pub mobile: String,
    pub address: Option<String>,
    pub model: String,
    pub complaint: String,
    pub power_on: bool,
    pub display_ok: bool,
    pub touch_ok: bool,
    pub water_damage: bool,
    pub battery_present: bool,
    pub sim_tray_present: bool,
    pub admission_fee: Money,
    pub estimate: Money,
    pub advance: Money,
    pub final_amount: Option<Money>,
    #[sqlx(try_from = "String")]
    pub status: JobStatus,
    pub created_by: DbId,
    pub customer_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Listable for JobCard {
    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Owned(self.bill_no.to_string()),
            Cow::Borrowed(&self.customer_name),
            Cow::Borrowed(&self.mobile),
            Cow::Borrowed(&self.model),
        ]
    }

    fn created_at(&self) -> Timestamp {
        self.created_at
    }

    fn sort_id(&self) -> i64 {
        self.id
    }

    fn job_status(&self) -> Option<JobStatus> {
        Some(self.status)
    }
}

/// DTO for creating a new job card.
///
/// Condition flags and amounts default to `false` / `0` when omitted. The
/// creating user comes from the session, never from the body.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateJobCard {
    pub customer_name: String,
    pub mobile: String,
    pub address: Option<String>,
    pub model: String,
    pub complaint: String,
    #[serde(default)]
    pub power_on: bool,
    #[serde(default)]
    pub display_ok: bool,
    #[serde(default)]
    pub touch_ok: bool,
    #[serde(default)]
    pub water_damage: bool,
    #[serde(default)]
    pub battery_present: bool,
    #[serde(default)]
    pub sim_tray_present: bool,
    #[serde(default)]
    pub admission_fee: Money,
    #[serde(default)]
    pub estimate: Money,
    #[serde(default)]
    pub advance: Money,
    pub final_amount: Option<Money>,
    /// Explicit customer link. When absent the card is linked by mobile.
    pub customer_id: Option<DbId>,
}

/// DTO for updating an existing job card. All fields are optional.
///
/// `status` is accepted as text and validated by the handler so an invalid
/// value produces an error naming it. `address` and `final_amount` are
/// nullable columns: an absent field keeps the stored value, an explicit
/// `null` clears it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateJobCard {
    pub customer_name: Option<String>,
    pub mobile: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub address: Option<Option<String>>,
    pub model: Option<String>,
    pub complaint: Option<String>,
    pub power_on: Option<bool>,
    pub display_ok: Option<bool>,
    pub touch_ok: Option<bool>,
    pub water_damage: Option<bool>,
    pub battery_present: Option<bool>,
    pub sim_tray_present: Option<bool>,
    pub admission_fee: Option<Money>,
    pub estimate: Option<Money>,
    pub advance: Option<Money>,
    #[serde(default, deserialize_with = "nullable")]
    pub final_amount: Option<Option<Money>>,
    pub status: Option<String>,
}

/// Request body for `PATCH /job-cards/{id}/status`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateJobStatus {
    pub status: String,
}

/// Job card counts per status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusSummary {
    pub pending: i64,
    pub in_progress: i64,
    pub completed: i64,
    pub total: i64,
}

impl StatusSummary {
    /// Fold `(status, count)` rows into a summary.
    pub fn from_counts<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (JobStatus, i64)>,
    {
        rows.into_iter()
            .fold(Self::default(), |mut summary, (status, count)| {
                match status {
                    JobStatus::Pending => summary.pending += count,
                    JobStatus::InProgress => summary.in_progress += count,
                    JobStatus::Completed => summary.completed += count,
                }
                summary.total += count;
                summary
            })
    }
}
