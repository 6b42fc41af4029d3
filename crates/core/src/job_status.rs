//! Job card status values and the status filter used by list endpoints.
//!
//! Statuses are stored as text in the `job_cards.status` column (guarded by a
//! CHECK constraint) and serialized in their canonical kebab-case form.
//! Transitions are unconstrained: any status may move to any other status.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::CoreError;

/// Device received, work not started.
pub const STATUS_PENDING: &str = "pending";

/// Repair under way.
pub const STATUS_IN_PROGRESS: &str = "in-progress";

/// Repair finished (device may or may not have been collected).
pub const STATUS_COMPLETED: &str = "completed";

/// All valid status values, in display order.
pub const VALID_STATUSES: &[&str] = &[STATUS_PENDING, STATUS_IN_PROGRESS, STATUS_COMPLETED];

/// Filter value meaning "do not filter by status".
pub const FILTER_ALL: &str = "all";

/// Lifecycle status of a job card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum JobStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl JobStatus {
    /// Canonical string form, as stored in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Pending => STATUS_PENDING,
            JobStatus::InProgress => STATUS_IN_PROGRESS,
            JobStatus::Completed => STATUS_COMPLETED,
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses a status, ignoring surrounding whitespace and ASCII case.
///
/// The error carries the original input so responses can name it.
impl FromStr for JobStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            STATUS_PENDING => Ok(JobStatus::Pending),
            STATUS_IN_PROGRESS => Ok(JobStatus::InProgress),
            STATUS_COMPLETED => Ok(JobStatus::Completed),
            _ => Err(CoreError::InvalidStatus(s.to_string())),
        }
    }
}

impl TryFrom<String> for JobStatus {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Status filter for list endpoints: everything, or exactly one status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(JobStatus),
}

impl StatusFilter {
    /// Parse an optional query-string value. Missing or blank means [`StatusFilter::All`].
    pub fn parse(raw: Option<&str>) -> Result<Self, CoreError> {
        match raw.map(str::trim) {
            None | Some("") => Ok(StatusFilter::All),
            Some(value) if value.eq_ignore_ascii_case(FILTER_ALL) => Ok(StatusFilter::All),
            Some(value) => value.parse().map(StatusFilter::Only),
        }
    }

    /// Whether a record with `status` passes this filter.
    pub fn matches(self, status: JobStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => wanted == status,
        }
    }

    /// The status to bind into a SQL `WHERE` clause, if any.
    pub fn as_status(self) -> Option<JobStatus> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Only(status) => Some(status),
        }
    }
}
