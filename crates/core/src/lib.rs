//! Domain logic for the repair-desk service.
//!
//! Nothing in this crate touches the network or the database, so the same
//! rules apply to the SQL-backed repositories and to in-memory callers.

pub mod error;
pub mod job_status;
pub mod listing;
pub mod mobile;
pub mod types;
pub mod validation;
