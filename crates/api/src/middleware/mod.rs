//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- The signed-in operator (Bearer token or session cookie).
//! - [`rbac::RequireAdmin`] -- Requires an admin operator.

pub mod auth;
pub mod rbac;
