//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- Session token generation, validation, and refresh-token helpers.
//! - [`cookie`] -- The HttpOnly cookie that carries the session token.

pub mod cookie;
pub mod jwt;
pub mod password;
