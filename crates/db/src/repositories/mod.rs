//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod customer_repo;
pub mod job_card_repo;
pub mod session_repo;
pub mod user_repo;

pub use customer_repo::CustomerRepo;
pub use job_card_repo::JobCardRepo;
pub use session_repo::SessionRepo;
pub use user_repo::UserRepo;
