pub mod auth;
pub mod customer;
pub mod job_card;
pub mod user;
