//! Database models for the Stock Ledger
//!
//! Re-exports the shared domain models; the backend reads them straight
//! from Postgres through the `sqlx` feature of the shared crate.

pub use shared::models::*;
