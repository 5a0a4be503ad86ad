//! Shared types and models for the Stock Ledger
//!
//! This crate contains the domain model and the ledger arithmetic shared
//! between the backend, the admin front-end (via WASM), and the tests.

pub mod audit;
pub mod ledger;
pub mod models;
pub mod types;
pub mod validation;

pub use audit::*;
pub use ledger::*;
pub use models::*;
pub use types::*;
pub use validation::*;
