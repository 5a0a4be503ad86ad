//! Domain models for the Stock Ledger

mod category;
mod counterparty;
mod operation;
mod product;
mod user;

pub use category::*;
pub use counterparty::*;
pub use operation::*;
pub use product::*;
pub use user::*;
