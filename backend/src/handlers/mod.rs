//! HTTP handlers for the Stock Ledger admin API

use serde::Deserialize;
use shared::Pagination;

pub mod admin;
pub mod auth;
pub mod category;
pub mod counterparty;
pub mod health;
pub mod operation;
pub mod operation_group;
pub mod product;

pub use admin::*;
pub use auth::*;
pub use category::*;
pub use counterparty::*;
pub use health::*;
pub use operation::*;
pub use operation_group::*;
pub use product::*;

/// Query string shared by list endpoints without extra filters
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub q: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl ListQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination::from_query(self.page, self.per_page)
    }
}
