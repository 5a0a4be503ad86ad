//! Customers and suppliers

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::audit::AuditFields;

/// A customer or supplier that operation groups are booked against
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Counterparty {
    pub id: Uuid,
    pub full_name: String,
    pub phone: Option<String>,
    pub company_name: Option<String>,
    #[serde(flatten)]
    #[cfg_attr(feature = "sqlx", sqlx(flatten))]
    pub audit: AuditFields,
}

impl std::fmt::Display for Counterparty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.company_name.as_deref().filter(|c| !c.is_empty()) {
            Some(company) => write!(f, "{} ({})", self.full_name, company),
            None => f.write_str(&self.full_name),
        }
    }
}
