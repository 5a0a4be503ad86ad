//! Business logic services for the Stock Ledger

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

pub mod auth;
pub mod category;
pub mod counterparty;
pub mod operation;
pub mod operation_group;
pub mod product;
pub mod stock;

pub use auth::AuthService;
pub use category::CategoryService;
pub use counterparty::CounterpartyService;
pub use operation::OperationService;
pub use operation_group::OperationGroupService;
pub use product::ProductService;
pub use stock::StockService;

/// Rows removed by a delete, including everything the cascade took with it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletionSummary {
    pub deleted: &'static str,
    pub id: Uuid,
    pub cascaded: Vec<CascadeCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CascadeCount {
    pub entity: &'static str,
    pub count: i64,
}

impl DeletionSummary {
    pub fn new(deleted: &'static str, id: Uuid) -> Self {
        Self {
            deleted,
            id,
            cascaded: Vec::new(),
        }
    }

    pub fn cascaded(mut self, entity: &'static str, count: i64) -> Self {
        self.cascaded.push(CascadeCount { entity, count });
        self
    }
}

/// Deserialize a field that distinguishes "absent" from an explicit `null`.
///
/// Use with `#[serde(default, deserialize_with = "nullable")]` on an
/// `Option<Option<T>>`: absent stays `None`, `null` becomes `Some(None)`.
pub(crate) fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Trim optional text, mapping blank to `None`
pub(crate) fn clean_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "nullable")]
        phone: Option<Option<String>>,
    }

    #[test]
    fn test_nullable_distinguishes_absent_and_null() {
        let absent: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.phone, None);

        let null: Patch = serde_json::from_str(r#"{"phone": null}"#).unwrap();
        assert_eq!(null.phone, Some(None));

        let set: Patch = serde_json::from_str(r#"{"phone": "123-45"}"#).unwrap();
        assert_eq!(set.phone, Some(Some("123-45".to_string())));
    }

    #[test]
    fn test_clean_text() {
        assert_eq!(clean_text(Some("  ".into())), None);
        assert_eq!(clean_text(Some(" ООО Ромашка ".into())), Some("ООО Ромашка".into()));
        assert_eq!(clean_text(None), None);
    }

    #[test]
    fn test_deletion_summary_builder() {
        let id = Uuid::new_v4();
        let summary = DeletionSummary::new("category", id)
            .cascaded("product", 2)
            .cascaded("operation", 5);
        assert_eq!(summary.cascaded.len(), 2);
        assert_eq!(summary.cascaded[1], CascadeCount { entity: "operation", count: 5 });
    }
}
