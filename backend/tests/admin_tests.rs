//! Admin interface tests
//!
//! Unit and property-based tests for:
//! - Every entity is registered and reachable by slug
//! - Read-only and computed fields are rejected in payloads
//! - Form payloads deserialize into service inputs and validate

use proptest::prelude::*;
use serde_json::json;
use stock_ledger::admin::{self, ModelAdmin};
use stock_ledger::error::AppError;
use stock_ledger::services::category::CreateCategoryInput;
use stock_ledger::services::counterparty::{CreateCounterpartyInput, UpdateCounterpartyInput};
use stock_ledger::services::operation::CreateOperationInput;
use stock_ledger::services::operation_group::CreateOperationGroupInput;
use stock_ledger::services::product::{CreateProductInput, UpdateProductInput};
use validator::Validate;

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;
    use shared::Action;

    #[test]
    fn test_registry_covers_every_entity() {
        let slugs: Vec<_> = admin::REGISTRY.iter().map(|a| a.slug).collect();
        assert_eq!(
            slugs,
            ["categories", "products", "counterparties", "operation-groups", "operations"]
        );
        for slug in slugs {
            assert!(admin::find(slug).is_some());
        }
    }

    #[test]
    fn test_list_columns_match_admin_configuration() {
        assert!(admin::PRODUCT.list_display.contains(&"thumbnail"));
        assert!(admin::PRODUCT.list_display.contains(&"remaining"));
        assert!(admin::OPERATION_GROUP.list_display.contains(&"total_quantity"));
        assert!(admin::OPERATION_GROUP.list_display.contains(&"total_amount"));
        assert!(admin::OPERATION.list_display.contains(&"amount"));
        assert_eq!(admin::COUNTERPARTY.search_fields, ["full_name", "phone", "company_name"]);
    }

    #[test]
    fn test_create_product_form() {
        let category_id = uuid::Uuid::new_v4();
        let input: CreateProductInput = admin::PRODUCT
            .parse_form(json!({
                "category_id": category_id,
                "name": "Чайник",
                "image": "products/kettle.png"
            }))
            .unwrap();
        assert_eq!(input.category_id, category_id);
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_create_product_rejects_created_by() {
        let err = admin::PRODUCT
            .parse_form::<CreateProductInput>(json!({
                "category_id": uuid::Uuid::new_v4(),
                "name": "Kettle",
                "created_by": uuid::Uuid::new_v4()
            }))
            .unwrap_err();
        assert!(matches!(err, AppError::ReadOnlyField(field) if field == "created_by"));
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let err = admin::CATEGORY
            .parse_form::<CreateCategoryInput>(json!({"name": "Tea", "colour": "green"}))
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[test]
    fn test_image_outside_products_dir_is_invalid() {
        let input: UpdateProductInput = admin::PRODUCT
            .parse_form(json!({"image": "../etc/passwd"}))
            .unwrap();
        let err = AppError::from(input.validate().unwrap_err());
        assert!(matches!(err, AppError::Validation { field, .. } if field == "image"));
    }

    #[test]
    fn test_update_counterparty_null_clears_phone() {
        let input: UpdateCounterpartyInput = admin::COUNTERPARTY
            .parse_form(json!({"phone": null}))
            .unwrap();
        assert_eq!(input.phone, Some(None));
        assert_eq!(input.company_name, None);
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_counterparty_company_name_length() {
        let input: CreateCounterpartyInput = admin::COUNTERPARTY
            .parse_form(json!({"full_name": "Иван Петров", "company_name": "x".repeat(201)}))
            .unwrap();
        let err = AppError::from(input.validate().unwrap_err());
        assert!(matches!(err, AppError::Validation { field, .. } if field == "company_name"));

        let update: UpdateCounterpartyInput = admin::COUNTERPARTY
            .parse_form(json!({"company_name": "x".repeat(201)}))
            .unwrap();
        assert!(update.validate().is_err());

        let fits: CreateCounterpartyInput = admin::COUNTERPARTY
            .parse_form(json!({"full_name": "Иван Петров", "company_name": "x".repeat(200)}))
            .unwrap();
        assert!(fits.validate().is_ok());
    }

    #[test]
    fn test_counterparty_phone_validated() {
        let input: CreateCounterpartyInput = admin::COUNTERPARTY
            .parse_form(json!({"full_name": "Иван Петров", "phone": "call me"}))
            .unwrap();
        let err = AppError::from(input.validate().unwrap_err());
        assert!(matches!(err, AppError::Validation { field, .. } if field == "phone"));
    }

    #[test]
    fn test_operation_amount_is_not_writable() {
        let err = admin::OPERATION
            .parse_form::<CreateOperationInput>(json!({
                "group_id": uuid::Uuid::new_v4(),
                "product_id": uuid::Uuid::new_v4(),
                "quantity": 1,
                "price": "10.00",
                "amount": "10.00"
            }))
            .unwrap_err();
        assert!(matches!(err, AppError::ReadOnlyField(field) if field == "amount"));
    }

    #[test]
    fn test_operation_quantity_must_be_positive() {
        let input: CreateOperationInput = admin::OPERATION
            .parse_form(json!({
                "group_id": uuid::Uuid::new_v4(),
                "product_id": uuid::Uuid::new_v4(),
                "quantity": 0,
                "price": "10.00"
            }))
            .unwrap();
        let err = AppError::from(input.validate().unwrap_err());
        assert!(matches!(err, AppError::Validation { field, .. } if field == "quantity"));
    }

    #[test]
    fn test_group_form_with_inline_operations() {
        let input: CreateOperationGroupInput = admin::OPERATION_GROUP
            .parse_form(json!({
                "counterparty_id": uuid::Uuid::new_v4(),
                "action": "credit",
                "operations": [
                    {"product_id": uuid::Uuid::new_v4(), "quantity": 3, "price": "5.00"},
                    {"product_id": uuid::Uuid::new_v4(), "quantity": 1, "price": "9.99", "discount": "10"}
                ]
            }))
            .unwrap();
        assert_eq!(input.action, Action::Credit);
        assert_eq!(input.operations.len(), 2);
        assert!(input.operations.iter().all(|line| line.validate().is_ok()));
    }

    #[test]
    fn test_group_action_must_be_known() {
        let err = admin::OPERATION_GROUP
            .parse_form::<CreateOperationGroupInput>(json!({
                "counterparty_id": uuid::Uuid::new_v4(),
                "action": "sale"
            }))
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn entity_strategy() -> impl Strategy<Value = &'static ModelAdmin> {
        prop::sample::select(admin::REGISTRY.to_vec())
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Any payload naming a read-only field is rejected with that field
        #[test]
        fn prop_readonly_field_rejected(
            admin in entity_strategy(),
            index in any::<prop::sample::Index>()
        ) {
            let field = *index.get(admin.readonly_fields);
            let mut form = serde_json::Map::new();
            form.insert(field.to_string(), json!("x"));
            let payload = serde_json::Value::Object(form);
            let err = admin.ensure_writable(&payload).unwrap_err();
            prop_assert!(matches!(err, AppError::ReadOnlyField(f) if f == field));
        }

        /// Search patterns always match literally
        #[test]
        fn prop_search_pattern_is_wrapped(q in "[a-zа-я0-9%_ ]{1,20}") {
            match admin::search_pattern(Some(&q)) {
                Some(pattern) => {
                    prop_assert!(pattern.starts_with('%'));
                    prop_assert!(pattern.ends_with('%'));
                    let inner = &pattern[1..pattern.len() - 1];
                    prop_assert_eq!(inner.matches("\\%").count(), q.trim().matches('%').count());
                }
                None => prop_assert!(q.trim().is_empty()),
            }
        }
    }
}
