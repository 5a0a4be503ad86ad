//! Registered entities

use shared::Label;

use super::{Fieldset, ListFilter, ModelAdmin};

const AUDIT_READONLY: &[&str] = &["created_at", "updated_at", "created_by", "updated_by"];

const AUDIT_FIELDSET: Fieldset = Fieldset {
    title: Some(Label::new("History", "История")),
    fields: &["created_at", "created_by", "updated_at", "updated_by"],
};

const NEWEST_FIRST: &[&str] = &["-created_at", "-id"];

pub static CATEGORY: ModelAdmin = ModelAdmin {
    slug: "categories",
    verbose_name: Label::new("Category", "Категория"),
    verbose_name_plural: Label::new("Categories", "Категории"),
    list_display: &["name", "created_at"],
    search_fields: &["name"],
    list_filter: &[],
    readonly_fields: &["created_at", "updated_at"],
    fieldsets: &[
        Fieldset {
            title: None,
            fields: &["name"],
        },
        Fieldset {
            title: Some(Label::new("History", "История")),
            fields: &["created_at", "updated_at"],
        },
    ],
    ordering: NEWEST_FIRST,
};

pub static PRODUCT: ModelAdmin = ModelAdmin {
    slug: "products",
    verbose_name: Label::new("Product", "Продукт"),
    verbose_name_plural: Label::new("Products", "Продукты"),
    list_display: &["thumbnail", "name", "category", "remaining", "created_at"],
    search_fields: &["name", "description"],
    list_filter: &[ListFilter {
        field: "category",
        param: "category_id",
    }],
    readonly_fields: &[
        "created_at",
        "updated_at",
        "created_by",
        "updated_by",
        "remaining",
        "thumbnail",
    ],
    fieldsets: &[
        Fieldset {
            title: None,
            fields: &["category_id", "name", "description", "image"],
        },
        AUDIT_FIELDSET,
    ],
    ordering: NEWEST_FIRST,
};

pub static COUNTERPARTY: ModelAdmin = ModelAdmin {
    slug: "counterparties",
    verbose_name: Label::new("Counterparty", "Контрагент"),
    verbose_name_plural: Label::new("Counterparties", "Контрагенты"),
    list_display: &["full_name", "phone", "company_name", "created_at"],
    search_fields: &["full_name", "phone", "company_name"],
    list_filter: &[],
    readonly_fields: AUDIT_READONLY,
    fieldsets: &[
        Fieldset {
            title: None,
            fields: &["full_name", "phone", "company_name"],
        },
        AUDIT_FIELDSET,
    ],
    ordering: NEWEST_FIRST,
};

pub static OPERATION_GROUP: ModelAdmin = ModelAdmin {
    slug: "operation-groups",
    verbose_name: Label::new("Operation group", "Группа операций"),
    verbose_name_plural: Label::new("Operation groups", "Группы операций"),
    list_display: &[
        "counterparty",
        "action",
        "total_quantity",
        "total_amount",
        "created_at",
    ],
    search_fields: &["comment", "counterparty__full_name"],
    list_filter: &[
        ListFilter {
            field: "action",
            param: "action",
        },
        ListFilter {
            field: "counterparty",
            param: "counterparty_id",
        },
    ],
    readonly_fields: &[
        "created_at",
        "updated_at",
        "created_by",
        "updated_by",
        "total_quantity",
        "total_amount",
    ],
    fieldsets: &[
        Fieldset {
            title: None,
            fields: &["counterparty_id", "action", "comment", "operations"],
        },
        Fieldset {
            title: Some(Label::new("Totals", "Итого")),
            fields: &["total_quantity", "total_amount"],
        },
        AUDIT_FIELDSET,
    ],
    ordering: NEWEST_FIRST,
};

pub static OPERATION: ModelAdmin = ModelAdmin {
    slug: "operations",
    verbose_name: Label::new("Operation", "Операция"),
    verbose_name_plural: Label::new("Operations", "Операции"),
    list_display: &[
        "product",
        "group",
        "action",
        "quantity",
        "price",
        "discount",
        "amount",
        "created_at",
    ],
    search_fields: &["product__name"],
    list_filter: &[
        ListFilter {
            field: "product",
            param: "product_id",
        },
        ListFilter {
            field: "group",
            param: "group_id",
        },
        ListFilter {
            field: "group__action",
            param: "action",
        },
    ],
    readonly_fields: &[
        "created_at",
        "updated_at",
        "created_by",
        "updated_by",
        "amount",
        "action",
    ],
    fieldsets: &[
        Fieldset {
            title: None,
            fields: &["group_id", "product_id", "quantity", "price", "discount", "amount"],
        },
        AUDIT_FIELDSET,
    ],
    ordering: NEWEST_FIRST,
};

/// All registered entities, in admin index order
pub static REGISTRY: [&ModelAdmin; 5] = [
    &CATEGORY,
    &PRODUCT,
    &COUNTERPARTY,
    &OPERATION_GROUP,
    &OPERATION,
];

/// Look up an entity by its URL slug
pub fn find(slug: &str) -> Option<&'static ModelAdmin> {
    REGISTRY.iter().copied().find(|admin| admin.slug == slug)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_by_slug() {
        assert_eq!(find("products").map(|a| a.slug), Some("products"));
        assert_eq!(find("operation-groups").map(|a| a.slug), Some("operation-groups"));
        assert!(find("users").is_none());
    }

    #[test]
    fn test_audit_fields_readonly_everywhere() {
        for admin in REGISTRY {
            assert!(admin.is_readonly("created_at"), "{}", admin.slug);
            assert!(admin.is_readonly("updated_at"), "{}", admin.slug);
        }
        for admin in [&PRODUCT, &COUNTERPARTY, &OPERATION_GROUP, &OPERATION] {
            for field in shared::AUDIT_FIELD_NAMES {
                assert!(admin.is_readonly(field), "{}.{}", admin.slug, field);
            }
        }
    }

    #[test]
    fn test_readonly_fields_appear_on_form() {
        for admin in REGISTRY {
            let form: Vec<_> = admin.form_fields().collect();
            for field in admin.readonly_fields {
                if matches!(*field, "remaining" | "thumbnail" | "action") {
                    continue; // list-only columns
                }
                assert!(form.contains(field), "{} missing {}", admin.slug, field);
            }
        }
    }
}
