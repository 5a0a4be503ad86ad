//! Administrative interface configuration
//!
//! One `ModelAdmin` per entity describes how the admin front-end lists,
//! searches, filters and edits it. The registry is fixed at compile time.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::error::{AppError, AppResult};
use shared::{join_media_url, Label};

mod registry;

pub use registry::*;

/// Edge length, in pixels, of product thumbnails in list views
pub const THUMBNAIL_SIZE: u32 = 64;

/// A titled block of fields on the edit form
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Fieldset {
    pub title: Option<Label>,
    pub fields: &'static [&'static str],
}

/// A field the list view can be filtered on, and the query key it uses
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ListFilter {
    pub field: &'static str,
    pub param: &'static str,
}

/// List/edit configuration of one entity
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ModelAdmin {
    /// Path segment of the entity under `/api/v1/admin`
    pub slug: &'static str,
    pub verbose_name: Label,
    pub verbose_name_plural: Label,
    pub list_display: &'static [&'static str],
    pub search_fields: &'static [&'static str],
    pub list_filter: &'static [ListFilter],
    pub readonly_fields: &'static [&'static str],
    pub fieldsets: &'static [Fieldset],
    pub ordering: &'static [&'static str],
}

impl ModelAdmin {
    pub fn is_readonly(&self, field: &str) -> bool {
        field == "id" || self.readonly_fields.contains(&field)
    }

    /// Reject a create/update payload that tries to write a read-only field
    pub fn ensure_writable(&self, payload: &Value) -> AppResult<()> {
        let object = payload.as_object().ok_or_else(|| {
            AppError::ValidationError("Request body must be a JSON object".to_string())
        })?;

        let mut readonly: Vec<&str> = object
            .keys()
            .map(String::as_str)
            .filter(|key| self.is_readonly(key))
            .collect();
        readonly.sort_unstable();

        match readonly.first() {
            Some(field) => Err(AppError::ReadOnlyField((*field).to_string())),
            None => Ok(()),
        }
    }

    /// Check read-only fields, then deserialize the form payload
    pub fn parse_form<T: DeserializeOwned>(&self, payload: Value) -> AppResult<T> {
        self.ensure_writable(&payload)?;
        serde_json::from_value(payload).map_err(|e| AppError::ValidationError(e.to_string()))
    }

    /// Every field appearing on the edit form
    pub fn form_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fieldsets.iter().flat_map(|fs| fs.fields.iter().copied())
    }
}

/// Thumbnail shown for a product image in list views
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Thumbnail {
    pub url: String,
    pub width: u32,
    pub height: u32,
}

impl Thumbnail {
    pub fn for_image(media_url: &str, image: Option<&str>) -> Option<Self> {
        image.filter(|path| !path.is_empty()).map(|path| Self {
            url: join_media_url(media_url, path),
            width: THUMBNAIL_SIZE,
            height: THUMBNAIL_SIZE,
        })
    }
}

/// Turn a free-text search into an `ILIKE` pattern, escaping wildcards
pub fn search_pattern(q: Option<&str>) -> Option<String> {
    let q = q.map(str::trim).filter(|q| !q.is_empty())?;
    let mut escaped = String::with_capacity(q.len() + 2);
    escaped.push('%');
    for c in q.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    Some(escaped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_search_pattern_escapes_wildcards() {
        assert_eq!(search_pattern(Some("50%_off")).as_deref(), Some("%50\\%\\_off%"));
        assert_eq!(search_pattern(Some("  чай ")).as_deref(), Some("%чай%"));
        assert_eq!(search_pattern(Some("   ")), None);
        assert_eq!(search_pattern(None), None);
    }

    #[test]
    fn test_ensure_writable_rejects_audit_fields() {
        let err = PRODUCT
            .ensure_writable(&json!({"name": "Kettle", "created_by": "someone"}))
            .unwrap_err();
        assert!(matches!(err, AppError::ReadOnlyField(f) if f == "created_by"));
    }

    #[test]
    fn test_ensure_writable_rejects_id_and_computed() {
        assert!(CATEGORY.ensure_writable(&json!({"id": "x"})).is_err());
        assert!(OPERATION.ensure_writable(&json!({"amount": "10"})).is_err());
        assert!(PRODUCT.ensure_writable(&json!({"remaining": 3})).is_err());
        assert!(OPERATION_GROUP
            .ensure_writable(&json!({"total_amount": "1"}))
            .is_err());
    }

    #[test]
    fn test_ensure_writable_accepts_form_fields() {
        assert!(COUNTERPARTY
            .ensure_writable(&json!({"full_name": "Иван", "phone": "+7 900 000 00 00"}))
            .is_ok());
        assert!(CATEGORY.ensure_writable(&json!([1, 2])).is_err());
    }

    #[test]
    fn test_thumbnail() {
        let thumb = Thumbnail::for_image("/media/", Some("products/a.png")).unwrap();
        assert_eq!(thumb.url, "/media/products/a.png");
        assert_eq!(thumb.width, THUMBNAIL_SIZE);
        assert!(Thumbnail::for_image("/media", Some("")).is_none());
        assert!(Thumbnail::for_image("/media", None).is_none());
    }
}
