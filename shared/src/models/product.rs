//! Products held in stock

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::audit::AuditFields;

/// Directory under the media root that product images live in
pub const PRODUCT_IMAGE_DIR: &str = "products/";

/// A stocked product. Belongs to exactly one category.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    pub id: Uuid,
    pub category_id: Uuid,
    /// Path relative to the media root, e.g. `products/kettle.jpg`
    pub image: Option<String>,
    pub name: String,
    pub description: Option<String>,
    #[serde(flatten)]
    #[cfg_attr(feature = "sqlx", sqlx(flatten))]
    pub audit: AuditFields,
}

impl Product {
    /// Public URL of the product image under `media_url`
    pub fn image_url(&self, media_url: &str) -> Option<String> {
        self.image
            .as_deref()
            .filter(|path| !path.is_empty())
            .map(|path| join_media_url(media_url, path))
    }
}

impl std::fmt::Display for Product {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// Join a media base URL and a relative path with exactly one slash
pub fn join_media_url(media_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        media_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_media_url() {
        assert_eq!(join_media_url("/media/", "/products/a.jpg"), "/media/products/a.jpg");
        assert_eq!(join_media_url("/media", "products/a.jpg"), "/media/products/a.jpg");
    }
}
