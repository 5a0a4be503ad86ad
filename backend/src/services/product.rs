//! Product management service

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use validator::Validate;

use super::{clean_text, nullable, DeletionSummary};
use crate::admin::{search_pattern, Thumbnail};
use crate::error::{AppError, AppResult};
use crate::validation as rules;
use shared::{Actor, AuditFields, AuditStamp, PaginatedResponse, Pagination, Product};

/// Product service
#[derive(Clone)]
pub struct ProductService {
    db: PgPool,
    media_url: String,
}

/// List filters for products
#[derive(Debug, Default, Deserialize)]
pub struct ProductFilter {
    pub q: Option<String>,
    pub category_id: Option<Uuid>,
}

/// Product list row as read from the database
#[derive(Debug, FromRow)]
struct ProductRow {
    #[sqlx(flatten)]
    product: Product,
    category_name: String,
    remaining: i64,
}

/// Product row of the admin list view
#[derive(Debug, Clone, Serialize)]
pub struct ProductListItem {
    #[serde(flatten)]
    pub product: Product,
    pub category_name: String,
    /// Net stock, see `StockService`
    pub remaining: i64,
    pub thumbnail: Option<Thumbnail>,
}

/// Product with its category and current stock
#[derive(Debug, Clone, Serialize)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub category_name: String,
    pub image_url: Option<String>,
    pub remaining: i64,
}

/// Input for creating a product
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateProductInput {
    pub category_id: Uuid,
    #[validate(custom = "rules::name")]
    pub name: String,
    pub description: Option<String>,
    #[validate(custom = "rules::image_path")]
    pub image: Option<String>,
}

/// Input for updating a product. `null` clears an optional field.
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateProductInput {
    pub category_id: Option<Uuid>,
    #[validate(custom = "rules::name")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[validate(custom = "rules::image_path")]
    pub image: Option<Option<String>>,
}

impl ProductService {
    /// Create a new ProductService instance
    pub fn new(db: PgPool, media_url: impl Into<String>) -> Self {
        Self {
            db,
            media_url: media_url.into(),
        }
    }

    /// List products with category name, stock and thumbnail
    pub async fn list(
        &self,
        filter: &ProductFilter,
        pagination: &Pagination,
    ) -> AppResult<PaginatedResponse<ProductListItem>> {
        let search = search_pattern(filter.q.as_deref());

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM products p
            WHERE ($1::text IS NULL OR p.name ILIKE $1 OR p.description ILIKE $1)
              AND ($2::uuid IS NULL OR p.category_id = $2)
            "#,
        )
        .bind(&search)
        .bind(filter.category_id)
        .fetch_one(&self.db)
        .await?;

        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT p.id, p.category_id, p.image, p.name, p.description,
                   p.created_at, p.updated_at, p.created_by, p.updated_by,
                   c.name AS category_name,
                   COALESCE(SUM(CASE WHEN g.action = 2 THEN -o.quantity ELSE o.quantity END), 0)::BIGINT
                       AS remaining
            FROM products p
            JOIN categories c ON c.id = p.category_id
            LEFT JOIN operations o ON o.product_id = p.id
            LEFT JOIN operation_groups g ON g.id = o.group_id
            WHERE ($1::text IS NULL OR p.name ILIKE $1 OR p.description ILIKE $1)
              AND ($2::uuid IS NULL OR p.category_id = $2)
            GROUP BY p.id, c.name
            ORDER BY p.created_at DESC, p.id DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(&search)
        .bind(filter.category_id)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.db)
        .await?;

        let items = rows
            .into_iter()
            .map(|row| ProductListItem {
                thumbnail: Thumbnail::for_image(&self.media_url, row.product.image.as_deref()),
                product: row.product,
                category_name: row.category_name,
                remaining: row.remaining,
            })
            .collect();

        Ok(PaginatedResponse::new(items, pagination, total.max(0) as u64))
    }

    /// Get a product with its category and current stock
    pub async fn get(&self, product_id: Uuid) -> AppResult<ProductDetail> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT p.id, p.category_id, p.image, p.name, p.description,
                   p.created_at, p.updated_at, p.created_by, p.updated_by,
                   c.name AS category_name,
                   COALESCE(SUM(CASE WHEN g.action = 2 THEN -o.quantity ELSE o.quantity END), 0)::BIGINT
                       AS remaining
            FROM products p
            JOIN categories c ON c.id = p.category_id
            LEFT JOIN operations o ON o.product_id = p.id
            LEFT JOIN operation_groups g ON g.id = o.group_id
            WHERE p.id = $1
            GROUP BY p.id, c.name
            "#,
        )
        .bind(product_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        Ok(ProductDetail {
            image_url: row.product.image_url(&self.media_url),
            product: row.product,
            category_name: row.category_name,
            remaining: row.remaining,
        })
    }

    /// Create a product
    pub async fn create(&self, actor: Actor, input: CreateProductInput) -> AppResult<Product> {
        input.validate()?;
        self.ensure_category(input.category_id).await?;

        let audit = AuditFields::created(AuditStamp::now(actor));

        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (category_id, image, name, description,
                                  created_at, updated_at, created_by, updated_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, category_id, image, name, description,
                      created_at, updated_at, created_by, updated_by
            "#,
        )
        .bind(input.category_id)
        .bind(clean_text(input.image))
        .bind(input.name.trim())
        .bind(clean_text(input.description))
        .bind(audit.created_at)
        .bind(audit.updated_at)
        .bind(audit.created_by)
        .bind(audit.updated_by)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(product_id = %product.id, %actor, "product created");
        Ok(product)
    }

    /// Update a product. The creator columns are never written here.
    pub async fn update(
        &self,
        actor: Actor,
        product_id: Uuid,
        input: UpdateProductInput,
    ) -> AppResult<Product> {
        input.validate()?;

        let mut product = self.find(product_id).await?;

        if let Some(category_id) = input.category_id {
            self.ensure_category(category_id).await?;
            product.category_id = category_id;
        }
        if let Some(name) = input.name {
            product.name = name.trim().to_string();
        }
        if let Some(description) = input.description {
            product.description = clean_text(description);
        }
        if let Some(image) = input.image {
            product.image = clean_text(image);
        }
        product.audit.touch(AuditStamp::now(actor));

        let product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET category_id = $1, image = $2, name = $3, description = $4,
                updated_at = $5, updated_by = $6
            WHERE id = $7
            RETURNING id, category_id, image, name, description,
                      created_at, updated_at, created_by, updated_by
            "#,
        )
        .bind(product.category_id)
        .bind(&product.image)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.audit.updated_at)
        .bind(product.audit.updated_by)
        .bind(product_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        tracing::info!(%product_id, %actor, "product updated");
        Ok(product)
    }

    /// Delete a product together with its operations
    pub async fn delete(&self, actor: Actor, product_id: Uuid) -> AppResult<DeletionSummary> {
        let mut tx = self.db.begin().await?;

        let operations = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM operations WHERE product_id = $1",
        )
        .bind(product_id)
        .fetch_one(&mut *tx)
        .await?;

        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(product_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Product".to_string()));
        }

        tx.commit().await?;

        tracing::info!(%product_id, operations, %actor, "product deleted");
        Ok(DeletionSummary::new("product", product_id).cascaded("operation", operations))
    }

    /// Load the bare product row
    async fn find(&self, product_id: Uuid) -> AppResult<Product> {
        sqlx::query_as::<_, Product>(
            r#"
            SELECT id, category_id, image, name, description,
                   created_at, updated_at, created_by, updated_by
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(product_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))
    }

    async fn ensure_category(&self, category_id: Uuid) -> AppResult<()> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1)",
        )
        .bind(category_id)
        .fetch_one(&self.db)
        .await?;

        if !exists {
            return Err(AppError::NotFound("Category".to_string()));
        }
        Ok(())
    }
}
