//! Category management service

use chrono::Utc;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use super::DeletionSummary;
use crate::admin::search_pattern;
use crate::error::{AppError, AppResult};
use crate::validation as rules;
use shared::{Actor, Category, PaginatedResponse, Pagination};

/// Category service
#[derive(Clone)]
pub struct CategoryService {
    db: PgPool,
}

/// Input for creating a category
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateCategoryInput {
    #[validate(custom = "rules::name")]
    pub name: String,
}

/// Input for updating a category
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateCategoryInput {
    #[validate(custom = "rules::name")]
    pub name: Option<String>,
}

impl CategoryService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List categories, newest first, optionally searching by name
    pub async fn list(
        &self,
        q: Option<&str>,
        pagination: &Pagination,
    ) -> AppResult<PaginatedResponse<Category>> {
        let search = search_pattern(q);
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM categories WHERE ($1::text IS NULL OR name ILIKE $1)",
        )
        .bind(&search)
        .fetch_one(&self.db)
        .await?;

        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, created_at, updated_at
            FROM categories
            WHERE ($1::text IS NULL OR name ILIKE $1)
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(&search)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.db)
        .await?;

        Ok(PaginatedResponse::new(categories, pagination, total.max(0) as u64))
    }

    /// Get a category by ID
    pub async fn get(&self, category_id: Uuid) -> AppResult<Category> {
        sqlx::query_as::<_, Category>(
            "SELECT id, name, created_at, updated_at FROM categories WHERE id = $1",
        )
        .bind(category_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Category".to_string()))
    }

    /// Create a category
    pub async fn create(&self, actor: Actor, input: CreateCategoryInput) -> AppResult<Category> {
        input.validate()?;

        let now = Utc::now();
        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name, created_at, updated_at)
            VALUES ($1, $2, $2)
            RETURNING id, name, created_at, updated_at
            "#,
        )
        .bind(input.name.trim())
        .bind(now)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(category_id = %category.id, %actor, "category created");
        Ok(category)
    }

    /// Update a category
    pub async fn update(
        &self,
        actor: Actor,
        category_id: Uuid,
        input: UpdateCategoryInput,
    ) -> AppResult<Category> {
        input.validate()?;

        let mut category = self.get(category_id).await?;
        if let Some(name) = input.name {
            category.name = name.trim().to_string();
        }
        category.updated_at = Utc::now();

        let category = sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories
            SET name = $1, updated_at = $2
            WHERE id = $3
            RETURNING id, name, created_at, updated_at
            "#,
        )
        .bind(&category.name)
        .bind(category.updated_at)
        .bind(category_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Category".to_string()))?;

        tracing::info!(category_id = %category.id, %actor, "category updated");
        Ok(category)
    }

    /// Delete a category together with its products and their operations
    pub async fn delete(&self, actor: Actor, category_id: Uuid) -> AppResult<DeletionSummary> {
        let mut tx = self.db.begin().await?;

        let (products, operations) = sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM products WHERE category_id = $1),
                (SELECT COUNT(*) FROM operations o
                   JOIN products p ON p.id = o.product_id
                  WHERE p.category_id = $1)
            "#,
        )
        .bind(category_id)
        .fetch_one(&mut *tx)
        .await?;

        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(category_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Category".to_string()));
        }

        tx.commit().await?;

        tracing::info!(%category_id, products, operations, %actor, "category deleted");
        Ok(DeletionSummary::new("category", category_id)
            .cascaded("product", products)
            .cascaded("operation", operations))
    }
}
