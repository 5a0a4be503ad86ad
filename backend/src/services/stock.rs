//! Stock calculator
//!
//! Stock is not stored anywhere. Every query replays the product's
//! operations with the action of their group.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::{remaining_stock, running_balance, Action, Movement};

/// Stock calculator service
#[derive(Clone)]
pub struct StockService {
    db: PgPool,
}

/// Current stock of a product
#[derive(Debug, Clone, Serialize)]
pub struct ProductStock {
    pub product_id: Uuid,
    pub product_name: String,
    pub remaining: i64,
    pub total_in: i64,
    pub total_out: i64,
}

/// One movement of a product with the balance after it
#[derive(Debug, Clone, Serialize)]
pub struct StockMovement {
    pub operation_id: Uuid,
    pub group_id: Uuid,
    pub action: Action,
    pub quantity: i32,
    pub delta: i64,
    pub balance: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct MovementRow {
    operation_id: Uuid,
    group_id: Uuid,
    action: Action,
    quantity: i32,
    created_at: DateTime<Utc>,
}

impl MovementRow {
    fn movement(&self) -> Movement {
        Movement::new(self.action, self.quantity)
    }
}

impl StockService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Remaining quantity of a product. May be negative after an oversell.
    pub async fn remaining(&self, product_id: Uuid) -> AppResult<ProductStock> {
        let product_name = self.product_name(product_id).await?;
        let rows = self.movements(product_id).await?;

        let (total_in, total_out) = rows.iter().fold((0i64, 0i64), |(i, o), row| {
            if row.action.is_deducting() {
                (i, o + i64::from(row.quantity))
            } else {
                (i + i64::from(row.quantity), o)
            }
        });
        let remaining = remaining_stock(rows.iter().map(MovementRow::movement));

        tracing::debug!(%product_id, remaining, "stock computed");
        Ok(ProductStock {
            product_id,
            product_name,
            remaining,
            total_in,
            total_out,
        })
    }

    /// Operation history of a product, oldest first, with running balance
    pub async fn history(&self, product_id: Uuid) -> AppResult<Vec<StockMovement>> {
        self.product_name(product_id).await?;
        let rows = self.movements(product_id).await?;

        let balances = running_balance(rows.iter().map(MovementRow::movement));

        Ok(rows
            .into_iter()
            .zip(balances)
            .map(|(row, balance)| StockMovement {
                delta: row.movement().delta(),
                operation_id: row.operation_id,
                group_id: row.group_id,
                action: row.action,
                quantity: row.quantity,
                balance,
                created_at: row.created_at,
            })
            .collect())
    }

    async fn product_name(&self, product_id: Uuid) -> AppResult<String> {
        sqlx::query_scalar::<_, String>("SELECT name FROM products WHERE id = $1")
            .bind(product_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Product".to_string()))
    }

    async fn movements(&self, product_id: Uuid) -> AppResult<Vec<MovementRow>> {
        let rows = sqlx::query_as::<_, MovementRow>(
            r#"
            SELECT o.id AS operation_id, o.group_id, g.action, o.quantity, o.created_at
            FROM operations o
            JOIN operation_groups g ON g.id = o.group_id
            WHERE o.product_id = $1
            ORDER BY o.created_at, o.id
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }
}
