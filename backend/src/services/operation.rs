//! Operation (line item) service

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgExecutor, PgPool};
use uuid::Uuid;
use validator::Validate;

use super::DeletionSummary;
use crate::admin::search_pattern;
use crate::error::{AppError, AppResult};
use crate::validation as rules;
use shared::{
    Action, Actor, AuditFields, AuditStamp, LineItem, Operation, PaginatedResponse, Pagination,
};

/// Operation service
#[derive(Clone)]
pub struct OperationService {
    db: PgPool,
}

/// List filters for operations
#[derive(Debug, Default, Deserialize)]
pub struct OperationFilter {
    pub q: Option<String>,
    pub product_id: Option<Uuid>,
    pub group_id: Option<Uuid>,
    pub action: Option<Action>,
}

#[derive(Debug, FromRow)]
struct OperationRow {
    #[sqlx(flatten)]
    operation: Operation,
    product_name: String,
    action: Action,
}

/// Operation with its product name, inherited action and amount
#[derive(Debug, Clone, Serialize)]
pub struct OperationLine {
    #[serde(flatten)]
    pub operation: Operation,
    pub product_name: String,
    pub action: Action,
    pub amount: Decimal,
}

impl From<OperationRow> for OperationLine {
    fn from(row: OperationRow) -> Self {
        Self {
            amount: row.operation.amount(),
            operation: row.operation,
            product_name: row.product_name,
            action: row.action,
        }
    }
}

impl OperationLine {
    pub fn line_item(&self) -> LineItem {
        LineItem {
            quantity: self.operation.quantity,
            price: self.operation.price,
            discount: self.operation.discount,
        }
    }
}

/// Input for a single operation line
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateOperationInput {
    pub group_id: Uuid,
    pub product_id: Uuid,
    #[validate(custom = "rules::quantity")]
    pub quantity: i32,
    #[validate(custom = "rules::price")]
    pub price: Decimal,
    #[validate(custom = "rules::discount")]
    pub discount: Option<Decimal>,
}

/// Input for updating an operation
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateOperationInput {
    pub group_id: Option<Uuid>,
    pub product_id: Option<Uuid>,
    #[validate(custom = "rules::quantity")]
    pub quantity: Option<i32>,
    #[validate(custom = "rules::price")]
    pub price: Option<Decimal>,
    #[validate(custom = "rules::discount")]
    pub discount: Option<Decimal>,
}

/// Operation line entered inline with its group
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct GroupLineInput {
    pub product_id: Uuid,
    #[validate(custom = "rules::quantity")]
    pub quantity: i32,
    #[validate(custom = "rules::price")]
    pub price: Decimal,
    #[validate(custom = "rules::discount")]
    pub discount: Option<Decimal>,
}

/// Operations of a group with product names, oldest first
pub(crate) async fn group_lines<'e, E>(executor: E, group_id: Uuid) -> AppResult<Vec<OperationLine>>
where
    E: PgExecutor<'e>,
{
    let rows = sqlx::query_as::<_, OperationRow>(
        r#"
        SELECT o.id, o.product_id, o.group_id, o.quantity, o.price, o.discount,
               o.created_at, o.updated_at, o.created_by, o.updated_by,
               p.name AS product_name, g.action
        FROM operations o
        JOIN products p ON p.id = o.product_id
        JOIN operation_groups g ON g.id = o.group_id
        WHERE o.group_id = $1
        ORDER BY o.created_at, o.id
        "#,
    )
    .bind(group_id)
    .fetch_all(executor)
    .await?;

    Ok(rows.into_iter().map(OperationLine::from).collect())
}

/// Insert one operation row
pub(crate) async fn insert_operation<'e, E>(
    executor: E,
    group_id: Uuid,
    product_id: Uuid,
    quantity: i32,
    price: Decimal,
    discount: Decimal,
    audit: &AuditFields,
) -> AppResult<Operation>
where
    E: PgExecutor<'e>,
{
    let operation = sqlx::query_as::<_, Operation>(
        r#"
        INSERT INTO operations (product_id, group_id, quantity, price, discount,
                                created_at, updated_at, created_by, updated_by)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING id, product_id, group_id, quantity, price, discount,
                  created_at, updated_at, created_by, updated_by
        "#,
    )
    .bind(product_id)
    .bind(group_id)
    .bind(quantity)
    .bind(price)
    .bind(discount)
    .bind(audit.created_at)
    .bind(audit.updated_at)
    .bind(audit.created_by)
    .bind(audit.updated_by)
    .fetch_one(executor)
    .await?;

    Ok(operation)
}

pub(crate) async fn ensure_exists<'e, E>(
    executor: E,
    table: &'static str,
    resource: &'static str,
    id: Uuid,
) -> AppResult<()>
where
    E: PgExecutor<'e>,
{
    let sql = format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1)", table);
    let exists = sqlx::query_scalar::<_, bool>(&sql)
        .bind(id)
        .fetch_one(executor)
        .await?;

    if !exists {
        return Err(AppError::NotFound(resource.to_string()));
    }
    Ok(())
}

impl OperationService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List operations, searching by product name
    pub async fn list(
        &self,
        filter: &OperationFilter,
        pagination: &Pagination,
    ) -> AppResult<PaginatedResponse<OperationLine>> {
        let search = search_pattern(filter.q.as_deref());

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM operations o
            JOIN products p ON p.id = o.product_id
            JOIN operation_groups g ON g.id = o.group_id
            WHERE ($1::text IS NULL OR p.name ILIKE $1)
              AND ($2::uuid IS NULL OR o.product_id = $2)
              AND ($3::uuid IS NULL OR o.group_id = $3)
              AND ($4::smallint IS NULL OR g.action = $4)
            "#,
        )
        .bind(&search)
        .bind(filter.product_id)
        .bind(filter.group_id)
        .bind(filter.action)
        .fetch_one(&self.db)
        .await?;

        let rows = sqlx::query_as::<_, OperationRow>(
            r#"
            SELECT o.id, o.product_id, o.group_id, o.quantity, o.price, o.discount,
                   o.created_at, o.updated_at, o.created_by, o.updated_by,
                   p.name AS product_name, g.action
            FROM operations o
            JOIN products p ON p.id = o.product_id
            JOIN operation_groups g ON g.id = o.group_id
            WHERE ($1::text IS NULL OR p.name ILIKE $1)
              AND ($2::uuid IS NULL OR o.product_id = $2)
              AND ($3::uuid IS NULL OR o.group_id = $3)
              AND ($4::smallint IS NULL OR g.action = $4)
            ORDER BY o.created_at DESC, o.id DESC
            LIMIT $5 OFFSET $6
            "#,
        )
        .bind(&search)
        .bind(filter.product_id)
        .bind(filter.group_id)
        .bind(filter.action)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.db)
        .await?;

        let items = rows.into_iter().map(OperationLine::from).collect();
        Ok(PaginatedResponse::new(items, pagination, total.max(0) as u64))
    }

    /// Get an operation by ID
    pub async fn get(&self, operation_id: Uuid) -> AppResult<OperationLine> {
        let row = sqlx::query_as::<_, OperationRow>(
            r#"
            SELECT o.id, o.product_id, o.group_id, o.quantity, o.price, o.discount,
                   o.created_at, o.updated_at, o.created_by, o.updated_by,
                   p.name AS product_name, g.action
            FROM operations o
            JOIN products p ON p.id = o.product_id
            JOIN operation_groups g ON g.id = o.group_id
            WHERE o.id = $1
            "#,
        )
        .bind(operation_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Operation".to_string()))?;

        Ok(row.into())
    }

    /// Create an operation inside an existing group
    pub async fn create(&self, actor: Actor, input: CreateOperationInput) -> AppResult<OperationLine> {
        input.validate()?;

        ensure_exists(&self.db, "operation_groups", "Operation group", input.group_id).await?;
        ensure_exists(&self.db, "products", "Product", input.product_id).await?;

        let audit = AuditFields::created(AuditStamp::now(actor));
        let operation = insert_operation(
            &self.db,
            input.group_id,
            input.product_id,
            input.quantity,
            input.price,
            input.discount.unwrap_or(Decimal::ZERO),
            &audit,
        )
        .await?;

        tracing::info!(operation_id = %operation.id, group_id = %operation.group_id, %actor, "operation created");
        self.get(operation.id).await
    }

    /// Update an operation
    pub async fn update(
        &self,
        actor: Actor,
        operation_id: Uuid,
        input: UpdateOperationInput,
    ) -> AppResult<OperationLine> {
        input.validate()?;

        let mut operation = self.get(operation_id).await?.operation;

        if let Some(group_id) = input.group_id {
            ensure_exists(&self.db, "operation_groups", "Operation group", group_id).await?;
            operation.group_id = group_id;
        }
        if let Some(product_id) = input.product_id {
            ensure_exists(&self.db, "products", "Product", product_id).await?;
            operation.product_id = product_id;
        }
        if let Some(quantity) = input.quantity {
            operation.quantity = quantity;
        }
        if let Some(price) = input.price {
            operation.price = price;
        }
        if let Some(discount) = input.discount {
            operation.discount = discount;
        }
        operation.audit.touch(AuditStamp::now(actor));

        let result = sqlx::query(
            r#"
            UPDATE operations
            SET group_id = $1, product_id = $2, quantity = $3, price = $4, discount = $5,
                updated_at = $6, updated_by = $7
            WHERE id = $8
            "#,
        )
        .bind(operation.group_id)
        .bind(operation.product_id)
        .bind(operation.quantity)
        .bind(operation.price)
        .bind(operation.discount)
        .bind(operation.audit.updated_at)
        .bind(operation.audit.updated_by)
        .bind(operation_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Operation".to_string()));
        }

        tracing::info!(%operation_id, %actor, "operation updated");
        self.get(operation_id).await
    }

    /// Delete an operation
    pub async fn delete(&self, actor: Actor, operation_id: Uuid) -> AppResult<DeletionSummary> {
        let result = sqlx::query("DELETE FROM operations WHERE id = $1")
            .bind(operation_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Operation".to_string()));
        }

        tracing::info!(%operation_id, %actor, "operation deleted");
        Ok(DeletionSummary::new("operation", operation_id))
    }
}
